#![doc = include_str!("../README.md")]

#[cfg(feature = "bn254")]
pub use ark_bn254;

pub mod circuits;
pub mod commitment;
pub mod error;
pub mod evaluations;
pub mod gates_argument;
pub mod params;
pub mod preprocessor;
pub mod serialization;
pub mod transcript;

#[cfg(test)]
mod tests;

