//! This module contains the polynomials the preprocessor derives from the
//! circuit shape.

pub mod permutation;
pub mod selectors;
