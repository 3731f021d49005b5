//! This module implements the [`SetupError`] type and the other errors
//! raised while validating inputs before they reach the argument code.

use crate::circuits::variable::{ColumnType, Variable};
use thiserror::Error;

/// Errors that can arise when creating an evaluation domain
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainCreationError {
    #[error("could not compute the size of domain for {0}")]
    DomainSizeFailed(usize),

    #[error("construction of domain {0} for size {1} failed")]
    DomainConstructionFailed(String, usize),
}

/// Errors that can arise when preparing the setup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("the table must have a power of two number of rows (got {0})")]
    RowsNotPowerOfTwo(usize),

    #[error("the usable rows ({usable}) must be fewer than the table rows ({rows})")]
    TooManyUsableRows { usable: usize, rows: usize },

    #[error("{0} permutation columns requested but the table has {1} non-selector columns")]
    PermutationTooWide(usize, usize),

    #[error("expected {expected} {typ:?} columns in the assignment, got {got}")]
    ColumnCountMismatch {
        typ: ColumnType,
        expected: usize,
        got: usize,
    },

    #[error("{typ:?} column {index} has {got} rows, expected {expected}")]
    ColumnLengthMismatch {
        typ: ColumnType,
        index: usize,
        expected: usize,
        got: usize,
    },

    #[error("the commitment parameters do not contain any domain")]
    MissingCommitmentDomain,

    #[error("the domain could not be constructed: {0}")]
    DomainCreation(#[from] DomainCreationError),
}

/// Errors reported when an assignment does not satisfy a constraint system
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("constraint {constraint} of gate {gate} does not hold at row {row}")]
    UnsatisfiedConstraint {
        gate: usize,
        constraint: usize,
        row: usize,
    },

    #[error("copy constraint {index} is violated: {left:?} and {right:?} differ")]
    CopyConstraintViolated {
        index: usize,
        left: Variable,
        right: Variable,
    },
}
