//! Variables are references to a cell of the assignment table, either relative
//! to the row a gate is applied to or pinned to an absolute row.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::circuits::expr::Expr;

/// The kind of column a [Variable] points into.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum ColumnType {
    Witness,
    PublicInput,
    Constant,
    Selector,
}

/// The key under which the verifier receives the evaluation of a variable:
/// `(column index, rotation, column type)`.
pub type EvaluationKey = (usize, i32, ColumnType);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// A type representing a variable which can appear in a constraint.
pub struct Variable {
    /// The type of the column this variable reads from
    pub column_type: ColumnType,
    /// Index of the column among the columns of the same type
    pub index: usize,
    /// Row offset when `relative` is set, absolute row otherwise
    pub rotation: i32,
    /// Whether `rotation` is relative to the current row
    pub relative: bool,
}

impl Variable {
    pub fn new(column_type: ColumnType, index: usize, rotation: i32, relative: bool) -> Self {
        Variable {
            column_type,
            index,
            rotation,
            relative,
        }
    }

    /// A witness cell `rotation` rows away from the current row.
    pub fn witness(index: usize, rotation: i32) -> Self {
        Self::new(ColumnType::Witness, index, rotation, true)
    }

    /// A public input cell `rotation` rows away from the current row.
    pub fn public_input(index: usize, rotation: i32) -> Self {
        Self::new(ColumnType::PublicInput, index, rotation, true)
    }

    /// A constant cell `rotation` rows away from the current row.
    pub fn constant(index: usize, rotation: i32) -> Self {
        Self::new(ColumnType::Constant, index, rotation, true)
    }

    /// The selector cell on the current row, as used to mask a gate.
    pub fn selector(index: usize) -> Self {
        Self::new(ColumnType::Selector, index, 0, true)
    }

    /// A cell at an absolute `row`, as used by copy constraints.
    pub fn absolute(column_type: ColumnType, index: usize, row: usize) -> Self {
        let rotation = i32::try_from(row)
            .unwrap_or_else(|_| panic!("row {row} does not fit an absolute variable reference"));
        Self::new(column_type, index, rotation, false)
    }

    pub fn key(&self) -> EvaluationKey {
        (self.index, self.rotation, self.column_type)
    }

    /// Lifts the variable into a constraint expression.
    pub fn into_expr<F>(self) -> Expr<F> {
        Expr::Var(self)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let col = match self.column_type {
            ColumnType::Witness => "w",
            ColumnType::PublicInput => "pi",
            ColumnType::Constant => "c",
            ColumnType::Selector => "q",
        };
        if self.relative {
            write!(f, "{col}[{}]@{:+}", self.index, self.rotation)
        } else {
            write!(f, "{col}[{}]#{}", self.index, self.rotation)
        }
    }
}
