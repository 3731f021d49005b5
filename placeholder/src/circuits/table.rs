//! The shape of the assignment table, the assignment itself and its
//! polynomial counterpart.
//!
//! Columns are indexed globally in the order witness, public input, constant,
//! selector. Every table type exposes its columns through [ColumnTable], so
//! that resolving a `(column type, index)` pair is written once.

use ark_ff::FftField;
use ark_poly::{EvaluationDomain, Evaluations, Radix2EvaluationDomain as D};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::{
    circuits::variable::{ColumnType, Variable},
    error::SetupError,
    serialization::SerdeAs,
};

/// The dimensions of the assignment table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescription {
    pub witness_columns: usize,
    pub public_input_columns: usize,
    pub constant_columns: usize,
    pub selector_columns: usize,
    /// number of rows, a power of two
    pub rows_amount: usize,
    /// rows that gates may use; the rest is reserved for blinding
    pub usable_rows_amount: usize,
}

impl TableDescription {
    pub fn table_width(&self) -> usize {
        self.witness_columns
            + self.public_input_columns
            + self.constant_columns
            + self.selector_columns
    }

    /// Number of columns that can take part in copy constraints.
    pub fn permutable_columns(&self) -> usize {
        self.table_width() - self.selector_columns
    }

    pub fn columns(&self, typ: ColumnType) -> usize {
        match typ {
            ColumnType::Witness => self.witness_columns,
            ColumnType::PublicInput => self.public_input_columns,
            ColumnType::Constant => self.constant_columns,
            ColumnType::Selector => self.selector_columns,
        }
    }

    /// Index of the column of `var` among all the columns of the table.
    ///
    /// # Panics
    ///
    /// Panics if the column index is out of range for its type.
    pub fn global_index(&self, var: &Variable) -> usize {
        let count = self.columns(var.column_type);
        assert!(
            var.index < count,
            "variable {var} refers to {:?} column {} but the table has {count}",
            var.column_type,
            var.index,
        );
        let offset = match var.column_type {
            ColumnType::Witness => 0,
            ColumnType::PublicInput => self.witness_columns,
            ColumnType::Constant => self.witness_columns + self.public_input_columns,
            ColumnType::Selector => {
                self.witness_columns + self.public_input_columns + self.constant_columns
            }
        };
        offset + var.index
    }

    /// Checks the invariants the preprocessor and the arguments rely on.
    pub fn validate(&self) -> Result<(), SetupError> {
        if !self.rows_amount.is_power_of_two() {
            return Err(SetupError::RowsNotPowerOfTwo(self.rows_amount));
        }
        if self.usable_rows_amount >= self.rows_amount {
            return Err(SetupError::TooManyUsableRows {
                usable: self.usable_rows_amount,
                rows: self.rows_amount,
            });
        }
        Ok(())
    }
}

/// Access to the columns of a table by type and index.
pub trait ColumnTable {
    type Column;

    fn witnesses(&self) -> &[Self::Column];
    fn public_inputs(&self) -> &[Self::Column];
    fn constants(&self) -> &[Self::Column];
    fn selectors(&self) -> &[Self::Column];

    /// Resolves a column from its type and its index within that type.
    ///
    /// # Panics
    ///
    /// Panics if the table has no such column.
    fn column(&self, typ: ColumnType, index: usize) -> &Self::Column {
        let columns = match typ {
            ColumnType::Witness => self.witnesses(),
            ColumnType::PublicInput => self.public_inputs(),
            ColumnType::Constant => self.constants(),
            ColumnType::Selector => self.selectors(),
        };
        match columns.get(index) {
            Some(col) => col,
            None => panic!(
                "{typ:?} column {index} is out of range (the table has {})",
                columns.len()
            ),
        }
    }
}

//
// Assignments
//

/// Columns known to both the prover and the verifier.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicAssignment<F: FftField> {
    #[serde_as(as = "Vec<Vec<SerdeAs>>")]
    pub public_inputs: Vec<Vec<F>>,
    #[serde_as(as = "Vec<Vec<SerdeAs>>")]
    pub constants: Vec<Vec<F>>,
    #[serde_as(as = "Vec<Vec<SerdeAs>>")]
    pub selectors: Vec<Vec<F>>,
}

/// Columns only known to the prover.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PrivateAssignment<F: FftField> {
    #[serde_as(as = "Vec<Vec<SerdeAs>>")]
    pub witnesses: Vec<Vec<F>>,
}

/// A complete assignment of the table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(bound = "F: FftField")]
pub struct AssignmentTable<F: FftField> {
    pub private: PrivateAssignment<F>,
    pub public: PublicAssignment<F>,
}

impl<F: FftField> AssignmentTable<F> {
    pub fn new(private: PrivateAssignment<F>, public: PublicAssignment<F>) -> Self {
        AssignmentTable { private, public }
    }

    /// Reads the cell referred to by `var`, where relative rotations are
    /// applied to `row` and wrap around the table.
    pub fn cell(&self, var: &Variable, row: usize) -> F {
        let column = self.column(var.column_type, var.index);
        let size = column.len() as i64;
        let target = if var.relative {
            (row as i64 + var.rotation as i64).rem_euclid(size)
        } else {
            var.rotation as i64
        };
        match column.get(target as usize) {
            Some(x) => *x,
            None => panic!("variable {var} points outside of the table (row {target})"),
        }
    }

    /// Checks that the number of columns of every type and their length
    /// match the table description.
    pub fn validate(&self, table: &TableDescription) -> Result<(), SetupError> {
        self.private.validate(table)?;
        self.public.validate(table)
    }
}

fn validate_columns<F>(
    typ: ColumnType,
    columns: &[Vec<F>],
    table: &TableDescription,
) -> Result<(), SetupError> {
    if columns.len() != table.columns(typ) {
        return Err(SetupError::ColumnCountMismatch {
            typ,
            expected: table.columns(typ),
            got: columns.len(),
        });
    }
    match columns
        .iter()
        .enumerate()
        .find(|(_, col)| col.len() != table.rows_amount)
    {
        Some((index, col)) => Err(SetupError::ColumnLengthMismatch {
            typ,
            index,
            expected: table.rows_amount,
            got: col.len(),
        }),
        None => Ok(()),
    }
}

impl<F: FftField> PublicAssignment<F> {
    pub fn validate(&self, table: &TableDescription) -> Result<(), SetupError> {
        validate_columns(ColumnType::PublicInput, &self.public_inputs, table)?;
        validate_columns(ColumnType::Constant, &self.constants, table)?;
        validate_columns(ColumnType::Selector, &self.selectors, table)
    }
}

impl<F: FftField> PrivateAssignment<F> {
    pub fn validate(&self, table: &TableDescription) -> Result<(), SetupError> {
        validate_columns(ColumnType::Witness, &self.witnesses, table)
    }
}

impl<F: FftField> ColumnTable for AssignmentTable<F> {
    type Column = Vec<F>;

    fn witnesses(&self) -> &[Vec<F>] {
        &self.private.witnesses
    }
    fn public_inputs(&self) -> &[Vec<F>] {
        &self.public.public_inputs
    }
    fn constants(&self) -> &[Vec<F>] {
        &self.public.constants
    }
    fn selectors(&self) -> &[Vec<F>] {
        &self.public.selectors
    }
}

//
// Polynomials
//

/// Interpolates every column over `domain`, padding short columns with zeros.
///
/// # Panics
///
/// Panics if a column is longer than the domain.
pub fn column_range_polynomials<F: FftField>(
    columns: &[Vec<F>],
    domain: D<F>,
) -> Vec<Evaluations<F, D<F>>> {
    columns
        .par_iter()
        .enumerate()
        .map(|(i, col)| {
            assert!(
                col.len() <= domain.size(),
                "column {i} has {} rows but the domain has {}",
                col.len(),
                domain.size()
            );
            let mut evals = col.clone();
            evals.resize(domain.size(), F::zero());
            Evaluations::from_vec_and_domain(evals, domain)
        })
        .collect()
}

/// The public columns in evaluation form over the row domain.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PublicPolynomialTable<F: FftField> {
    #[serde_as(as = "Vec<SerdeAs>")]
    pub public_inputs: Vec<Evaluations<F, D<F>>>,
    #[serde_as(as = "Vec<SerdeAs>")]
    pub constants: Vec<Evaluations<F, D<F>>>,
    #[serde_as(as = "Vec<SerdeAs>")]
    pub selectors: Vec<Evaluations<F, D<F>>>,
}

impl<F: FftField> PublicPolynomialTable<F> {
    pub fn new(assignment: &PublicAssignment<F>, domain: D<F>) -> Self {
        PublicPolynomialTable {
            public_inputs: column_range_polynomials(&assignment.public_inputs, domain),
            constants: column_range_polynomials(&assignment.constants, domain),
            selectors: column_range_polynomials(&assignment.selectors, domain),
        }
    }
}

/// The witness columns in evaluation form over the row domain.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrivatePolynomialTable<F: FftField> {
    #[serde_as(as = "Vec<SerdeAs>")]
    pub witnesses: Vec<Evaluations<F, D<F>>>,
}

impl<F: FftField> PrivatePolynomialTable<F> {
    pub fn new(assignment: &PrivateAssignment<F>, domain: D<F>) -> Self {
        PrivatePolynomialTable {
            witnesses: column_range_polynomials(&assignment.witnesses, domain),
        }
    }
}

/// Joins the private and public polynomial tables.
#[derive(Copy, Clone, Debug)]
pub struct PolynomialTable<'a, F: FftField> {
    pub private: &'a PrivatePolynomialTable<F>,
    pub public: &'a PublicPolynomialTable<F>,
}

impl<'a, F: FftField> PolynomialTable<'a, F> {
    pub fn new(private: &'a PrivatePolynomialTable<F>, public: &'a PublicPolynomialTable<F>) -> Self {
        PolynomialTable { private, public }
    }
}

impl<'a, F: FftField> ColumnTable for PolynomialTable<'a, F> {
    type Column = Evaluations<F, D<F>>;

    fn witnesses(&self) -> &[Self::Column] {
        &self.private.witnesses
    }
    fn public_inputs(&self) -> &[Self::Column] {
        &self.public.public_inputs
    }
    fn constants(&self) -> &[Self::Column] {
        &self.public.constants
    }
    fn selectors(&self) -> &[Self::Column] {
        &self.public.selectors
    }
}
