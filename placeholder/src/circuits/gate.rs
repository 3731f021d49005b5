//! Gates, lookup constraints and copy constraints.

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde::{Deserialize, Serialize};

use crate::circuits::{
    expr::{Constraint, Expr},
    variable::Variable,
};

/// A group of constraints enabled on the rows where the selector column
/// `selector_index` is set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate<C> {
    /// index of the selector column masking this gate
    pub selector_index: usize,
    pub constraints: Vec<C>,
}

impl<C> Gate<C> {
    pub fn new(selector_index: usize, constraints: Vec<C>) -> Self {
        Gate {
            selector_index,
            constraints,
        }
    }

    /// The variable holding the selector of this gate on the current row.
    pub fn selector(&self) -> Variable {
        Variable::selector(self.selector_index)
    }
}

impl<F> Gate<Constraint<F>> {
    /// Maximum constraint degree of the gate, not counting the selector.
    pub fn degree(&self) -> usize {
        self.constraints
            .iter()
            .map(|c| c.degree())
            .max()
            .unwrap_or(0)
    }
}

/// Asserts that the tuple obtained by evaluating `lookup_input` on a row is
/// one of the rows of the table spanned by the `lookup_value` columns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: CanonicalSerialize + CanonicalDeserialize")]
pub struct LookupConstraint<F> {
    pub lookup_input: Vec<Expr<F>>,
    pub lookup_value: Vec<Variable>,
}

impl<F> LookupConstraint<F> {
    pub fn new(lookup_input: Vec<Expr<F>>, lookup_value: Vec<Variable>) -> Self {
        LookupConstraint {
            lookup_input,
            lookup_value,
        }
    }
}

/// A gate whose constraints are lookups.
pub type LookupGate<F> = Gate<LookupConstraint<F>>;

/// Asserts that two cells hold the same value. Both sides are absolute
/// references: their `rotation` is the row of the cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CopyConstraint(pub Variable, pub Variable);

impl CopyConstraint {
    pub fn new(left: Variable, right: Variable) -> Self {
        CopyConstraint(left, right)
    }
}
