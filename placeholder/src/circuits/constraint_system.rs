//! The constraint system: gates, copy constraints and lookup gates.

use ark_ff::FftField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use blake2::{Blake2b512, Digest};
use serde::{Deserialize, Serialize};

use crate::{
    circuits::{
        expr::Constraint,
        gate::{CopyConstraint, Gate, LookupGate},
        table::{AssignmentTable, TableDescription},
    },
    error::GateError,
};

/// A PLONK constraint system. It is built once and only read afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: CanonicalSerialize + CanonicalDeserialize")]
pub struct ConstraintSystem<F> {
    gates: Vec<Gate<Constraint<F>>>,
    copy_constraints: Vec<CopyConstraint>,
    lookup_gates: Vec<LookupGate<F>>,
}

impl<F> ConstraintSystem<F> {
    pub fn new(
        gates: Vec<Gate<Constraint<F>>>,
        copy_constraints: Vec<CopyConstraint>,
        lookup_gates: Vec<LookupGate<F>>,
    ) -> Self {
        ConstraintSystem {
            gates,
            copy_constraints,
            lookup_gates,
        }
    }

    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    pub fn gates(&self) -> &[Gate<Constraint<F>>] {
        &self.gates
    }

    pub fn copy_constraints(&self) -> &[CopyConstraint] {
        &self.copy_constraints
    }

    pub fn lookup_gates(&self) -> &[LookupGate<F>] {
        &self.lookup_gates
    }

    /// The largest degree of a gate constraint once multiplied by its
    /// selector, or 0 if there are no gates.
    pub fn max_gates_degree(&self) -> usize {
        self.gates
            .iter()
            .filter(|gate| !gate.constraints.is_empty())
            .map(|gate| gate.degree() + 1)
            .max()
            .unwrap_or(0)
    }
}

impl<F: FftField> ConstraintSystem<F> {
    /// Checks the assignment against every gate (on the usable rows where its
    /// selector is set) and every copy constraint.
    pub fn verify(
        &self,
        assignment: &AssignmentTable<F>,
        table: &TableDescription,
    ) -> Result<(), GateError> {
        for row in 0..table.usable_rows_amount {
            for (g, gate) in self.gates.iter().enumerate() {
                if assignment.cell(&gate.selector(), row).is_zero() {
                    continue;
                }
                for (c, constraint) in gate.constraints.iter().enumerate() {
                    let res = constraint.evaluate_at_row(assignment, row);
                    if !res.is_zero() {
                        return Err(GateError::UnsatisfiedConstraint {
                            gate: g,
                            constraint: c,
                            row,
                        });
                    }
                }
            }
        }

        for (index, CopyConstraint(left, right)) in self.copy_constraints.iter().enumerate() {
            if assignment.cell(left, 0) != assignment.cell(right, 0) {
                return Err(GateError::CopyConstraintViolated {
                    index,
                    left: *left,
                    right: *right,
                });
            }
        }

        Ok(())
    }
}

impl<F: CanonicalSerialize + CanonicalDeserialize> ConstraintSystem<F> {
    /// A Blake2b digest of the MessagePack encoding of the constraint system,
    /// suitable to bind a transcript to a circuit.
    pub fn digest(&self) -> [u8; 32] {
        let encoded = match rmp_serde::to_vec(self) {
            Ok(bytes) => bytes,
            Err(e) => panic!("the constraint system could not be encoded: {e}"),
        };
        let mut hasher = Blake2b512::new();
        hasher.update(encoded);
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&hasher.finalize()[..32]);
        digest
    }
}
