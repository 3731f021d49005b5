//! The gate argument.
//!
//! Every constraint of every gate is weighted by a power of a challenge
//! `theta` and masked by the selector of its gate. The prover evaluates the
//! resulting polynomial over extended domains ([prove_eval]), the verifier
//! evaluates the same combination at a single point ([verify_eval]).
//!
//! To keep the extended domains small, constraints are sorted into degree
//! buckets: bucket `i` has a degree ceiling `limits[i]` and is evaluated over
//! a domain `limits[i]` times larger than the row domain. A constraint goes to
//! the bucket with the smallest ceiling that still bounds its degree.

use ark_ff::{PrimeField, Zero};
use ark_poly::{EvaluationDomain, Evaluations, Radix2EvaluationDomain as D};
use itertools::Itertools;
use log::{debug, trace};
use rayon::prelude::*;
use std::collections::HashMap;

use crate::{
    circuits::{
        constraint_system::ConstraintSystem,
        domains::extended_domain,
        expr::{constant, CachedEvaluator, Constraint, EvaluationMap, Expr},
        gate::Gate,
        table::{ColumnTable, PolynomialTable},
        variable::{ColumnType, Variable},
    },
    evaluations::ExtendedEvaluations,
    params::GateArgumentConfig,
    transcript::Transcript,
};

/// Number of polynomials produced by the gate argument.
pub const ARGUMENT_SIZE: usize = 1;

/// The degree ceilings of the buckets, loosest first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DegreeBuckets {
    limits: Vec<usize>,
}

impl DegreeBuckets {
    /// The first ceiling is `max_gates_degree` rounded up to a power of two;
    /// each of the following `buckets - 1` ceilings halves the previous one.
    /// Ceilings below one are dropped, so that there is always at least one
    /// bucket and every ceiling is a power of two.
    pub fn new(max_gates_degree: usize, buckets: usize) -> Self {
        let top = max_gates_degree.max(1).next_power_of_two();
        let limits = std::iter::successors(Some(top), |limit| Some(limit / 2))
            .take_while(|limit| *limit >= 1)
            .take(buckets.max(1))
            .collect();
        DegreeBuckets { limits }
    }

    pub fn limits(&self) -> &[usize] {
        &self.limits
    }

    pub fn len(&self) -> usize {
        self.limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }

    /// The tightest bucket whose ceiling bounds `degree`, searching from the
    /// last bucket down to the first.
    pub fn bucket_for(&self, degree: usize) -> Option<usize> {
        (0..self.limits.len())
            .rev()
            .find(|&i| self.limits[i] >= degree)
    }

    /// The size of the extended domain of each bucket, for a row domain of
    /// size `m`.
    pub fn extended_domain_sizes(&self, m: usize) -> Vec<usize> {
        self.limits.iter().map(|limit| m * limit).collect()
    }
}

/// Resolves every variable of `expr` to the polynomial of its column, shifted
/// by its rotation. Variables occurring more than once are widened to
/// `extended_domain` right away, since they are read several times.
pub fn build_variable_value_map<F: PrimeField>(
    expr: &Expr<F>,
    assignments: &PolynomialTable<F>,
    extended_domain: D<F>,
) -> HashMap<Variable, Evaluations<F, D<F>>> {
    expr.variable_counts()
        .into_par_iter()
        .map(|(var, count)| {
            let column = assignments.column(var.column_type, var.index);
            let mut assignment = if var.rotation != 0 {
                column.shift(var.rotation)
            } else {
                column.clone()
            };
            if count > 1 {
                assignment = assignment.widen(extended_domain);
            }
            (var, assignment)
        })
        .collect()
}

fn bucket_domain<F: PrimeField>(original_domain: &D<F>, limit: usize) -> D<F> {
    match extended_domain(original_domain, limit) {
        Ok(domain) => domain,
        Err(e) => panic!("the gate argument needs a domain {limit} times larger than the rows: {e}"),
    }
}

/// The selector-masked part of one gate that falls into one bucket.
struct GateTerm<F: PrimeField> {
    bucket: usize,
    expr: Expr<F>,
}

/// Splits the random linear combination of the constraints of `gates` into
/// per-gate terms, one for each bucket a gate has constraints in. The powers
/// of `theta` follow the order of the gates and of their constraints.
fn gate_terms<F: PrimeField>(
    gates: &[Gate<Constraint<F>>],
    buckets: &DegreeBuckets,
    theta: F,
) -> Vec<GateTerm<F>> {
    let mut terms = vec![];
    let mut theta_acc = F::one();

    for (g, gate) in gates.iter().enumerate() {
        let mut gate_results = vec![Expr::zero(); buckets.len()];

        for (c, constraint) in gate.constraints.iter().enumerate() {
            let next_term = constraint.clone() * constant(theta_acc);
            theta_acc *= theta;

            // +1 stands for the selector multiplication
            let degree = constraint.degree() + 1;
            match buckets.bucket_for(degree) {
                Some(i) => gate_results[i] += next_term,
                None => panic!(
                    "constraint {c} of gate {g} has degree {degree}, above every bucket ceiling {:?}",
                    buckets.limits()
                ),
            }
        }

        let selector: Expr<F> = gate.selector().into();
        terms.extend(
            gate_results
                .into_iter()
                .enumerate()
                .filter(|(_, result)| !result.is_zero())
                .map(|(bucket, result)| GateTerm {
                    bucket,
                    expr: result * selector.clone(),
                }),
        );
    }

    terms
}

fn evaluate_term<F: PrimeField>(
    expr: &Expr<F>,
    column_polynomials: &PolynomialTable<F>,
    domain: D<F>,
) -> Evaluations<F, D<F>> {
    let values = build_variable_value_map(expr, column_polynomials, domain);
    CachedEvaluator::new(domain, &values).evaluate(expr)
}

fn zero_evaluations<F: PrimeField>(domain: D<F>) -> Evaluations<F, D<F>> {
    Evaluations::from_vec_and_domain(vec![F::zero(); domain.size()], domain)
}

/// Computes the evaluations of the gate argument polynomial
/// `F_0(X) = sum_g q_g(X) * sum_k theta^k C_{g,k}(X)` over the largest
/// extended domain.
///
/// # Panics
///
/// Panics if `column_polynomials` lacks a column used by a gate, or if the
/// extended domains cannot be built for this field.
pub fn prove_eval<F: PrimeField, T: Transcript>(
    constraint_system: &ConstraintSystem<F>,
    column_polynomials: &PolynomialTable<F>,
    original_domain: D<F>,
    config: &GateArgumentConfig,
    transcript: &mut T,
) -> [Evaluations<F, D<F>>; ARGUMENT_SIZE] {
    let theta: F = transcript.challenge();

    let buckets = DegreeBuckets::new(constraint_system.max_gates_degree(), config.buckets);
    debug!(
        "gate argument: {} gates, degree limits [{}], extended domain sizes [{}]",
        constraint_system.num_gates(),
        buckets.limits().iter().join(", "),
        buckets.extended_domain_sizes(original_domain.size()).iter().join(", ")
    );

    let terms = gate_terms(constraint_system.gates(), &buckets, theta);

    // each gate term is evaluated on its own and summed into its bucket
    let largest = bucket_domain(&original_domain, buckets.limits()[0]);
    let results: Vec<Evaluations<F, D<F>>> = buckets
        .limits()
        .par_iter()
        .enumerate()
        .filter_map(|(i, limit)| {
            let bucket_terms: Vec<&Expr<F>> = terms
                .iter()
                .filter(|term| term.bucket == i)
                .map(|term| &term.expr)
                .collect();
            if bucket_terms.is_empty() {
                return None;
            }

            let domain = bucket_domain(&original_domain, *limit);
            trace!(
                "bucket {i}: {} gate terms over a domain of size {}",
                bucket_terms.len(),
                domain.size()
            );
            let sum = bucket_terms
                .into_par_iter()
                .map(|expr| evaluate_term(expr, column_polynomials, domain))
                .reduce(
                    || zero_evaluations(domain),
                    |mut acc, res| {
                        acc += &res;
                        acc
                    },
                );
            Some(sum.widen(largest))
        })
        .collect();

    let mut f = zero_evaluations(largest);
    for res in &results {
        f += res;
    }
    [f]
}

/// Evaluates the gate argument polynomial at the point the `evaluations`
/// were taken at.
///
/// # Panics
///
/// Panics if `evaluations` misses a variable of a gate or a selector.
pub fn verify_eval<F: PrimeField, T: Transcript>(
    gates: &[Gate<Constraint<F>>],
    evaluations: &EvaluationMap<F>,
    challenge: F,
    transcript: &mut T,
) -> [F; ARGUMENT_SIZE] {
    let theta: F = transcript.challenge();
    trace!("gate argument: verifying {} gates at {challenge}", gates.len());

    let mut f = [F::zero(); ARGUMENT_SIZE];
    let mut theta_acc = F::one();

    for gate in gates {
        let mut gate_result = F::zero();
        for constraint in &gate.constraints {
            gate_result += constraint.evaluate(evaluations) * theta_acc;
            theta_acc *= theta;
        }

        let selector_key = (gate.selector_index, 0, ColumnType::Selector);
        match evaluations.get(&selector_key) {
            Some(selector) => gate_result *= selector,
            None => panic!("no evaluation provided for selector {}", gate.selector_index),
        }

        f[0] += gate_result;
    }

    f
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn two_buckets() {
        let buckets = DegreeBuckets::new(3, 2);
        assert_eq!(buckets.limits(), &[4, 2]);
        assert_eq!(buckets.extended_domain_sizes(8), vec![32, 16]);
        assert_eq!(buckets.bucket_for(1), Some(1));
        assert_eq!(buckets.bucket_for(2), Some(1));
        assert_eq!(buckets.bucket_for(3), Some(0));
        assert_eq!(buckets.bucket_for(4), Some(0));
        assert_eq!(buckets.bucket_for(5), None);
    }

    #[test]
    fn single_bucket() {
        // a ceiling of one cannot be halved
        let buckets = DegreeBuckets::new(1, 2);
        assert_eq!(buckets.limits(), &[1]);
        assert_eq!(buckets.bucket_for(1), Some(0));
        assert_eq!(buckets.bucket_for(0), Some(0));
        assert_eq!(buckets.bucket_for(2), None);

        let buckets = DegreeBuckets::new(6, 1);
        assert_eq!(buckets.limits(), &[8]);
        assert_eq!(buckets.bucket_for(7), Some(0));
        assert_eq!(buckets.bucket_for(9), None);
    }

    #[test]
    fn no_gates() {
        let buckets = DegreeBuckets::new(0, 2);
        assert_eq!(buckets.limits(), &[1]);
        assert!(!buckets.is_empty());
    }

    proptest! {
        #[test]
        fn every_degree_has_a_tight_bucket(
            degrees in prop::collection::vec(0usize..40, 1..20),
            count in 1usize..5,
        ) {
            let max = degrees.iter().copied().max().unwrap_or(0);
            let buckets = DegreeBuckets::new(max, count);
            prop_assert!(buckets.limits()[0] >= max);
            for d in degrees {
                let i = buckets.bucket_for(d);
                prop_assert!(i.is_some());
                let i = i.unwrap();
                prop_assert!(buckets.limits()[i] >= d);
                // no tighter bucket would do
                for j in i + 1..buckets.len() {
                    prop_assert!(buckets.limits()[j] < d);
                }
            }
        }
    }
}
