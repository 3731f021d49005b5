//! The preprocessor derives, from a constraint system and the shape of its
//! table, the data shared by the prover and the verifier ([PublicPreprocessor])
//! and the witness polynomials only the prover knows ([PrivatePreprocessor]).
//!
//! Both halves are independent and can run concurrently.

use ark_ff::FftField;
use ark_poly::{univariate::DensePolynomial, DenseUVPolynomial, Radix2EvaluationDomain as D};
use log::debug;

use crate::{
    circuits::{
        constraint_system::ConstraintSystem,
        domains::create_domain,
        expr::Expr,
        polynomials::{
            permutation::{identity_polynomials, permutation_polynomials, CycleRepresentation},
            selectors::{lagrange_polynomial, selector_blind, selector_last},
        },
        table::{
            PrivateAssignment, PrivatePolynomialTable, PublicAssignment, PublicPolynomialTable,
            TableDescription,
        },
        variable::Variable,
    },
    commitment::{CommitmentParams, CommitmentScheme},
    error::SetupError,
    params::PlaceholderParams,
};

/// One value per batch of public polynomials. Used both for the
/// precommitments and for the commitments derived from them.
#[derive(Clone, Debug, PartialEq)]
pub struct PublicCommitments<T> {
    pub id_permutation: T,
    pub sigma_permutation: T,
    pub public_input: T,
    pub constant: T,
    pub selector: T,
    /// `(q_last, q_blind)`, in this order
    pub special_selectors: T,
}

impl<T> PublicCommitments<T> {
    /// Applies `f` to every batch, in declaration order.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> PublicCommitments<U> {
        PublicCommitments {
            id_permutation: f(&self.id_permutation),
            sigma_permutation: f(&self.sigma_permutation),
            public_input: f(&self.public_input),
            constant: f(&self.constant),
            selector: f(&self.selector),
            special_selectors: f(&self.special_selectors),
        }
    }
}

/// Data used by both the prover and the verifier.
#[derive(Clone, Debug)]
pub struct CommonData<F: FftField, C> {
    pub basic_domain: D<F>,
    /// `X^n - 1`, where `n` is the number of rows
    pub z: DensePolynomial<F>,
    pub lagrange_0: DensePolynomial<F>,
    pub commitments: PublicCommitments<C>,
    /// For every column of the table (global index), the rotations at which
    /// gates and lookups read it. Always contains 0.
    pub columns_rotations: Vec<Vec<i32>>,
    pub rows_amount: usize,
}

/// The output of [PublicPreprocessor::process]. The fields outside of
/// `common_data` are only used by the prover.
#[derive(Clone, Debug)]
pub struct PublicPreprocessedData<F: FftField, S: CommitmentScheme<F>> {
    pub public_polynomial_table: PublicPolynomialTable<F>,
    /// `S_sigma`
    pub permutation_polynomials: Vec<DensePolynomial<F>>,
    /// `S_id`
    pub identity_polynomials: Vec<DensePolynomial<F>>,
    pub q_last: DensePolynomial<F>,
    pub q_blind: DensePolynomial<F>,
    pub precommitments: PublicCommitments<S::Precommitment>,
    pub common_data: CommonData<F, S::Commitment>,
}

/// The output of [PrivatePreprocessor::process].
#[derive(Clone, Debug)]
pub struct PrivatePreprocessedData<F: FftField> {
    pub basic_domain: D<F>,
    pub private_polynomial_table: PrivatePolynomialTable<F>,
}

/// Collects, for every column of the table, the rotations at which relative
/// variables of gates and lookup inputs read it. Rotations keep the order in
/// which they are first met and 0 is appended when absent.
pub fn columns_rotations<F>(cs: &ConstraintSystem<F>, table: &TableDescription) -> Vec<Vec<i32>> {
    let mut result: Vec<Vec<i32>> = vec![vec![]; table.table_width()];
    let mut record = |v: &Variable| {
        if v.relative {
            let rotations = &mut result[table.global_index(v)];
            if !rotations.contains(&v.rotation) {
                rotations.push(v.rotation);
            }
        }
    };

    for gate in cs.gates() {
        for constraint in &gate.constraints {
            constraint.for_each_variable(&mut record);
        }
    }
    for gate in cs.lookup_gates() {
        for constraint in &gate.constraints {
            constraint
                .lookup_input
                .iter()
                .for_each(|input: &Expr<F>| input.for_each_variable(&mut record));
        }
    }

    for rotations in result.iter_mut() {
        if !rotations.contains(&0) {
            rotations.push(0);
        }
    }
    result
}

/// `X^n - 1`
fn vanishing_skeleton<F: FftField>(rows_amount: usize) -> DensePolynomial<F> {
    let mut coeffs = vec![F::zero(); rows_amount + 1];
    coeffs[0] = -F::one();
    coeffs[rows_amount] = F::one();
    DensePolynomial::from_coefficients_vec(coeffs)
}

/// Builds the data shared by the prover and the verifier.
pub struct PublicPreprocessor;

impl PublicPreprocessor {
    /// Precommits to every batch of public polynomials over `domain`.
    fn precommitments<F: FftField, S: CommitmentScheme<F>>(
        scheme: &S,
        domain: D<F>,
        public_table: &PublicPolynomialTable<F>,
        id_perm_polys: &[DensePolynomial<F>],
        sigma_perm_polys: &[DensePolynomial<F>],
        q_last: &DensePolynomial<F>,
        q_blind: &DensePolynomial<F>,
    ) -> PublicCommitments<S::Precommitment> {
        let interpolate = |columns: &[ark_poly::Evaluations<F, D<F>>]| -> Vec<DensePolynomial<F>> {
            columns.iter().map(|c| c.interpolate_by_ref()).collect()
        };

        let id_permutation = scheme.precommit(id_perm_polys, domain);
        let sigma_permutation = scheme.precommit(sigma_perm_polys, domain);
        let public_input = scheme.precommit(&interpolate(&public_table.public_inputs), domain);
        let constant = scheme.precommit(&interpolate(&public_table.constants), domain);
        let selector = scheme.precommit(&interpolate(&public_table.selectors), domain);
        let special_selectors = scheme.precommit(&[q_last.clone(), q_blind.clone()], domain);

        PublicCommitments {
            id_permutation,
            sigma_permutation,
            public_input,
            constant,
            selector,
            special_selectors,
        }
    }

    pub fn process<F: FftField, S: CommitmentScheme<F>>(
        cs: &ConstraintSystem<F>,
        public_assignment: &PublicAssignment<F>,
        table: &TableDescription,
        params: &PlaceholderParams<F>,
        scheme: &S,
        commitment_params: &CommitmentParams<F>,
        columns_with_copy_constraints: usize,
    ) -> Result<PublicPreprocessedData<F, S>, SetupError> {
        table.validate()?;
        public_assignment.validate(table)?;
        if columns_with_copy_constraints > table.permutable_columns() {
            return Err(SetupError::PermutationTooWide(
                columns_with_copy_constraints,
                table.permutable_columns(),
            ));
        }
        let commitment_domain = *commitment_params
            .domains
            .first()
            .ok_or(SetupError::MissingCommitmentDomain)?;

        let rows = table.rows_amount;
        let usable_rows = table.usable_rows_amount;
        let basic_domain = create_domain::<F>(rows)?;

        debug!(
            "public preprocessing: {} rows ({} usable), {} gates, {} copy constraints",
            rows,
            usable_rows,
            cs.num_gates(),
            cs.copy_constraints().len()
        );

        let permutation = CycleRepresentation::new(cs, table);
        let permutation_polynomials = permutation_polynomials(
            columns_with_copy_constraints,
            params.delta,
            &permutation,
            basic_domain,
        );
        let identity_polynomials =
            identity_polynomials(columns_with_copy_constraints, params.delta, basic_domain);

        let lagrange_0 = lagrange_polynomial(basic_domain, 0);
        let q_last = selector_last(rows, usable_rows, basic_domain);
        let q_blind = selector_blind(rows, usable_rows, basic_domain);

        let public_polynomial_table = PublicPolynomialTable::new(public_assignment, basic_domain);

        let z = vanishing_skeleton(rows);

        let precommitments = Self::precommitments(
            scheme,
            commitment_domain,
            &public_polynomial_table,
            &identity_polynomials,
            &permutation_polynomials,
            &q_last,
            &q_blind,
        );
        let commitments = precommitments.map(|p| scheme.commit(p));

        let columns_rotations = columns_rotations(cs, table);
        debug!("columns rotations: {:?}", columns_rotations);

        Ok(PublicPreprocessedData {
            public_polynomial_table,
            permutation_polynomials,
            identity_polynomials,
            q_last,
            q_blind,
            precommitments,
            common_data: CommonData {
                basic_domain,
                z,
                lagrange_0,
                commitments,
                columns_rotations,
                rows_amount: rows,
            },
        })
    }
}

/// Builds the witness polynomials of the prover.
pub struct PrivatePreprocessor;

impl PrivatePreprocessor {
    pub fn process<F: FftField>(
        cs: &ConstraintSystem<F>,
        private_assignment: &PrivateAssignment<F>,
        table: &TableDescription,
    ) -> Result<PrivatePreprocessedData<F>, SetupError> {
        table.validate()?;
        private_assignment.validate(table)?;

        let basic_domain = create_domain::<F>(table.rows_amount)?;
        debug!(
            "private preprocessing: {} witness columns for {} gates",
            table.witness_columns,
            cs.num_gates()
        );

        Ok(PrivatePreprocessedData {
            basic_domain,
            private_polynomial_table: PrivatePolynomialTable::new(private_assignment, basic_domain),
        })
    }
}
