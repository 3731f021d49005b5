//! Lagrange basis polynomials and the boundary selectors of the table.

use ark_ff::FftField;
use ark_poly::{
    univariate::DensePolynomial, EvaluationDomain, Evaluations, Radix2EvaluationDomain as D,
};

/// Interpolates the 0/1 indicator produced by `f` over the rows of `domain`.
fn indicator<F: FftField>(domain: D<F>, f: impl Fn(usize) -> bool) -> DensePolynomial<F> {
    let evals = (0..domain.size())
        .map(|j| if f(j) { F::one() } else { F::zero() })
        .collect();
    Evaluations::from_vec_and_domain(evals, domain).interpolate()
}

/// The Lagrange polynomial that is one on the `index`-th element of `domain`
/// and zero on the others.
pub fn lagrange_polynomial<F: FftField>(domain: D<F>, index: usize) -> DensePolynomial<F> {
    assert!(
        index < domain.size(),
        "lagrange polynomial {index} requested on a domain of size {}",
        domain.size()
    );
    indicator(domain, |j| j == index)
}

/// One on the rows strictly after `usable_rows`, zero elsewhere (including
/// row `usable_rows` itself).
pub fn selector_last<F: FftField>(
    table_size: usize,
    usable_rows: usize,
    domain: D<F>,
) -> DensePolynomial<F> {
    assert_eq!(table_size, domain.size());
    indicator(domain, |j| j > usable_rows)
}

/// One on row `usable_rows` only.
pub fn selector_blind<F: FftField>(
    table_size: usize,
    usable_rows: usize,
    domain: D<F>,
) -> DensePolynomial<F> {
    assert_eq!(table_size, domain.size());
    indicator(domain, |j| j == usable_rows)
}
