//! This module describes the evaluation domains used by the preprocessor and
//! the gate argument.

use ark_ff::FftField;
use ark_poly::{EvaluationDomain, Radix2EvaluationDomain as D};

use crate::error::DomainCreationError;

/// Creates the row domain of a table with `rows` rows.
pub fn create_domain<F: FftField>(rows: usize) -> Result<D<F>, DomainCreationError> {
    let n = D::<F>::compute_size_of_domain(rows).ok_or(DomainCreationError::DomainSizeFailed(rows))?;
    D::<F>::new(n).ok_or(DomainCreationError::DomainConstructionFailed(
        "basic".to_string(),
        n,
    ))
}

/// Creates a domain of size `factor * basic.size()` whose `factor`-th
/// powers form `basic`.
pub fn extended_domain<F: FftField>(
    basic: &D<F>,
    factor: usize,
) -> Result<D<F>, DomainCreationError> {
    let size = basic.size() * factor;
    let extended = D::<F>::new(size).ok_or(DomainCreationError::DomainConstructionFailed(
        format!("d{factor}"),
        size,
    ))?;

    // ensure the relationship between the domains in case the
    // library's behavior changes
    debug_assert_eq!(extended.group_gen.pow([factor as u64]), basic.group_gen);

    Ok(extended)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;

    #[test]
    fn domain_sizes() {
        let d1 = create_domain::<Fr>(8).unwrap();
        assert_eq!(d1.size(), 8);

        // non powers of two are rounded up
        let d = create_domain::<Fr>(5).unwrap();
        assert_eq!(d.size(), 8);

        let d4 = extended_domain(&d1, 4).unwrap();
        assert_eq!(d4.size(), 32);
        assert_eq!(d4.element(4), d1.element(1));
    }

    #[test]
    fn domain_too_large() {
        // bn254 has a two-adicity of 28
        assert!(extended_domain(&create_domain::<Fr>(1 << 20).unwrap(), 1 << 10).is_err());
    }
}
