//! This adds a few utility functions for the [Evaluations] arkworks type.

use ark_ff::FftField;
use ark_poly::{EvaluationDomain, Evaluations, Radix2EvaluationDomain as D};
use rayon::prelude::*;

/// An extension for the [Evaluations] type.
pub trait ExtendedEvaluations<F: FftField> {
    /// Multiplies every evaluation by `elm`.
    fn scale(&self, elm: F) -> Self;

    /// Adds `elm` to every evaluation.
    fn add_constant(&self, elm: F) -> Self;

    /// Raises every evaluation to the power `pow`.
    fn pow(&self, pow: u64) -> Self;

    /// Cyclic shift along the domain: the result at point `j` is the input at
    /// point `j + rotation`, i.e. the polynomial `p(omega^rotation * X)`.
    /// Negative rotations wrap around.
    fn shift(&self, rotation: i32) -> Self;

    /// Re-evaluates the underlying polynomial over `target_domain`.
    ///
    /// # Panics
    ///
    /// Panics if `target_domain` is smaller than the current domain.
    fn widen(&self, target_domain: D<F>) -> Self;
}

impl<F: FftField> ExtendedEvaluations<F> for Evaluations<F, D<F>> {
    fn scale(&self, elm: F) -> Self {
        let mut result = self.clone();
        result.evals.par_iter_mut().for_each(|e| *e *= elm);
        result
    }

    fn add_constant(&self, elm: F) -> Self {
        let mut result = self.clone();
        result.evals.par_iter_mut().for_each(|e| *e += elm);
        result
    }

    fn pow(&self, pow: u64) -> Self {
        let mut result = self.clone();
        result.evals.par_iter_mut().for_each(|e| *e = e.pow([pow]));
        result
    }

    fn shift(&self, rotation: i32) -> Self {
        let size = self.evals.len();
        if size == 0 {
            return self.clone();
        }
        let offset = (rotation as i64).rem_euclid(size as i64) as usize;
        let mut evals = Vec::with_capacity(size);
        evals.extend_from_slice(&self.evals[offset..]);
        evals.extend_from_slice(&self.evals[..offset]);
        Evaluations::from_vec_and_domain(evals, self.domain())
    }

    fn widen(&self, target_domain: D<F>) -> Self {
        let current = self.domain().size();
        let target = target_domain.size();
        assert!(
            target >= current,
            "cannot widen evaluations from a domain of size {current} to one of size {target}"
        );
        if target == current {
            return self.clone();
        }
        self.interpolate_by_ref().evaluate_over_domain(target_domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_ff::Field;
    use ark_poly::Polynomial;

    fn column(values: &[u64], domain: D<Fr>) -> Evaluations<Fr, D<Fr>> {
        Evaluations::from_vec_and_domain(values.iter().map(|v| Fr::from(*v)).collect(), domain)
    }

    #[test]
    fn shift_wraps_in_both_directions() {
        let domain = D::<Fr>::new(4).unwrap();
        let evals = column(&[1, 2, 3, 4], domain);

        assert_eq!(evals.shift(1).evals, column(&[2, 3, 4, 1], domain).evals);
        assert_eq!(evals.shift(-1).evals, column(&[4, 1, 2, 3], domain).evals);
        assert_eq!(evals.shift(4).evals, evals.evals);
    }

    #[test]
    fn shift_matches_rotated_polynomial() {
        let domain = D::<Fr>::new(8).unwrap();
        let evals = column(&[3, 1, 4, 1, 5, 9, 2, 6], domain);
        let shifted = evals.shift(3).interpolate();
        let original = evals.interpolate();

        let x = Fr::from(12345u64);
        let omega3 = domain.group_gen.pow([3u64]);
        assert_eq!(shifted.evaluate(&x), original.evaluate(&(omega3 * x)));
    }

    #[test]
    fn widen_keeps_the_polynomial() {
        let small = D::<Fr>::new(4).unwrap();
        let large = D::<Fr>::new(16).unwrap();
        let evals = column(&[7, 0, 2, 5], small);
        let wide = evals.widen(large);

        assert_eq!(wide.evals.len(), 16);
        // the base domain is the subgroup made of every fourth point
        for (i, value) in evals.evals.iter().enumerate() {
            assert_eq!(wide.evals[4 * i], *value);
        }
    }
}
