//! The interface of the polynomial commitment scheme used by the
//! preprocessor, and a hash-based reference scheme.
//!
//! Committing is split in two phases: [CommitmentScheme::precommit] does the
//! expensive work (evaluating and hashing the polynomials) and keeps it for
//! the opening phase of the outer protocol, [CommitmentScheme::commit] only
//! extracts the short value that is sent to the verifier.

use ark_ff::FftField;
use ark_poly::{univariate::DensePolynomial, Evaluations, Radix2EvaluationDomain as D};
use ark_serialize::CanonicalSerialize;
use blake2::{digest::consts::U32, Blake2b, Digest};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::fmt;

use crate::serialization::SerdeAs;

type Blake2b256 = Blake2b<U32>;

/// Domains the commitment scheme evaluates polynomials over. Precommitments
/// of the preprocessor use the first one.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommitmentParams<F: FftField> {
    #[serde_as(as = "Vec<SerdeAs>")]
    pub domains: Vec<D<F>>,
}

impl<F: FftField> CommitmentParams<F> {
    pub fn new(domains: Vec<D<F>>) -> Self {
        CommitmentParams { domains }
    }
}

/// A scheme committing to a batch of polynomials at once.
pub trait CommitmentScheme<F: FftField> {
    type Precommitment: Clone + fmt::Debug;
    type Commitment: Clone + fmt::Debug + PartialEq;

    fn precommit(&self, polys: &[DensePolynomial<F>], domain: D<F>) -> Self::Precommitment;

    fn commit(&self, precommitment: &Self::Precommitment) -> Self::Commitment;
}

/// A binding but neither hiding nor succinctly openable commitment: each
/// polynomial is evaluated over the domain and hashed into a leaf, and the
/// commitment is the hash of the leaves.
#[derive(Copy, Clone, Debug, Default)]
pub struct HashCommitment;

/// The evaluations of a committed batch and their leaf digests.
#[derive(Clone, Debug, PartialEq)]
pub struct HashPrecommitment<F: FftField> {
    pub evaluations: Vec<Evaluations<F, D<F>>>,
    pub leaves: Vec<[u8; 32]>,
}

/// The digest of a committed batch.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest32(#[serde(with = "hex::serde")] pub [u8; 32]);

impl fmt::Debug for Digest32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest32({})", hex::encode(self.0))
    }
}

impl fmt::Display for Digest32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

fn leaf<F: FftField>(evals: &Evaluations<F, D<F>>) -> [u8; 32] {
    let mut bytes = Vec::with_capacity(evals.evals.compressed_size());
    if let Err(e) = evals.evals.serialize_compressed(&mut bytes) {
        panic!("the evaluations could not be encoded: {e}");
    }
    Blake2b256::digest(&bytes).into()
}

impl<F: FftField> CommitmentScheme<F> for HashCommitment {
    type Precommitment = HashPrecommitment<F>;
    type Commitment = Digest32;

    fn precommit(&self, polys: &[DensePolynomial<F>], domain: D<F>) -> HashPrecommitment<F> {
        let evaluations: Vec<_> = polys
            .iter()
            .map(|p| p.evaluate_over_domain_by_ref(domain))
            .collect();
        let leaves = evaluations.iter().map(leaf).collect();
        HashPrecommitment {
            evaluations,
            leaves,
        }
    }

    fn commit(&self, precommitment: &HashPrecommitment<F>) -> Digest32 {
        let mut hasher = Blake2b256::new();
        hasher.update((precommitment.leaves.len() as u64).to_be_bytes());
        for leaf in &precommitment.leaves {
            hasher.update(leaf);
        }
        Digest32(hasher.finalize().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_poly::{DenseUVPolynomial, EvaluationDomain};

    #[test]
    fn commitment_binds_order_and_content() {
        let domain = D::<Fr>::new(8).unwrap();
        let a = DensePolynomial::from_coefficients_vec(vec![Fr::from(1u64), Fr::from(2u64)]);
        let b = DensePolynomial::from_coefficients_vec(vec![Fr::from(3u64)]);

        let scheme = HashCommitment;
        let ab = scheme.commit(&scheme.precommit(&[a.clone(), b.clone()], domain));
        let ba = scheme.commit(&scheme.precommit(&[b.clone(), a.clone()], domain));
        let ab_again = scheme.commit(&scheme.precommit(&[a.clone(), b], domain));
        let a_only = scheme.commit(&scheme.precommit(&[a], domain));

        assert_eq!(ab, ab_again);
        assert_ne!(ab, ba);
        assert_ne!(ab, a_only);
        assert_eq!(format!("{ab}").len(), 64);
    }

    #[test]
    fn leaves_hash_compressed_evaluations() {
        let domain = D::<Fr>::new(4).unwrap();
        let p = DensePolynomial::from_coefficients_vec(vec![Fr::from(5u64), Fr::from(1u64)]);
        let precommitment = HashCommitment.precommit(&[p.clone()], domain);

        let evals = p.evaluate_over_domain(domain);
        let mut bytes = vec![];
        evals.evals.serialize_compressed(&mut bytes).unwrap();
        assert_eq!(bytes.len(), 4 * 32 + 8);
        let expected: [u8; 32] = Blake2b256::digest(&bytes).into();
        assert_eq!(precommitment.leaves, vec![expected]);
        assert_eq!(precommitment.evaluations, vec![evals]);
    }

    #[test]
    fn digest_serialization() {
        let d = Digest32([7u8; 32]);
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, format!("\"{}\"", "07".repeat(32)));
        let back: Digest32 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }
}
