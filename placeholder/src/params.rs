//! Parameters of the Placeholder arguments.

use ark_ff::FftField;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::serialization::SerdeAs;

/// Configuration of the gate argument.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateArgumentConfig {
    /// Number of degree buckets. The first bucket's ceiling is the maximum
    /// gate degree rounded up to a power of two, each following bucket
    /// halves it.
    pub buckets: usize,
}

impl Default for GateArgumentConfig {
    fn default() -> Self {
        GateArgumentConfig { buckets: 2 }
    }
}

#[serde_as]
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "F: FftField")]
pub struct PlaceholderParams<F: FftField> {
    /// Column separator of the permutation argument: cell `(i, j)` is
    /// encoded as `delta^i * omega^j`.
    #[serde_as(as = "SerdeAs")]
    pub delta: F,
    #[serde(default)]
    pub gate_argument: GateArgumentConfig,
}

impl<F: FftField> Default for PlaceholderParams<F> {
    fn default() -> Self {
        PlaceholderParams {
            delta: F::GENERATOR,
            gate_argument: GateArgumentConfig::default(),
        }
    }
}

impl<F: FftField> PlaceholderParams<F> {
    pub fn with_delta(mut self, delta: F) -> Self {
        self.delta = delta;
        self
    }

    pub fn with_buckets(mut self, buckets: usize) -> Self {
        self.gate_argument.buckets = buckets;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;

    #[test]
    fn config_from_json() {
        let config: GateArgumentConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, GateArgumentConfig::default());

        let params = PlaceholderParams::<Fr>::default().with_buckets(3);
        let json = serde_json::to_string(&params).unwrap();
        let back: PlaceholderParams<Fr> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
        assert_eq!(back.gate_argument.buckets, 3);
    }
}
