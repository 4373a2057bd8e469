//! RenderPolicy v1: significance pruning and depth-aware diagram density.
//!
//! ## Float Normalization for Deterministic Hashing
//!
//! Floats are quantized to integers before hashing so `params_hash` does not
//! depend on float formatting. The quantization factor is 1e6.

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use crate::DEFAULT_POLICY_VERSION;

/// Quantization factor for float normalization.
const FLOAT_QUANTIZATION_FACTOR: f64 = 1_000_000.0;

/// Error type for loading a policy.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// Policy JSON could not be parsed.
    #[error("Invalid policy JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// A parameter is out of range.
    #[error("Invalid policy parameter {name}: {reason}")]
    Invalid {
        /// Parameter name.
        name: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Quantize a float to an i64 for deterministic hashing.
fn quantize_float(value: f64) -> i64 {
    (value * FLOAT_QUANTIZATION_FACTOR).round() as i64
}

/// Quantized policy parameters for deterministic hashing.
#[derive(Debug, Clone, Serialize)]
struct QuantizedPolicyParams {
    version: String,
    significance_threshold: u64,
    depth_base: i64,
    depth_step: i64,
    scale_factor: i64,
    scale_exponent: i64,
    node_style: String,
    odd_depth_pattern: Option<String>,
}

/// Presentation policy for the tree emitter.
///
/// None of these parameters affect the tree itself, only what is reported
/// and how densely the diagram is drawn.
///
/// ## Parameters
///
/// - `significance_threshold`: regions with fewer cells are skipped along
///   with their whole subtree
/// - `depth_base`, `depth_step`: a region at depth `d` is drawn as its own
///   diagram node iff `area > depth_base - d * depth_step`
/// - `scale_factor`, `scale_exponent`: diagram node scale is
///   `scale_factor * (area / total_area) ^ scale_exponent`
/// - `node_style`: TikZ style applied to every diagram node
/// - `odd_depth_pattern`: fill pattern for nodes at odd depth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderPolicyV1 {
    /// Policy version identifier.
    pub version: String,
    /// Minimum area for a region to be reported.
    pub significance_threshold: u64,
    /// Area cutoff at depth 0.
    pub depth_base: i64,
    /// Cutoff decrease per level of depth.
    pub depth_step: i64,
    /// Multiplier of the visual weight.
    pub scale_factor: f64,
    /// Exponent applied to the area fraction.
    pub scale_exponent: f64,
    /// TikZ node style name.
    pub node_style: String,
    /// Pattern for odd-depth nodes (`None` disables hatching).
    pub odd_depth_pattern: Option<String>,
}

impl RenderPolicyV1 {
    /// Parse a policy from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, PolicyError> {
        let policy: Self = serde_json::from_str(json)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if !self.scale_factor.is_finite() || self.scale_factor <= 0.0 {
            return Err(PolicyError::Invalid {
                name: "scale_factor",
                reason: "must be finite and positive",
            });
        }
        if !self.scale_exponent.is_finite() || self.scale_exponent < 0.0 {
            return Err(PolicyError::Invalid {
                name: "scale_exponent",
                reason: "must be finite and non-negative",
            });
        }
        if self.node_style.is_empty() {
            return Err(PolicyError::Invalid {
                name: "node_style",
                reason: "must not be empty",
            });
        }
        Ok(())
    }

    /// Get the policy ID.
    pub fn policy_id(&self) -> &str {
        &self.version
    }

    /// Compute a hash of the policy parameters (floats quantized).
    pub fn params_hash(&self) -> String {
        canonical_hash_hex(&self.to_quantized())
    }

    fn to_quantized(&self) -> QuantizedPolicyParams {
        QuantizedPolicyParams {
            version: self.version.clone(),
            significance_threshold: self.significance_threshold,
            depth_base: self.depth_base,
            depth_step: self.depth_step,
            scale_factor: quantize_float(self.scale_factor),
            scale_exponent: quantize_float(self.scale_exponent),
            node_style: self.node_style.clone(),
            odd_depth_pattern: self.odd_depth_pattern.clone(),
        }
    }
}

impl Default for RenderPolicyV1 {
    fn default() -> Self {
        Self {
            version: DEFAULT_POLICY_VERSION.to_string(),
            significance_threshold: 10,
            depth_base: 520,
            depth_step: 160,
            scale_factor: 1.5,
            scale_exponent: 0.2,
            node_style: "arn_r".to_string(),
            odd_depth_pattern: Some("north east lines".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_hash_determinism() {
        assert_eq!(
            RenderPolicyV1::default().params_hash(),
            RenderPolicyV1::default().params_hash()
        );
    }

    #[test]
    fn test_params_hash_changes() {
        let p1 = RenderPolicyV1::default();
        let mut p2 = RenderPolicyV1::default();
        p2.depth_step = 100;
        assert_ne!(p1.params_hash(), p2.params_hash());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let p = RenderPolicyV1::from_json(r#"{"depth_base": 300}"#).unwrap();
        assert_eq!(p.depth_base, 300);
        assert_eq!(p.depth_step, 160);
        assert_eq!(p.significance_threshold, 10);
    }

    #[test]
    fn test_from_json_rejects_bad_scale() {
        let err = RenderPolicyV1::from_json(r#"{"scale_factor": 0.0}"#).unwrap_err();
        assert!(matches!(err, PolicyError::Invalid { name: "scale_factor", .. }));

        let err = RenderPolicyV1::from_json("{not json").unwrap_err();
        assert!(matches!(err, PolicyError::Parse(_)));
    }
}
