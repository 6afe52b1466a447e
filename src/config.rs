//! Kernel configuration
//!
//! Tunable thresholds for storage layout and algorithm dispatch. The
//! defaults match the documented behavior of the kernel; embedders that
//! know their workload can override them per call through the `_with`
//! operation variants.

use serde::{Deserialize, Serialize};

use crate::error::{AbacusError, Result};

/// Runtime configuration for the abacus kernel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelConfig {
    /// A store is kept sparse when its non-zero density over the exponent
    /// span is below this fraction. Default: 0.30.
    pub sparse_density_threshold: f64,

    /// Multiplication switches to the NTT path when both operands have
    /// more non-zero digit positions than this. Default: 256.
    pub ntt_digit_threshold: usize,

    /// Backstop iteration cap for Newton-Raphson loops that carry a
    /// convergence test. Default: 64.
    pub newton_iteration_cap: u32,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            sparse_density_threshold: 0.30,
            ntt_digit_threshold: 256,
            newton_iteration_cap: 64,
        }
    }
}

impl KernelConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.sparse_density_threshold) {
            return Err(AbacusError::Config(format!(
                "sparse_density_threshold must be in [0, 1], got {}",
                self.sparse_density_threshold
            )));
        }
        if self.ntt_digit_threshold < 2 {
            return Err(AbacusError::Config(format!(
                "ntt_digit_threshold must be >= 2, got {}",
                self.ntt_digit_threshold
            )));
        }
        if self.newton_iteration_cap == 0 {
            return Err(AbacusError::Config(
                "newton_iteration_cap must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Load from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| AbacusError::Config(format!("JSON parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(KernelConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_threshold() {
        let cfg = KernelConfig {
            sparse_density_threshold: 1.5,
            ..KernelConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_from_json() {
        let cfg = KernelConfig::from_json(
            r#"{"sparse_density_threshold":0.25,"ntt_digit_threshold":128,
                "newton_iteration_cap":32}"#,
        )
        .unwrap();
        assert_eq!(cfg.ntt_digit_threshold, 128);

        assert!(KernelConfig::from_json("{").is_err());
    }
}
