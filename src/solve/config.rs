//! Configuration for the `l2_entropy` loss.
//!
//! # Example
//!
//! ```
//! use entropy_sdca::solve::L2EntropyConfig;
//! use entropy_sdca::numeric::SummationKind;
//!
//! let config = L2EntropyConfig::builder()
//!     .k(2)
//!     .c(0.5)
//!     .summation(SummationKind::Standard)
//!     .build();
//! assert!(config.validate().is_ok());
//!
//! let config: L2EntropyConfig = serde_json::from_str(r#"{ "k": 3 }"#).unwrap();
//! assert_eq!(config.c, 1.0);
//! ```

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::numeric::SummationKind;

// =============================================================================
// ConfigError
// =============================================================================

/// Errors reported when validating an [`L2EntropyConfig`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The cap divisor must be at least 1.
    #[error("k must be >= 1, got {0}")]
    InvalidK(usize),

    /// The loss scale must be finite and positive.
    #[error("C must be finite and > 0, got {0}")]
    InvalidC(f64),
}

// =============================================================================
// L2EntropyConfig
// =============================================================================

/// Parameters of the `l2_entropy` loss.
///
/// Missing fields take their defaults when deserializing.
#[derive(Clone, Debug, PartialEq, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct L2EntropyConfig {
    /// Cap divisor: every non-label dual variable is bounded by `C/k`
    /// (default: 1).
    #[builder(default = 1)]
    pub k: usize,
    /// Loss scale `C` (default: 1.0).
    #[builder(default = 1.0)]
    pub c: f64,
    /// Accumulation strategy (default: Kahan).
    #[builder(default)]
    pub summation: SummationKind,
}

impl Default for L2EntropyConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl L2EntropyConfig {
    /// Check that the parameters define a loss.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.k == 0 {
            return Err(ConfigError::InvalidK(self.k));
        }
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(ConfigError::InvalidC(self.c));
        }
        Ok(())
    }
}
