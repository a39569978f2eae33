//! SDCA losses.
//!
//! - [`L2Entropy`]: per-example dual update and objective terms
//! - [`L2EntropyConfig`]: serializable parameters with validation
//! - [`batch`]: the same operations over a whole dataset
//!
//! # Usage
//!
//! ```
//! use entropy_sdca::solve::{L2Entropy, L2EntropyConfig};
//!
//! let loss = L2Entropy::<f32, f64, _>::from_config(&L2EntropyConfig::default()).unwrap();
//!
//! let mut variables = [0.0f32; 3];
//! let mut scores = [0.2f32, -0.1, 0.4];
//! loss.update_variables(0, 1.0, &mut variables, &mut scores);
//! assert_eq!(variables[0], 1.0);
//!
//! let mut scores = [0.2f32, -0.1, 0.4];
//! let terms = loss.regularized_loss(0, &variables, &mut scores);
//! let objectives = loss.primal_dual_gap(terms.regularizer, terms.primal_loss, terms.dual_loss);
//! assert!(objectives.duality_gap >= -1e-6);
//! ```

pub mod batch;
mod config;
mod l2_entropy;

pub use config::{ConfigError, L2EntropyConfig};
pub use l2_entropy::{L2Entropy, LossTerms, Objectives};
