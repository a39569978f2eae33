//! entropy-sdca: entropy-regularized multiclass SDCA dual updates.
//!
//! This crate provides the per-example pieces of a stochastic dual coordinate
//! ascent solver for the `l2_entropy` multiclass loss: the dual variable
//! update, the primal and dual loss terms, and the duality gap.
//!
//! # Modules
//!
//! - [`numeric`]: precision abstraction, `W₀(exp(x))`, summation strategies
//! - [`prox`]: entropy projections onto the capped simplex
//! - [`solve`]: the [`L2Entropy`](solve::L2Entropy) loss and batch helpers
//! - [`utils`]: parallelism switch
//!
//! The outer SDCA loop (example selection, score computation, stopping) is
//! left to the caller.

pub mod numeric;
pub mod prox;
pub mod solve;
pub mod testing;
pub mod utils;

pub use numeric::{lambert_w_exp, Float, KahanSum, StdSum, Summation, SummationKind, OMEGA};
pub use solve::{ConfigError, L2Entropy, L2EntropyConfig, LossTerms, Objectives};
pub use utils::Parallelism;
