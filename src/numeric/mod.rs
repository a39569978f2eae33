//! Numeric building blocks shared by the projection and loss code.
//!
//! - [`Float`]: precision abstraction for storage (`D`) and accumulation (`R`) types
//! - [`lambert`]: Lambert W of an exponential, `W₀(exp(x))`
//! - [`summation`]: plain and compensated accumulation strategies
//! - [`blas`]: the two vector primitives the dual update consumes
//!
//! # Precision Model
//!
//! Dual variables and scores live in a storage type `D` (usually `f32`) while
//! every scalar that is accumulated or compared (thresholds, losses, the
//! regularization constants) lives in a result type `R` (usually `f64`). The
//! two are chosen independently; conversions go through [`Float::cast`].

pub mod blas;
pub mod lambert;
pub mod summation;

use std::fmt;
use std::iter::Sum;

use ndarray::LinalgScalar;
use num_traits::AsPrimitive;

pub use lambert::{exp_approx, householder_step, lambert_w_exp, OMEGA};
pub use summation::{KahanSum, StdSum, Summation, SummationKind};

/// Floating point type usable as storage or accumulation precision.
///
/// Implemented for `f32` and `f64`. The per-precision Lambert-W dispatch is
/// part of the trait because the two precisions use different range
/// thresholds.
pub trait Float:
    num_traits::Float
    + AsPrimitive<f64>
    + LinalgScalar
    + Default
    + Sum
    + Send
    + Sync
    + fmt::Debug
    + fmt::Display
{
    /// Short precision name used in diagnostics.
    const NAME: &'static str;

    /// The Omega constant `W(1)` at this precision.
    const OMEGA: Self;

    /// Convert from `f64`, rounding to nearest when narrowing.
    fn from_f64_lossy(x: f64) -> Self;

    /// Convert between precisions (`f32 → f64` is exact).
    #[inline]
    fn cast<T: Float>(self) -> T {
        T::from_f64_lossy(self.as_())
    }

    /// `W₀(exp(self))`, see [`lambert::lambert_w_exp`].
    fn lambert_w_exp(self) -> Self;
}

impl Float for f32 {
    const NAME: &'static str = "f32";
    const OMEGA: Self = OMEGA as f32;

    #[inline]
    fn from_f64_lossy(x: f64) -> Self {
        x as f32
    }

    #[inline]
    fn lambert_w_exp(self) -> Self {
        lambert::lambert_w_exp_f32(self)
    }
}

impl Float for f64 {
    const NAME: &'static str = "f64";
    const OMEGA: Self = OMEGA;

    #[inline]
    fn from_f64_lossy(x: f64) -> Self {
        x
    }

    #[inline]
    fn lambert_w_exp(self) -> Self {
        lambert::lambert_w_exp_f64(self)
    }
}
