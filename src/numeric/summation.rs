//! Summation strategies.
//!
//! The loss and projection code accumulate many signed terms (entropy terms,
//! exponentials, Lambert-W values). How they are accumulated is a precision
//! choice made once, when the loss is constructed:
//!
//! - [`StdSum`]: plain running sum, fastest, error grows with the number of terms
//! - [`KahanSum`]: compensated summation, error bound independent of the number
//!   of terms at roughly four times the arithmetic
//! - [`SummationKind`]: runtime selection of one of the above (for configs)
//!
//! All strategies are stateless `Copy` values; the running compensation of an
//! incremental accumulation is owned by the caller, see [`Summation::add`].

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Float;

/// Accumulation algorithm for floating point sums.
pub trait Summation: Copy + Send + Sync + fmt::Debug {
    /// Name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Add `value` to `sum`, carrying the rounding error in `compensation`.
    ///
    /// Start a custom loop with `compensation = 0`; strategies that do not
    /// compensate leave it untouched.
    fn add<R: Float>(&self, value: R, sum: &mut R, compensation: &mut R);

    /// Sum `values` starting from `init`.
    #[inline]
    fn reduce<R: Float, I: IntoIterator<Item = R>>(&self, values: I, init: R) -> R {
        let mut sum = init;
        let mut compensation = R::zero();
        for value in values {
            self.add(value, &mut sum, &mut compensation);
        }
        sum
    }

    /// Sum a storage-precision slice in result precision.
    #[inline]
    fn reduce_slice<D: Float, R: Float>(&self, values: &[D], init: R) -> R {
        self.reduce(values.iter().map(|&v| v.cast::<R>()), init)
    }
}

// =============================================================================
// Plain summation
// =============================================================================

/// Ordinary left-to-right summation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StdSum;

impl Summation for StdSum {
    fn name(&self) -> &'static str {
        "std"
    }

    #[inline]
    fn add<R: Float>(&self, value: R, sum: &mut R, _compensation: &mut R) {
        *sum = *sum + value;
    }

    #[inline]
    fn reduce<R: Float, I: IntoIterator<Item = R>>(&self, values: I, init: R) -> R {
        values.into_iter().fold(init, |acc, v| acc + v)
    }
}

// =============================================================================
// Compensated summation
// =============================================================================

/// Kahan compensated summation.
///
/// ```text
/// y = value − c
/// t = sum + y
/// c = (t − sum) − y
/// sum = t
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KahanSum;

impl Summation for KahanSum {
    fn name(&self) -> &'static str {
        "kahan"
    }

    #[inline]
    fn add<R: Float>(&self, value: R, sum: &mut R, compensation: &mut R) {
        let y = value - *compensation;
        let t = *sum + y;
        *compensation = (t - *sum) - y;
        *sum = t;
    }
}

// =============================================================================
// Runtime selection
// =============================================================================

/// Summation strategy chosen at run time (e.g. from a config file).
///
/// Dispatches to [`StdSum`] or [`KahanSum`]. Prefer the concrete types when
/// the choice is known at compile time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummationKind {
    /// Plain running sum.
    Standard,
    /// Kahan compensated sum.
    #[default]
    Kahan,
}

impl Summation for SummationKind {
    fn name(&self) -> &'static str {
        match self {
            SummationKind::Standard => StdSum.name(),
            SummationKind::Kahan => KahanSum.name(),
        }
    }

    #[inline]
    fn add<R: Float>(&self, value: R, sum: &mut R, compensation: &mut R) {
        match self {
            SummationKind::Standard => StdSum.add(value, sum, compensation),
            SummationKind::Kahan => KahanSum.add(value, sum, compensation),
        }
    }

    #[inline]
    fn reduce<R: Float, I: IntoIterator<Item = R>>(&self, values: I, init: R) -> R {
        match self {
            SummationKind::Standard => StdSum.reduce(values, init),
            SummationKind::Kahan => KahanSum.reduce(values, init),
        }
    }
}
