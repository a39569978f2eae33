//! Proximal operators for the capped-entropy feasible set.
//!
//! The feasible set of the entropy loss is
//!
//! ```text
//! { x : Σ xᵢ = rhs, 0 ≤ xᵢ ≤ hi }
//! ```
//!
//! and both procedures here reduce to finding one scalar `t` (the multiplier
//! of the sum constraint) together with the set of coordinates clamped at
//! `hi`. Coordinates are sorted in decreasing order so that the clamped
//! coordinates form a prefix; the prefix length is found by binary search
//! over the breakpoints where a coordinate enters the cap.
//!
//! - [`prox_entropy`]: `min ½‖x‖² − ⟨v, x⟩ + ⟨x, log x⟩` (the dual update)
//! - [`thresholds_entropy_norm`]: `max ⟨a, x⟩ − ⟨x, log x⟩` (the primal loss)

mod entropy;

pub use entropy::{prox_entropy, thresholds_entropy, thresholds_entropy_norm};

/// Result of a threshold search.
///
/// Coordinates `[0, first)` of the (reordered) input are clamped at the cap;
/// the remaining ones are `f(vᵢ − t)` for the problem's link function `f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds<R> {
    /// Number of clamped coordinates (the split index).
    pub first: usize,
    /// Multiplier of the sum constraint.
    pub t: R,
}

impl<R> Thresholds<R> {
    /// `true` when no coordinate hits the cap.
    #[inline]
    pub fn is_unconstrained(&self) -> bool {
        self.first == 0
    }
}
