//! Entropy projections onto `{ x : Σ xᵢ = rhs, 0 ≤ xᵢ ≤ hi }`.
//!
//! # Entropy proximal operator
//!
//! ```text
//! min_x  ½‖x‖² − ⟨v, x⟩ + ⟨x, log x⟩
//! s.t.   Σ xᵢ = rhs,  0 ≤ xᵢ ≤ hi
//! ```
//!
//! Optimality gives `xᵢ = min(hi, W₀(exp(vᵢ − t)))`. Coordinate `i` is clamped
//! exactly when `vᵢ − t ≥ hi + ln(hi)`, so clamped coordinates are the largest
//! ones. For a fixed clamped prefix of length `m`,
//!
//! ```text
//! g(t) = Σ_{i ≥ m} W₀(exp(vᵢ − t)) − (rhs − m·hi)
//! ```
//!
//! is convex and decreasing in `t`; Newton's method started left of the root
//! increases monotonically towards it.
//!
//! # Entropy-norm thresholds
//!
//! ```text
//! max_x  ⟨a, x⟩ − ⟨x, log x⟩
//! s.t.   Σ xᵢ = rhs,  0 ≤ xᵢ ≤ hi
//! ```
//!
//! Optimality gives `xᵢ = min(hi, exp(aᵢ − t))`; once the clamped prefix is
//! known `t` has a closed form (a shifted log-sum-exp).

use std::cmp::Ordering;

use super::Thresholds;
use crate::numeric::{Float, Summation};

/// Newton iteration cap for the projection multiplier.
const MAX_NEWTON_ITERATIONS: usize = 64;

/// Entropy proximal operator.
///
/// Projects `values` in place (see the module docs for the problem solved).
/// `scratch` must hold at least `values.len()` elements; its contents are
/// overwritten.
///
/// If `values.len() · hi ≤ rhs` the sum constraint cannot be met below the
/// cap and every coordinate is set to `hi`.
pub fn prox_entropy<D, R, S>(values: &mut [D], scratch: &mut [D], hi: R, rhs: R, sum: &S)
where
    D: Float,
    R: Float,
    S: Summation,
{
    if values.is_empty() {
        return;
    }

    let thresholds = thresholds_entropy(values, scratch, hi, rhs, sum);
    if thresholds.first == values.len() {
        let hi = hi.cast::<D>();
        values.iter_mut().for_each(|x| *x = hi);
        return;
    }

    // The search decides which coordinates sit at the cap; the largest
    // `first` values are clamped regardless of rounding in `t`.
    let clamp_from = thresholds.first.checked_sub(1).map(|j| scratch[j]);
    let t = thresholds.t;
    for x in values.iter_mut() {
        let projected = match clamp_from {
            Some(pivot) if *x >= pivot => hi,
            _ => (x.cast::<R>() - t).lambert_w_exp().min(hi),
        };
        *x = projected.cast();
    }
}

/// Clamped prefix length and multiplier for [`prox_entropy`].
///
/// `values` is left untouched; a copy sorted in decreasing order is placed in
/// `scratch[..values.len()]`. `first == values.len()` signals the saturated
/// case (`len · hi ≤ rhs`), in which `t` is the breakpoint of the smallest
/// coordinate.
///
/// `t` is found by Newton's method safeguarded with bisection and always lies
/// between the breakpoints of the last clamped and the first free coordinate.
pub fn thresholds_entropy<D, R, S>(
    values: &[D],
    scratch: &mut [D],
    hi: R,
    rhs: R,
    sum: &S,
) -> Thresholds<R>
where
    D: Float,
    R: Float,
    S: Summation,
{
    let n = values.len();
    debug_assert!(scratch.len() >= n, "scratch shorter than values");
    let sorted = &mut scratch[..n];
    sorted.copy_from_slice(values);
    sort_decreasing(sorted);
    let sorted = &*sorted;

    // vᵢ − t ≥ cap ⇔ W₀(exp(vᵢ − t)) ≥ hi
    let cap = hi + hi.ln();
    if n == 0 {
        return Thresholds {
            first: 0,
            t: R::neg_infinity(),
        };
    }
    if is_saturated(n, hi, rhs) {
        return Thresholds {
            first: n,
            t: sorted[n - 1].cast::<R>() - cap,
        };
    }

    // Coordinate j is clamped iff g is non-positive at its breakpoint t = v_j − cap.
    let first = prefix_len(n, |j| {
        let vj = sorted[j].cast::<R>();
        let clamped = R::from_f64_lossy((j + 1) as f64) * hi;
        let total = sum.reduce(
            sorted[j + 1..]
                .iter()
                .map(|&v| (v.cast::<R>() - vj + cap).lambert_w_exp()),
            clamped,
        );
        total <= rhs
    });

    let target = rhs - R::from_f64_lossy(first as f64) * hi;
    let free = &sorted[first..];

    // The root lies between the breakpoint of the first free coordinate
    // (g > 0) and that of the last clamped one (g ≤ 0). Without a clamped
    // coordinate, W₀(exp(u)) ≤ exp(u) bounds g from above.
    let mut lower = free[0].cast::<R>() - cap;
    let mut upper = match first.checked_sub(1) {
        Some(j) => sorted[j].cast::<R>() - cap,
        None => sorted[0].cast::<R>() + R::from_f64_lossy(n as f64).ln() - rhs.ln(),
    };
    if target <= R::zero() {
        // Clamped mass already meets rhs; the free coordinates vanish.
        return Thresholds { first, t: upper };
    }
    if upper <= lower {
        return Thresholds { first, t: lower };
    }

    let tolerance = R::from_f64_lossy(4.0) * R::epsilon();
    let half = R::from_f64_lossy(0.5);
    let mut t = lower;

    for iteration in 1..=MAX_NEWTON_ITERATIONS {
        let (mut total, mut total_c) = (R::zero(), R::zero());
        let (mut slope, mut slope_c) = (R::zero(), R::zero());
        for &v in free {
            let w = (v.cast::<R>() - t).lambert_w_exp();
            sum.add(w, &mut total, &mut total_c);
            sum.add(w / (R::one() + w), &mut slope, &mut slope_c);
        }
        let g = total - target;
        if g > R::zero() {
            lower = t;
        } else if g < R::zero() {
            upper = t;
        } else {
            log::trace!("entropy projection: exact root after {iteration} iterations");
            return Thresholds { first, t };
        }

        // Newton steps that leave the bracket fall back to bisection.
        let newton = t + g / slope;
        let next = if slope > R::zero() && newton > lower && newton < upper {
            newton
        } else {
            lower + half * (upper - lower)
        };
        let step = next - t;
        t = next;

        let scale = tolerance * t.abs().max(R::one());
        if step.abs() <= scale || upper - lower <= scale {
            log::trace!("entropy projection: converged in {iteration} iterations");
            return Thresholds { first, t };
        }
    }

    log::warn!(
        "entropy projection: no convergence after {MAX_NEWTON_ITERATIONS} iterations (bracket width {})",
        upper - lower
    );
    Thresholds { first, t }
}

/// Clamped prefix and multiplier of the entropy-norm problem.
///
/// Reorders `values` in place so that the clamped coordinates come first
/// (decreasing order). `first == 0` means nothing is clamped and
/// `t = ln(Σ exp(aᵢ)) − ln(rhs)`. In the saturated case (`len · hi ≤ rhs`)
/// every coordinate is clamped, `first == len`.
pub fn thresholds_entropy_norm<D, R, S>(values: &mut [D], hi: R, rhs: R, sum: &S) -> Thresholds<R>
where
    D: Float,
    R: Float,
    S: Summation,
{
    let n = values.len();
    sort_decreasing(values);
    let values = &*values;

    let log_hi = hi.ln();
    if n == 0 {
        return Thresholds {
            first: 0,
            t: R::neg_infinity(),
        };
    }
    if is_saturated(n, hi, rhs) {
        return Thresholds {
            first: n,
            t: values[n - 1].cast::<R>() - log_hi,
        };
    }

    // Breakpoint of coordinate j is t = a_j − ln(hi); there exp(aᵢ − t) = hi·exp(aᵢ − a_j).
    let shifted_sum = |from: usize, pivot: R| {
        sum.reduce(
            values[from..].iter().map(|&a| (a.cast::<R>() - pivot).exp()),
            R::zero(),
        )
    };
    let first = prefix_len(n, |j| {
        let aj = values[j].cast::<R>();
        let count = R::from_f64_lossy((j + 1) as f64);
        hi * (count + shifted_sum(j + 1, aj)) <= rhs
    });

    let pivot = values[first].cast::<R>();
    let remaining = rhs - R::from_f64_lossy(first as f64) * hi;
    let t = pivot + shifted_sum(first, pivot).ln() - remaining.ln();
    Thresholds { first, t }
}

// =============================================================================
// Helpers
// =============================================================================

/// Whether `n` coordinates at the cap `hi` cannot exceed `rhs`.
///
/// Allows a few ulps so that e.g. `k · (1/k) == 1` counts as saturated.
#[inline]
fn is_saturated<R: Float>(n: usize, hi: R, rhs: R) -> bool {
    let slack = R::one() + R::from_f64_lossy(4.0) * R::epsilon();
    R::from_f64_lossy(n as f64) * hi <= rhs * slack
}

/// Length of the prefix of `0..n` on which the monotone predicate holds.
#[inline]
fn prefix_len(n: usize, mut holds: impl FnMut(usize) -> bool) -> usize {
    let (mut lo, mut hi) = (0, n);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if holds(mid) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

#[inline]
fn sort_decreasing<D: Float>(values: &mut [D]) {
    values.sort_unstable_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
}
