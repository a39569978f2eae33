//! Lambert W function of an exponential.
//!
//! Computes `w = W₀(exp(x))`, i.e. the solution of
//!
//! ```text
//! w + ln(w) = x
//! ```
//!
//! over the whole real line without forming `exp(x)` (which would overflow for
//! `x > 709` in double precision). This is the building block of the entropy
//! projection: the optimality conditions of `½x² − vx + x·ln(x)` are solved by
//! `x = W₀(exp(v − t))`.
//!
//! # Algorithm
//!
//! A seed is picked per input range and refined with Householder's iteration
//! of order 5 for `w − z·exp(−w) = 0` (Fukushima 2013). The last refinement
//! always uses the exact `exp(x − w)`; earlier ones may use the cheap
//! [`exp_approx`]. Outside the refinement ranges the answer is returned
//! directly: `0` when `exp(x)` underflows, `exp(x)` when `w` is
//! indistinguishable from it, and `x` when `ln(w)` is below the resolution
//! of `x`.
//!
//! # Accuracy
//!
//! The residual `w + ln(w) − x` is targeted at `4·ε·max(1, |x|)` with
//! `ε = 2⁻⁵²` (`f64`) or `2⁻²³` (`f32`). The bound cannot hold where the
//! result is subnormal (`x < −708` for `f64`, `x < −87` for `f32`): there
//! `exp(x)` itself carries only a few significant bits.

use super::Float;

/// Omega constant `Ω = W(1)`, the solution of `x·exp(x) = 1` (OEIS A030178).
pub const OMEGA: f64 = 0.567_143_290_409_783_873;

/// One step of Householder's order-5 iteration for `w − z·exp(−w) = 0`.
///
/// Takes the current iterate `w` and `y = z·exp(−w)`; returns the next
/// iterate.
#[inline]
pub fn householder_step<T: Float>(w: T, y: T) -> T {
    let c = T::from_f64_lossy;
    let f0 = w - y;
    let f1 = T::one() + y;
    let f11 = f1 * f1;
    let f0y = f0 * y;
    let f00y = f0 * f0y;
    w - c(4.0) * f0 * (c(6.0) * f1 * (f11 + f0y) + f00y)
        / (f11 * (c(24.0) * f11 + c(36.0) * f0y) + f00y * (c(14.0) * y + f0 + c(8.0)))
}

/// Fast exponential `(1 + x/1024)^1024`, computed with 10 squarings.
///
/// Only good enough as an iteration seed: about `1e-3` relative error on
/// `[-5, 1]`, improving as `x → −∞` (below `2⁻⁵²` for `x ≤ −36`), useless
/// for `x > 1`.
#[inline]
pub fn exp_approx<T: Float>(x: T) -> T {
    let mut y = T::one() + x / T::from_f64_lossy(1024.0);
    for _ in 0..10 {
        y = y * y;
    }
    y
}

/// `W₀(exp(x))` at the precision of `x`.
#[inline]
pub fn lambert_w_exp<T: Float>(x: T) -> T {
    x.lambert_w_exp()
}

/// Largest `x` for which the `f64` refinement is still needed (`2⁵⁹`).
const F64_IDENTITY_ABOVE: f64 = 576_460_752_303_423_488.0;

/// Largest `x` for which the `f32` refinement is still needed (`2²⁹`).
const F32_IDENTITY_ABOVE: f32 = 536_870_912.0;

/// `W₀(exp(x))` in double precision.
///
/// | range of `x`     | seed / result                               |
/// |------------------|---------------------------------------------|
/// | `(-∞, -746]`     | `0` (`exp` underflows; also NaN)            |
/// | `(-746, -36]`    | `exp(x)`                                    |
/// | `(-36, -20]`     | `exp_approx(x)`, one refinement             |
/// | `(-20, 0]`       | `exp_approx(x)`, two refinements            |
/// | `(0, 4]`         | `x`, two refinements                        |
/// | `(4, 2⁵⁹]`       | `x − ln(x)`, two refinements                |
/// | `(2⁵⁹, +∞)`      | `x`                                         |
pub fn lambert_w_exp_f64(x: f64) -> f64 {
    let w = if x > 0.0 {
        if x <= 4.0 {
            householder_step(x, 1.0)
        } else if x <= F64_IDENTITY_ABOVE {
            // Single precision log is plenty for a seed.
            let w = x - f64::from((x as f32).ln());
            householder_step(w, x)
        } else {
            return x;
        }
    } else if x > -36.0 {
        let w = exp_approx(x);
        if x > -20.0 {
            householder_step(w, exp_approx(x - w))
        } else {
            w
        }
    } else if x > -746.0 {
        return x.exp();
    } else {
        return 0.0;
    };
    householder_step(w, (x - w).exp())
}

/// `W₀(exp(x))` in single precision.
///
/// | range of `x`     | seed / result                               |
/// |------------------|---------------------------------------------|
/// | `(-∞, -104]`     | `0` (`exp` underflows; also NaN)            |
/// | `(-104, -18]`    | `exp(x)`                                    |
/// | `(-18, -1]`      | `exp_approx(x)`, one refinement             |
/// | `(-1, 8]`        | `x`, two refinements                        |
/// | `(8, 2²⁹]`       | `x − ln(x)`, one refinement                 |
/// | `(2²⁹, +∞)`      | `x`                                         |
pub fn lambert_w_exp_f32(x: f32) -> f32 {
    let w = if x > -1.0 {
        if x <= 8.0 {
            householder_step(x, 1.0)
        } else if x <= F32_IDENTITY_ABOVE {
            return householder_step(x - x.ln(), x);
        } else {
            return x;
        }
    } else if x > -18.0 {
        exp_approx(x)
    } else if x > -104.0 {
        return x.exp();
    } else {
        return 0.0;
    };
    householder_step(w, (x - w).exp())
}
