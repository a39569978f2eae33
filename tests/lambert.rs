//! Accuracy of `W₀(exp(x))` over the whole real line.
//!
//! The target is `|w + ln(w) − x| ≤ 4·ε·max(1, |x|)`. Evaluating the residual
//! itself rounds `w` and `ln(w)`, so the checks add `ε·(|w| + |ln(w)|)` of
//! slack. Inputs whose result is subnormal are excluded.

mod common;

use approx::assert_relative_eq;
use entropy_sdca::numeric::lambert::{lambert_w_exp_f32, lambert_w_exp_f64};
use entropy_sdca::numeric::{exp_approx, Float};
use entropy_sdca::{lambert_w_exp, OMEGA};
use rand::Rng;
use rstest::rstest;

fn check_f64(x: f64) {
    let w = lambert_w_exp_f64(x);
    assert!(w.is_finite() && w > 0.0, "x = {x}: w = {w}");
    let residual = w + w.ln() - x;
    let tol = 4.0 * f64::EPSILON * x.abs().max(1.0) + f64::EPSILON * (w.abs() + w.ln().abs());
    assert!(
        residual.abs() <= tol,
        "x = {x}: residual {residual:e} > {tol:e}"
    );
}

fn check_f32(x: f32) {
    let w = lambert_w_exp_f32(x);
    assert!(w.is_finite() && w > 0.0, "x = {x}: w = {w}");
    // Residual in double so that only the result's own rounding counts.
    let (xd, wd) = (f64::from(x), f64::from(w));
    let residual = wd + wd.ln() - xd;
    let eps = f64::from(f32::EPSILON);
    let tol = 4.0 * eps * xd.abs().max(1.0) + eps * (wd.abs() + wd.ln().abs());
    assert!(
        residual.abs() <= tol,
        "x = {x}: residual {residual:e} > {tol:e}"
    );
}

// =============================================================================
// Dense grids
// =============================================================================

#[test]
fn f64_dense_grid_near_zero() {
    let mut x = -40.0;
    while x <= 40.0 {
        check_f64(x);
        x += 1.0 / 64.0 + 1e-7;
    }
}

#[test]
fn f64_log_spaced_grid() {
    for sign in [-1.0, 1.0] {
        let mut magnitude = 1e-300f64;
        while magnitude < 1e300 {
            let x = sign * magnitude;
            if x >= -700.0 {
                check_f64(x);
            }
            magnitude *= 1.37;
        }
    }
}

#[test]
fn f64_random_arguments() {
    let mut rng = common::rng(7);
    for _ in 0..20_000 {
        check_f64(rng.gen_range(-700.0..700.0));
    }
    for _ in 0..2_000 {
        check_f64(rng.gen_range(700.0..1e19));
    }
}

#[test]
fn f32_dense_grid() {
    let mut x = -87.0f32;
    while x <= 100.0 {
        check_f32(x);
        x += 0.0625 + 1e-4;
    }
}

#[test]
fn f32_log_spaced_grid() {
    let mut magnitude = 1e-30f32;
    while magnitude < 1e30 {
        check_f32(magnitude);
        if -magnitude >= -87.0 {
            check_f32(-magnitude);
        }
        magnitude *= 1.7;
    }
}

// =============================================================================
// Fixed points and branch edges
// =============================================================================

#[rstest]
#[case(-745.9)]
#[case(-36.0)]
#[case(-35.999_999)]
#[case(-20.0)]
#[case(-19.999_999)]
#[case(0.0)]
#[case(1e-300)]
#[case(4.0)]
#[case(4.000_001)]
#[case(576_460_752_303_423_488.0)]
fn f64_branch_edges(#[case] x: f64) {
    if x >= -700.0 {
        check_f64(x);
    } else {
        assert_eq!(lambert_w_exp_f64(x), x.exp());
    }
}

#[rstest]
#[case(-18.0)]
#[case(-17.999)]
#[case(-1.0)]
#[case(-0.999)]
#[case(8.0)]
#[case(8.001)]
#[case(536_870_912.0)]
fn f32_branch_edges(#[case] x: f32) {
    check_f32(x);
}

#[test]
fn omega_constant() {
    assert!((lambert_w_exp(0.0f64) - 0.567_143_290_409_783_84).abs() < 1e-9);
    assert_relative_eq!(lambert_w_exp(0.0f64), OMEGA, max_relative = 2.0 * f64::EPSILON);
    assert_relative_eq!(lambert_w_exp(0.0f32), <f32 as Float>::OMEGA, max_relative = 2.0 * f32::EPSILON);
}

#[test]
fn extremes() {
    for x in [-800.0, -1e5, f64::MIN] {
        assert_eq!(lambert_w_exp(x), 0.0);
    }
    for x in [5.7647e17, 1e18, 1e200, f64::MAX] {
        assert_eq!(lambert_w_exp(x), x);
    }
    for x in [-200.0f32, f32::MIN] {
        assert_eq!(lambert_w_exp(x), 0.0);
    }
    for x in [6e8f32, 1e30, f32::MAX] {
        assert_eq!(lambert_w_exp(x), x);
    }
}

#[test]
fn f32_agrees_with_f64() {
    let mut x = -80.0f32;
    while x < 80.0 {
        let single = f64::from(lambert_w_exp(x));
        let double = lambert_w_exp(f64::from(x));
        // Rounding of x − w in single precision scales with |x|.
        let eps = f64::from(f32::EPSILON);
        let tol = eps * (4.0 * f64::from(x.abs()).max(1.0) + 4.0);
        assert_relative_eq!(single, double, max_relative = tol);
        x += 0.31;
    }
}

#[test]
fn exp_approx_seed_quality() {
    // Seed accuracy on the refinement range; the refinement does the rest.
    let mut x = -20.0f64;
    while x <= 0.0 {
        assert_relative_eq!(exp_approx(x), x.exp(), max_relative = 0.2);
        x += 0.5;
    }
}
