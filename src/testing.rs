//! Testing utilities for entropy-sdca.
//!
//! Assertion helpers shared by unit tests, integration tests and benches.
//!
//! ```ignore
//! use entropy_sdca::testing::{assert_dual_feasible, assert_slices_approx_eq};
//! use entropy_sdca::assert_approx_eq;
//! ```

use crate::numeric::Float;

// =============================================================================
// Constants
// =============================================================================

/// Default tolerance for values computed in `f64`.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default tolerance for values stored in `f32`.
pub const DEFAULT_TOLERANCE_F32: f64 = 1e-5;

// =============================================================================
// Floating Point Assertions
// =============================================================================

/// Assert that two floating point values are approximately equal.
///
/// Uses absolute difference comparison with the given tolerance.
///
/// # Examples
///
/// ```
/// # use entropy_sdca::assert_approx_eq;
/// assert_approx_eq!(1.0f64, 1.0001f64, 0.001);
/// ```
///
/// # Panics
///
/// Panics if the absolute difference exceeds tolerance (or is NaN).
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $tolerance:expr) => {{
        let left_val = $left;
        let right_val = $right;
        let tol = $tolerance;
        let diff = (left_val - right_val).abs();
        if !(diff <= tol) {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`\n right: `{:?}`\n  diff: `{:?}` > tolerance `{:?}`",
                left_val, right_val, diff, tol
            );
        }
    }};
    ($left:expr, $right:expr, $tolerance:expr, $($arg:tt)+) => {{
        let left_val = $left;
        let right_val = $right;
        let tol = $tolerance;
        let diff = (left_val - right_val).abs();
        if !(diff <= tol) {
            panic!(
                "assertion failed: `(left ≈ right)` - {}\n  left: `{:?}`\n right: `{:?}`\n  diff: `{:?}` > tolerance `{:?}`",
                format_args!($($arg)+), left_val, right_val, diff, tol
            );
        }
    }};
}

/// Assert that two slices are approximately equal element-wise.
///
/// Elements are compared in `f64`.
///
/// # Panics
///
/// Panics if lengths differ or any element differs by more than tolerance.
pub fn assert_slices_approx_eq<A: Float, E: Float>(
    actual: &[A],
    expected: &[E],
    tolerance: f64,
    context: &str,
) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "{context}: length mismatch - got {}, expected {}",
        actual.len(),
        expected.len()
    );

    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        let (a, e): (f64, f64) = (a.cast(), e.cast());
        let diff = (a - e).abs();
        assert!(
            diff <= tolerance,
            "{context}[{i}]: {a} ≠ {e} (diff={diff}, tolerance={tolerance})"
        );
    }
}

// =============================================================================
// Dual Variable Assertions
// =============================================================================

/// Assert that `variables` is a feasible dual vector for `label`.
///
/// Checks `variables[label] == c` exactly, every other coordinate in
/// `[−c/k − tolerance, tolerance]`, and that those coordinates sum to `−c`
/// within `tolerance · max(1, c)`.
///
/// # Panics
///
/// Panics on the first violated condition.
pub fn assert_dual_feasible<D: Float>(
    variables: &[D],
    label: usize,
    c: f64,
    k: usize,
    tolerance: f64,
    context: &str,
) {
    assert!(label < variables.len(), "{context}: label {label} out of range");
    let label_value: f64 = variables[label].cast();
    assert_eq!(label_value, c, "{context}: label variable must equal C");

    let cap = c / k as f64;
    let mut total = 0.0;
    for (j, a) in variables.iter().enumerate().filter(|&(j, _)| j != label) {
        let a: f64 = a.cast();
        assert!(
            a <= tolerance && a >= -cap - tolerance,
            "{context}[{j}]: {a} outside [{}, 0]",
            -cap
        );
        total += a;
    }
    if variables.len() > 1 {
        assert!(
            (total + c).abs() <= tolerance * c.max(1.0),
            "{context}: non-label variables sum to {total}, expected {}",
            -c
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_approx_eq_macro() {
        assert_approx_eq!(1.0f32, 1.0001f32, 0.001);
        assert_approx_eq!(0.0f64, 0.0f64, 1e-10);
        assert_approx_eq!(-1.5f64, -1.5001f64, 0.001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq!(1.0f64, 2.0f64, 0.1);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_fails_on_nan() {
        assert_approx_eq!(f64::NAN, 1.0f64, 0.1);
    }

    #[test]
    fn test_assert_approx_eq_with_message() {
        assert_approx_eq!(1.0f64, 1.0001f64, 0.001, "testing value {}", 3);
    }

    #[test]
    fn test_slices_approx_eq_mixed_precision() {
        let actual = [1.0f32, 2.0, 3.0];
        let expected = [1.000001f64, 2.0, 2.999999];
        assert_slices_approx_eq(&actual, &expected, 1e-5, "test");
    }

    #[test]
    fn test_dual_feasible() {
        assert_dual_feasible(&[-0.25f64, 1.0, -0.75], 1, 1.0, 1, 1e-12, "k = 1");
        assert_dual_feasible(&[2.0f32, -1.0, -1.0], 0, 2.0, 2, 1e-6, "k = 2");
        assert_dual_feasible(&[3.0f64], 0, 3.0, 1, 1e-12, "single task");
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_dual_feasible_rejects_cap_violation() {
        assert_dual_feasible(&[1.0f64, -0.9, -0.1], 0, 1.0, 2, 1e-12, "cap");
    }
}
