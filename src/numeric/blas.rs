//! Level-1 vector primitives over contiguous buffers.
//!
//! The dual update only needs a scaled combination and a dot product over
//! length-`num_tasks` slices; both are thin wrappers over `ndarray` views so
//! the storage precision `D` picks up `ndarray`'s vectorized kernels.

use ndarray::{ArrayView1, ArrayViewMut1};

use super::Float;

/// `y := alpha·x + beta·y`.
#[inline]
pub fn axpby<D: Float>(alpha: D, x: &[D], beta: D, y: &mut [D]) {
    debug_assert_eq!(x.len(), y.len());
    let x = ArrayView1::from(x);
    let mut y = ArrayViewMut1::from(y);
    y.zip_mut_with(&x, |yi, &xi| *yi = alpha * xi + beta * *yi);
}

/// `⟨x, y⟩` in storage precision.
#[inline]
pub fn dot<D: Float>(x: &[D], y: &[D]) -> D {
    debug_assert_eq!(x.len(), y.len());
    ArrayView1::from(x).dot(&ArrayView1::from(y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axpby_combines() {
        let x = [1.0f32, 2.0, 3.0];
        let mut y = [4.0f32, 5.0, 6.0];
        axpby(1.0, &x, -2.0, &mut y);
        assert_eq!(y, [-7.0, -8.0, -9.0]);
    }

    #[test]
    fn test_axpby_beta_zero_overwrites() {
        let x = [1.5f64, -2.0];
        let mut y = [10.0f64, 20.0];
        axpby(2.0, &x, 0.0, &mut y);
        assert_eq!(y, [3.0, -4.0]);
    }

    #[test]
    fn test_dot_product() {
        assert_eq!(dot(&[1.0f64, 2.0, 3.0], &[4.0, -5.0, 6.0]), 12.0);
        assert_eq!(dot::<f32>(&[], &[]), 0.0);
    }
}
