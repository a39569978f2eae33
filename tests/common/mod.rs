//! Seeded input generation for integration tests.
//!
//! For assertion helpers, use `entropy_sdca::testing`.

#![allow(dead_code)]

use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;

#[allow(unused_imports)]
pub use entropy_sdca::assert_approx_eq;
#[allow(unused_imports)]
pub use entropy_sdca::testing::{
    assert_dual_feasible, assert_slices_approx_eq, DEFAULT_TOLERANCE, DEFAULT_TOLERANCE_F32,
};

/// Deterministic generator shared by all tests.
pub fn rng(seed: u64) -> Xoshiro256PlusPlus {
    Xoshiro256PlusPlus::seed_from_u64(seed)
}

/// One example of a synthetic problem.
#[derive(Debug, Clone)]
pub struct Example {
    pub label: usize,
    pub norm2_inv: f64,
    pub scores: Vec<f64>,
}

/// Random example with scores in `[-scale, scale]` and `1/‖x‖²` in `[0.05, 5]`.
pub fn random_example(rng: &mut impl Rng, num_tasks: usize, scale: f64) -> Example {
    Example {
        label: rng.gen_range(0..num_tasks),
        norm2_inv: rng.gen_range(0.05..5.0),
        scores: (0..num_tasks)
            .map(|_| rng.gen_range(-scale..=scale))
            .collect(),
    }
}

/// Feasible dual vector: `α[label] = c`, the rest `−c·p` for a random
/// probability vector `p` capped at `1/k`.
///
/// Built as a convex combination of the uniform vector (always feasible when
/// `num_tasks − 1 ≥ k`) and a random capped point, so it stays strictly
/// inside the box.
pub fn random_feasible(
    rng: &mut impl Rng,
    num_tasks: usize,
    label: usize,
    c: f64,
    k: usize,
) -> Vec<f64> {
    let others = num_tasks - 1;
    assert!(others >= k, "need at least k non-label classes");

    let weights: Vec<f64> = (0..others).map(|_| rng.gen_range(0.0..1.0)).collect();
    let total: f64 = weights.iter().sum();
    let cap = 1.0 / k as f64;
    let uniform = 1.0 / others as f64;
    // Shrink the random point towards uniform until it respects the cap.
    let max_w = weights.iter().copied().fold(0.0, f64::max) / total;
    let lambda = if max_w <= cap {
        0.5
    } else {
        0.5 * (cap - uniform) / (max_w - uniform)
    };

    let mut probs = weights
        .iter()
        .map(|&w| lambda * w / total + (1.0 - lambda) * uniform);
    (0..num_tasks)
        .map(|j| {
            if j == label {
                c
            } else {
                probs.next().map_or(0.0, |p| -c * p)
            }
        })
        .collect()
}

/// Row-major batch of examples.
#[derive(Debug, Clone)]
pub struct Batch {
    pub num_tasks: usize,
    pub labels: Vec<usize>,
    pub norm2_inv: Vec<f64>,
    pub scores: Vec<f64>,
}

pub fn random_batch(seed: u64, num_examples: usize, num_tasks: usize, scale: f64) -> Batch {
    let mut rng = rng(seed);
    let mut batch = Batch {
        num_tasks,
        labels: Vec::with_capacity(num_examples),
        norm2_inv: Vec::with_capacity(num_examples),
        scores: Vec::with_capacity(num_examples * num_tasks),
    };
    for _ in 0..num_examples {
        let example = random_example(&mut rng, num_tasks, scale);
        batch.labels.push(example.label);
        batch.norm2_inv.push(example.norm2_inv);
        batch.scores.extend(example.scores);
    }
    batch
}
