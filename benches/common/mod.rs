//! Shared setup for benchmarks.

#![allow(dead_code)]

pub mod criterion_config;

use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Random scores in `[-scale, scale]`, row-major `num_examples × num_tasks`.
pub fn random_scores(num_examples: usize, num_tasks: usize, scale: f64, seed: u64) -> Vec<f64> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    (0..num_examples * num_tasks)
        .map(|_| rng.gen_range(-scale..=scale))
        .collect()
}

/// Random labels in `0..num_tasks`.
pub fn random_labels(num_examples: usize, num_tasks: usize, seed: u64) -> Vec<usize> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    (0..num_examples).map(|_| rng.gen_range(0..num_tasks)).collect()
}
