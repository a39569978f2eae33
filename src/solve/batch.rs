//! Dataset-level helpers over row-major `n × num_tasks` buffers.
//!
//! Row `i` of `variables` and `scores` belongs to example `i`. Examples are
//! independent, so rows may be processed in parallel; per-example results
//! are collected in row order and reduced with the loss's summation strategy,
//! which makes the output independent of [`Parallelism`].

use super::l2_entropy::{L2Entropy, LossTerms, Objectives};
use crate::numeric::{Float, Summation};
use crate::utils::Parallelism;

/// Apply [`L2Entropy::update_variables`] to every example.
///
/// `norm2_inv[i]` is `1/‖xᵢ‖²`. `scores` is invalid afterwards.
pub fn update_all<D, R, S>(
    loss: &L2Entropy<D, R, S>,
    labels: &[usize],
    norm2_inv: &[D],
    variables: &mut [D],
    scores: &mut [D],
    parallelism: Parallelism,
) where
    D: Float,
    R: Float,
    S: Summation,
{
    debug_assert_eq!(labels.len(), norm2_inv.len());
    let Some(num_tasks) = row_len(labels.len(), variables.len(), scores.len()) else {
        return;
    };

    let rows: Vec<_> = labels
        .iter()
        .zip(norm2_inv)
        .zip(variables.chunks_mut(num_tasks).zip(scores.chunks_mut(num_tasks)))
        .map(|((&label, &n2i), (v, s))| (label, n2i, v, s))
        .collect();

    parallelism.maybe_par_for_each(rows, |(label, n2i, v, s)| {
        loss.update_variables(label, n2i, v, s)
    });
}

/// Sum [`L2Entropy::regularized_loss`] over every example.
///
/// `scores` is invalid afterwards.
pub fn sum_loss_terms<D, R, S>(
    loss: &L2Entropy<D, R, S>,
    labels: &[usize],
    variables: &[D],
    scores: &mut [D],
    parallelism: Parallelism,
) -> LossTerms<R>
where
    D: Float,
    R: Float,
    S: Summation,
{
    let Some(num_tasks) = row_len(labels.len(), variables.len(), scores.len()) else {
        return LossTerms::default();
    };

    let rows: Vec<_> = labels
        .iter()
        .zip(variables.chunks(num_tasks).zip(scores.chunks_mut(num_tasks)))
        .map(|(&label, (v, s))| (label, v, s))
        .collect();

    let terms = parallelism.maybe_par_map(rows, |(label, v, s)| loss.regularized_loss(label, v, s));

    let sum = loss.summation();
    LossTerms {
        regularizer: sum.reduce(terms.iter().map(|t| t.regularizer), R::zero()),
        primal_loss: sum.reduce(terms.iter().map(|t| t.primal_loss), R::zero()),
        dual_loss: sum.reduce(terms.iter().map(|t| t.dual_loss), R::zero()),
    }
}

/// Objectives of the whole dataset.
///
/// `scores` is invalid afterwards.
pub fn evaluate<D, R, S>(
    loss: &L2Entropy<D, R, S>,
    labels: &[usize],
    variables: &[D],
    scores: &mut [D],
    parallelism: Parallelism,
) -> Objectives<R>
where
    D: Float,
    R: Float,
    S: Summation,
{
    let terms = sum_loss_terms(loss, labels, variables, scores, parallelism);
    log::trace!(
        "evaluated {} examples: regularizer = {}, primal = {}, dual = {}",
        labels.len(),
        terms.regularizer,
        terms.primal_loss,
        terms.dual_loss
    );
    loss.primal_dual_gap(terms.regularizer, terms.primal_loss, terms.dual_loss)
}

/// Row length shared by both buffers, `None` for an empty batch.
fn row_len(num_rows: usize, variables_len: usize, scores_len: usize) -> Option<usize> {
    debug_assert_eq!(variables_len, scores_len, "variables and scores differ in length");
    if num_rows == 0 {
        return None;
    }
    debug_assert_eq!(variables_len % num_rows, 0, "buffer is not n × num_tasks");
    Some(variables_len / num_rows).filter(|&n| n > 0)
}
