//! The `l2_entropy` loss: entropy-regularized multiclass dual update.
//!
//! # Variables
//!
//! Each example owns a dual vector `α` of length `num_tasks`. A feasible
//! vector has `α[label] = C` and the remaining coordinates in `[−C/k, 0]`
//! summing to `−C`, i.e. `−α/C` restricted to the non-label classes is a
//! probability vector capped at `1/k`.
//!
//! # Update
//!
//! Given the example's scores `s` and `1/‖x‖²`:
//!
//! ```text
//! v  = s − ‖x‖²·α                       (non-label coordinates)
//! x  = prox_entropy(v, hi = ‖x‖²·C/k, rhs = ‖x‖²·C)
//! α' = −x / ‖x‖²,   α'[label] = C
//! ```
//!
//! # Objectives
//!
//! The primal loss of one example is
//!
//! ```text
//! L(s) = max { ⟨s − s_label, p⟩ − ⟨p, log p⟩ : Σp = 1, 0 ≤ p ≤ 1/k }
//! ```
//!
//! and the dual loss is `C·log C + Σ_{α_j < 0} α_j·ln(−α_j)`.
//!
//! # Buffers
//!
//! `scores` is write-then-invalidate for both [`L2Entropy::update_variables`]
//! and [`L2Entropy::regularized_loss`]: it is used as scratch space and holds
//! no meaningful values afterwards.

use std::fmt;
use std::marker::PhantomData;

use super::config::{ConfigError, L2EntropyConfig};
use crate::numeric::blas::{axpby, dot};
use crate::numeric::{Float, KahanSum, Summation, SummationKind};
use crate::prox::{prox_entropy, thresholds_entropy_norm};

// =============================================================================
// Diagnostics
// =============================================================================

/// Per-example (or summed) loss terms.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LossTerms<R> {
    /// `⟨scores, α⟩`.
    pub regularizer: R,
    /// `L(scores)`, not yet scaled by `C`.
    pub primal_loss: R,
    /// Dual loss including the `C·log C` label term.
    pub dual_loss: R,
}

/// Primal and dual objective values with their gap.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Objectives<R> {
    /// `C·L + ½·regularizer`.
    pub primal_objective: R,
    /// `dual_loss − ½·regularizer`.
    pub dual_objective: R,
    /// `primal_objective − dual_objective`; non-negative up to rounding.
    pub duality_gap: R,
}

// =============================================================================
// L2Entropy
// =============================================================================

/// Dual update and objective computation for the `l2_entropy` loss.
///
/// - `D`: storage precision of dual variables and scores
/// - `R`: precision of thresholds and accumulated diagnostics
/// - `S`: summation strategy
///
/// The loss holds only immutable constants; one instance can be shared by
/// reference across threads that work on disjoint examples.
#[derive(Clone, Copy)]
pub struct L2Entropy<D, R, S = KahanSum> {
    k: usize,
    c: R,
    c_div_k: R,
    log_c: R,
    c_log_c: R,
    k_inv: R,
    log_k: R,
    sum: S,
    _storage: PhantomData<fn() -> D>,
}

impl<D: Float, R: Float, S: Summation> L2Entropy<D, R, S> {
    /// Create the loss for cap divisor `k ≥ 1` and scale `C > 0`.
    ///
    /// Parameters are not validated beyond debug assertions; use
    /// [`L2Entropy::from_config`] for untrusted input.
    pub fn new(k: usize, c: R, sum: S) -> Self {
        debug_assert!(k >= 1, "k must be >= 1");
        debug_assert!(c > R::zero() && c.is_finite(), "C must be finite and > 0");

        let k_r = R::from_f64_lossy(k as f64);
        let log_c = c.ln();
        Self {
            k,
            c,
            c_div_k: c / k_r,
            log_c,
            c_log_c: c * log_c,
            k_inv: R::one() / k_r,
            log_k: k_r.ln(),
            sum,
            _storage: PhantomData,
        }
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    #[inline]
    pub fn c(&self) -> R {
        self.c
    }

    /// `ln C`.
    #[inline]
    pub fn log_c(&self) -> R {
        self.log_c
    }

    #[inline]
    pub fn summation(&self) -> &S {
        &self.sum
    }

    /// Update the dual variables of one example.
    ///
    /// `variables` and `scores` have length `num_tasks`; `norm2_inv` is
    /// `1/‖x‖²` of the example. On return `variables[label] == C` and the
    /// other coordinates lie in `[−C/k, 0]` and sum to `−C` (up to rounding).
    /// `scores` is invalid afterwards.
    pub fn update_variables(
        &self,
        label: usize,
        norm2_inv: D,
        variables: &mut [D],
        scores: &mut [D],
    ) {
        let num_tasks = variables.len();
        debug_assert_eq!(scores.len(), num_tasks, "scores and variables differ in length");
        debug_assert!(label < num_tasks, "label {label} out of range");
        debug_assert!(norm2_inv > D::zero(), "norm2_inv must be > 0");

        let norm2 = R::one() / norm2_inv.cast::<R>();
        let rhs = norm2 * self.c;
        let hi = norm2 * self.c_div_k;

        // v = s − ‖x‖²·α
        axpby(D::one(), scores, -norm2.cast::<D>(), variables);

        let last = num_tasks - 1;
        variables.swap(label, last);
        scores.swap(label, last);

        let (head, tail) = variables.split_at_mut(last);
        prox_entropy(head, &mut scores[..last], hi, rhs, &self.sum);

        let scale = -norm2_inv;
        head.iter_mut().for_each(|a| *a = *a * scale);
        tail[0] = self.c.cast();

        variables.swap(label, last);
    }

    /// Loss terms of one example.
    ///
    /// Returns the regularizer `⟨scores, variables⟩`, the primal loss of the
    /// scores and the dual loss of the variables. `scores` is invalid
    /// afterwards.
    pub fn regularized_loss(&self, label: usize, variables: &[D], scores: &mut [D]) -> LossTerms<R> {
        debug_assert_eq!(scores.len(), variables.len(), "scores and variables differ in length");
        debug_assert!(label < scores.len(), "label {label} out of range");

        let regularizer = dot(scores, variables).cast::<R>();

        let dual_loss = self.sum.reduce(
            variables
                .iter()
                .map(|&a| a.cast::<R>())
                .filter(|&a| a < R::zero())
                .map(|a| a * (-a).ln()),
            self.c_log_c,
        );

        let shift = scores[label];
        scores.iter_mut().for_each(|s| *s = *s - shift);

        let thresholds = thresholds_entropy_norm(scores, self.k_inv, R::one(), &self.sum);
        let primal_loss = if thresholds.is_unconstrained() {
            thresholds.t
        } else {
            let t = thresholds.t;
            let num_hi = R::from_f64_lossy(thresholds.first as f64);
            let sum_hi = self.sum.reduce_slice(&scores[..thresholds.first], R::zero());
            t + self.k_inv * (sum_hi - num_hi * (t - self.log_k))
        };

        LossTerms {
            regularizer,
            primal_loss,
            dual_loss,
        }
    }

    /// Combine (summed) loss terms into objectives.
    #[inline]
    pub fn primal_dual_gap(&self, regularizer: R, primal_loss: R, dual_loss: R) -> Objectives<R> {
        let half = R::from_f64_lossy(0.5);
        let primal = self.c * primal_loss;
        Objectives {
            primal_objective: primal + half * regularizer,
            dual_objective: dual_loss - half * regularizer,
            duality_gap: primal - dual_loss + regularizer,
        }
    }

    /// Summation strategy and precisions, e.g.
    /// `summation = kahan, precision = f64, data = f32`.
    pub fn precision_string(&self) -> String {
        format!(
            "summation = {}, precision = {}, data = {}",
            self.sum.name(),
            R::NAME,
            D::NAME
        )
    }
}

impl<D: Float, R: Float> L2Entropy<D, R, SummationKind> {
    /// Build the loss from a validated configuration.
    pub fn from_config(config: &L2EntropyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let c = R::from_f64_lossy(config.c);
        if !c.is_finite() {
            return Err(ConfigError::InvalidC(config.c));
        }

        let loss = Self::new(config.k, c, config.summation);
        log::debug!("built {loss} ({})", loss.precision_string());
        Ok(loss)
    }
}

impl<D: Float, R: Float, S: Summation> fmt::Display for L2Entropy<D, R, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "l2_entropy (k = {}, C = {})", self.k, self.c)
    }
}

impl<D: Float, R: Float, S: Summation> fmt::Debug for L2Entropy<D, R, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("L2Entropy")
            .field("k", &self.k)
            .field("c", &self.c)
            .field("summation", &self.sum.name())
            .field("precision", &R::NAME)
            .field("data", &D::NAME)
            .finish()
    }
}
