//! Margin and margin variance of an example against the current model.
//!
//! The margin compares the true label's score with the best-scoring incorrect
//! label. Its variance is the covariance-weighted quadratic form over the
//! active features of those two labels:
//!
//! ```text
//! margin   = score(true) - score(best incorrect)
//! variance = Σ x(f)² · (cov(true, f) + cov(best incorrect, f))
//! ```

use crate::data::SparseFeatures;
use crate::repr::{Label, LabelRegistry, WeightStore, WeightValue};

/// Margin of a single example. Produced fresh per example.
#[derive(Debug, Clone, PartialEq)]
pub struct Margin<L> {
    /// `score(true) - score(best incorrect)`.
    pub value: f32,
    /// Variance of the margin under the current covariances.
    pub variance: f32,
    /// Best-scoring label other than the true label, if any is known.
    pub best_incorrect: Option<L>,
}

/// Computes the [`Margin`] of an example.
///
/// Implementations only read the registry.
pub trait MarginEvaluator<L: Label> {
    fn evaluate(
        &self,
        registry: &LabelRegistry<L>,
        features: &SparseFeatures,
        true_label: &L,
    ) -> Margin<L>;
}

/// Linear scan over all known labels, tracking the best incorrect score.
///
/// On an empty registry the competitor is an implicit unseen label: score
/// `0` and unobserved covariance on every feature, and the missing true
/// label store is read the same way. Once the true label is the only known
/// label, the variance is its own quadratic form alone. Ties keep the label
/// registered first.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestCompetitor;

impl<L: Label> MarginEvaluator<L> for BestCompetitor {
    fn evaluate(
        &self,
        registry: &LabelRegistry<L>,
        features: &SparseFeatures,
        true_label: &L,
    ) -> Margin<L> {
        let pairs = || features.iter().map(|f| (f.feature(), f.value()));

        let mut true_score = 0.0f32;
        let mut true_variance = WeightValue::UNOBSERVED.covariance * features.squared_norm();
        let mut best: Option<(&L, f32, f32)> = None;

        for (label, store) in registry.iter() {
            let score = store.score(pairs());
            if label == true_label {
                true_score = score;
                true_variance = store.variance(pairs());
            } else if best.is_none_or(|(_, best_score, _)| score > best_score) {
                best = Some((label, score, store.variance(pairs())));
            }
        }

        match best {
            Some((label, score, variance)) => Margin {
                value: true_score - score,
                variance: true_variance + variance,
                best_incorrect: Some(label.clone()),
            },
            None if registry.is_empty() => Margin {
                value: true_score,
                variance: true_variance
                    + WeightValue::UNOBSERVED.covariance * features.squared_norm(),
                best_incorrect: None,
            },
            None => Margin {
                value: true_score,
                variance: true_variance,
                best_incorrect: None,
            },
        }
    }
}
