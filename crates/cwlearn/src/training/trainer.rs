//! Per-example confidence-weighted training.
//!
//! One example is fully processed before the next is admitted:
//!
//! 1. evaluate the margin and its variance ([`MarginEvaluator`])
//! 2. solve the step size ([`solve_step_size`])
//! 3. update the true and runner-up stores ([`Updater`]) when the step is positive

use crate::data::{FeatureParseError, SparseFeatures};
use crate::repr::{Label, LabelRegistry};

use super::margin::{BestCompetitor, MarginEvaluator};
use super::step_size::solve_step_size;
use super::updater::{UpdateConfig, UpdateError, Updater};

/// Errors raised while training on one example.
///
/// Every variant is an invalid-argument condition detected before the
/// registry is mutated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrainError {
    #[error(transparent)]
    Feature(#[from] FeatureParseError),

    #[error(transparent)]
    Update(#[from] UpdateError),
}

/// What happened for a single training example.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainOutcome<L> {
    /// Margin before the update.
    pub margin: f32,
    /// Margin variance before the update.
    pub variance: f32,
    /// Solved step size (may be non-positive).
    pub step_size: f32,
    /// Runner-up label demoted by the update, if any.
    pub missed_label: Option<L>,
    /// Whether the stores were updated.
    pub updated: bool,
}

impl<L> TrainOutcome<L> {
    /// Whether the example was misclassified (margin not positive).
    #[inline]
    pub fn is_mistake(&self) -> bool {
        self.margin <= 0.0
    }
}

/// Confidence-weighted trainer.
///
/// Stateless apart from its configuration: the weights live in the
/// [`LabelRegistry`] passed to [`train_one`](Self::train_one).
#[derive(Debug, Clone)]
pub struct CwTrainer<E = BestCompetitor> {
    evaluator: E,
    updater: Updater,
}

impl CwTrainer<BestCompetitor> {
    /// Create a trainer with the linear-scan margin evaluator.
    pub fn new(phi: f32) -> Self {
        Self::with_evaluator(phi, BestCompetitor)
    }
}

impl<E> CwTrainer<E> {
    /// Create a trainer with a custom margin evaluator.
    pub fn with_evaluator(phi: f32, evaluator: E) -> Self {
        Self {
            evaluator,
            updater: Updater::new(UpdateConfig { phi }),
        }
    }

    /// Confidence parameter.
    #[inline]
    pub fn phi(&self) -> f32 {
        self.updater.phi()
    }

    /// Train on a single example.
    ///
    /// Skips the update entirely when the solved step size is not positive.
    ///
    /// # Errors
    ///
    /// [`UpdateError::LabelConflict`] if the evaluator reports the true label
    /// as its own runner-up.
    pub fn train_one<L>(
        &self,
        registry: &mut LabelRegistry<L>,
        features: &SparseFeatures,
        label: &L,
    ) -> Result<TrainOutcome<L>, UpdateError>
    where
        L: Label,
        E: MarginEvaluator<L>,
    {
        let margin = self.evaluator.evaluate(registry, features, label);
        let step_size = solve_step_size(margin.value, margin.variance, self.phi());

        let updated = step_size > 0.0;
        if updated {
            self.updater.apply(
                registry,
                features,
                step_size,
                label,
                margin.best_incorrect.as_ref(),
            )?;
        }

        Ok(TrainOutcome {
            margin: margin.value,
            variance: margin.variance,
            step_size,
            missed_label: margin.best_incorrect,
            updated,
        })
    }
}
