//! Multiclass confidence-weighted classifier session.
//!
//! [`CwClassifier`] owns the label registry for the lifetime of a training
//! session: it is created from a [`CwConfig`], fed one example at a time, can
//! be queried between examples, and is torn down with
//! [`finish`](CwClassifier::finish) which hands back the registry for flushing.

use ndarray::Array2;

use crate::data::SparseFeatures;
use crate::repr::{Label, LabelRegistry, WeightStore, WeightValue};
use crate::training::{
    CwTrainer, SessionStats, TrainError, TrainOutcome, TrainingLogger,
};
use crate::utils::run_with_threads;

use super::config::{ConfigError, CwConfig};

/// Online multiclass confidence-weighted classifier.
///
/// # Example
///
/// ```
/// use cwlearn::model::{CwClassifier, CwConfig};
///
/// let mut model = CwClassifier::new(CwConfig::default()).unwrap();
/// model.train_tokens(["color:red", "size:2"], "apple").unwrap();
/// model.train_tokens(["color:yellow", "size:3"], "banana").unwrap();
///
/// assert_eq!(model.labels(), &["apple", "banana"]);
/// assert!(model.weight(&"banana", "size").weight > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct CwClassifier<L: Label> {
    trainer: CwTrainer,
    registry: LabelRegistry<L>,
    logger: TrainingLogger,
    stats: SessionStats,
    config: CwConfig,
}

impl<L: Label> CwClassifier<L> {
    /// Start a training session.
    ///
    /// Resolves `phi` once; it stays fixed for the whole session.
    pub fn new(config: CwConfig) -> Result<Self, ConfigError> {
        let phi = config.resolved_phi()?;
        let logger = TrainingLogger::new(config.verbosity, config.log_interval);
        logger.start_session(phi, config.weights);

        Ok(Self {
            trainer: CwTrainer::new(phi),
            registry: LabelRegistry::new(config.weights),
            logger,
            stats: SessionStats::default(),
            config,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Resolved confidence parameter.
    #[inline]
    pub fn phi(&self) -> f32 {
        self.trainer.phi()
    }

    /// Session configuration.
    #[inline]
    pub fn config(&self) -> &CwConfig {
        &self.config
    }

    /// Running counters.
    #[inline]
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Known labels in registration order.
    #[inline]
    pub fn labels(&self) -> &[L] {
        self.registry.labels()
    }

    /// Read-only view of the registry.
    #[inline]
    pub fn registry(&self) -> &LabelRegistry<L> {
        &self.registry
    }

    /// Weight value of `(label, feature)`, default-valued when unseen.
    #[inline]
    pub fn weight(&self, label: &L, feature: &str) -> WeightValue {
        self.registry.weight(label, feature)
    }

    // =========================================================================
    // Training
    // =========================================================================

    /// Train on one parsed example.
    pub fn train_one(
        &mut self,
        features: &SparseFeatures,
        label: L,
    ) -> Result<TrainOutcome<L>, TrainError> {
        let outcome = match self.trainer.train_one(&mut self.registry, features, &label) {
            Ok(outcome) => outcome,
            Err(err) => {
                self.logger.log_rejected(&err);
                return Err(err.into());
            }
        };

        self.stats.n_examples += 1;
        if outcome.updated {
            self.stats.n_updates += 1;
        }
        if outcome.is_mistake() {
            self.stats.n_mistakes += 1;
        }

        self.logger.log_example(
            outcome.margin,
            outcome.variance,
            outcome.step_size,
            outcome.missed_label.as_ref(),
        );
        self.logger.log_progress(&self.stats, self.registry.n_labels());

        Ok(outcome)
    }

    /// Parse `name[:value]` tokens, then train on them.
    ///
    /// A malformed token rejects the whole example before any update.
    pub fn train_tokens<I, S>(&mut self, tokens: I, label: L) -> Result<TrainOutcome<L>, TrainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let features = SparseFeatures::parse(tokens).inspect_err(|err| self.logger.log_rejected(err))?;
        self.train_one(&features, label)
    }

    /// Like [`train_tokens`](Self::train_tokens), skipping `None` tokens.
    pub fn train_nullable_tokens<I, S>(
        &mut self,
        tokens: I,
        label: L,
    ) -> Result<TrainOutcome<L>, TrainError>
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let features =
            SparseFeatures::parse_nullable(tokens).inspect_err(|err| self.logger.log_rejected(err))?;
        self.train_one(&features, label)
    }

    // =========================================================================
    // Inference
    // =========================================================================

    /// Score of every known label, in registration order.
    pub fn scores(&self, features: &SparseFeatures) -> Vec<(L, f32)> {
        self.registry
            .iter()
            .map(|(label, store)| (label.clone(), score(store, features)))
            .collect()
    }

    /// Highest-scoring label. Ties keep the label registered first.
    ///
    /// Returns `None` before any label is known.
    pub fn predict(&self, features: &SparseFeatures) -> Option<L> {
        let mut best: Option<(&L, f32)> = None;
        for (label, store) in self.registry.iter() {
            let s = score(store, features);
            if best.is_none_or(|(_, best_score)| s > best_score) {
                best = Some((label, s));
            }
        }
        best.map(|(label, _)| label.clone())
    }

    /// Raw scores for a batch of examples.
    ///
    /// # Arguments
    ///
    /// * `batch` - Examples to score
    /// * `n_threads` - Thread count: 0 = auto, 1 = sequential, >1 = exact count
    ///
    /// # Returns
    ///
    /// Array2 with shape `[n_labels, n_samples]`; rows follow
    /// [`labels()`](Self::labels).
    pub fn predict_raw_batch(&self, batch: &[SparseFeatures], n_threads: usize) -> Array2<f32>
    where
        L: Sync,
    {
        let n_labels = self.registry.n_labels();
        let mut output = Array2::zeros((n_labels, batch.len()));
        if n_labels == 0 || batch.is_empty() {
            return output;
        }

        let columns: Vec<Vec<f32>> = run_with_threads(n_threads, |parallelism| {
            parallelism.maybe_par_map(batch, |features| {
                self.registry
                    .iter()
                    .map(|(_, store)| score(store, features))
                    .collect::<Vec<f32>>()
            })
        });

        for (sample, column) in columns.iter().enumerate() {
            for (label, &s) in column.iter().enumerate() {
                output[[label, sample]] = s;
            }
        }
        output
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// End the session and hand back the trained registry.
    pub fn finish(self) -> LabelRegistry<L> {
        self.logger.finish_session(
            &self.stats,
            self.registry.n_labels(),
            self.registry.n_entries(),
        );
        self.registry
    }
}

#[inline]
fn score<S: WeightStore>(store: &S, features: &SparseFeatures) -> f32 {
    store.score(features.iter().map(|f| (f.feature(), f.value())))
}
