//! Confidence-weighted update of the two affected label stores.
//!
//! For every active feature `x(f)` the correct label is pushed towards the
//! example and the runner-up away from it, each scaled by its own current
//! covariance. Both covariances shrink identically:
//!
//! ```text
//! w'   = w ± alpha · cov · x
//! cov' = 1 / (1/cov + 2 · alpha · phi · x²)
//! ```
//!
//! The covariance update adds `2·alpha·phi·x²` to the precision `1/cov`, so
//! it stays in `(0, cov]` for positive inputs.

use crate::data::SparseFeatures;
use crate::repr::{Label, LabelRegistry, WeightStore, WeightValue};

/// Errors raised by [`Updater::apply`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpdateError {
    /// The label to promote and the label to demote are the same.
    #[error("actual label equals missed label: {label}")]
    LabelConflict { label: String },
}

/// Configuration for confidence-weighted updates.
#[derive(Debug, Clone, Copy)]
pub struct UpdateConfig {
    /// Confidence parameter phi (> 0).
    pub phi: f32,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self { phi: 1.0 }
    }
}

/// Direction of an update for one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Promote,
    Demote,
}

/// Applies the confidence-weighted update rule.
///
/// # Example
///
/// ```
/// use cwlearn::data::SparseFeatures;
/// use cwlearn::repr::LabelRegistry;
/// use cwlearn::training::{UpdateConfig, Updater};
///
/// let mut registry = LabelRegistry::default();
/// let features = SparseFeatures::parse(["f:2.0"]).unwrap();
/// let updater = Updater::new(UpdateConfig { phi: 1.0 });
///
/// updater.apply(&mut registry, &features, 0.25, &"A", Some(&"B")).unwrap();
/// assert!(registry.weight(&"A", "f").weight > 0.0);
/// assert!(registry.weight(&"B", "f").weight < 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Updater {
    config: UpdateConfig,
}

impl Updater {
    /// Create a new updater.
    pub fn new(config: UpdateConfig) -> Self {
        Self { config }
    }

    /// Confidence parameter used by this updater.
    #[inline]
    pub fn phi(&self) -> f32 {
        self.config.phi
    }

    /// Update the stores of `true_label` and `missed_label` for one example.
    ///
    /// Stores are created on demand. With `missed_label == None` only the
    /// true label's store is updated. A non-positive (or NaN) `alpha` is a
    /// no-op: nothing is created or modified.
    ///
    /// # Errors
    ///
    /// [`UpdateError::LabelConflict`] if both labels are equal. The registry
    /// is left untouched in that case.
    pub fn apply<L: Label>(
        &self,
        registry: &mut LabelRegistry<L>,
        features: &SparseFeatures,
        alpha: f32,
        true_label: &L,
        missed_label: Option<&L>,
    ) -> Result<(), UpdateError> {
        if !(alpha > 0.0) {
            return Ok(());
        }

        match missed_label {
            Some(missed) if missed == true_label => Err(UpdateError::LabelConflict {
                label: format!("{true_label:?}"),
            }),
            Some(missed) => {
                let (promoted, demoted) = registry.pair_mut(true_label, missed);
                for f in features {
                    self.update_feature(promoted, f.feature(), f.value(), alpha, Direction::Promote);
                    self.update_feature(demoted, f.feature(), f.value(), alpha, Direction::Demote);
                }
                Ok(())
            }
            None => {
                let promoted = registry.store_mut(true_label);
                for f in features {
                    self.update_feature(promoted, f.feature(), f.value(), alpha, Direction::Promote);
                }
                Ok(())
            }
        }
    }

    fn update_feature<S: WeightStore>(
        &self,
        store: &mut S,
        feature: &str,
        x: f32,
        alpha: f32,
        direction: Direction,
    ) {
        let old = store.get(feature);
        store.set(feature, new_weight(old, x, alpha, self.config.phi, direction));
    }
}

/// Compute the updated `(weight, covariance)` of one feature.
fn new_weight(old: WeightValue, x: f32, alpha: f32, phi: f32, direction: Direction) -> WeightValue {
    let delta_w = alpha * old.covariance * x;
    let weight = match direction {
        Direction::Promote => old.weight + delta_w,
        Direction::Demote => old.weight - delta_w,
    };

    let mut covariance = 1.0 / (1.0 / old.covariance + 2.0 * alpha * phi * x * x);
    if !(covariance > 0.0) || !covariance.is_finite() {
        tracing::warn!(
            old_covariance = old.covariance,
            covariance,
            x,
            alpha,
            "covariance left the positive range, flooring"
        );
        covariance = f32::MIN_POSITIVE;
    }

    WeightValue::new(weight, covariance)
}
