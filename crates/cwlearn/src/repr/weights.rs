//! Per-label sparse weight storage.
//!
//! Every feature weight carries a variance-like covariance term. A feature
//! that was never updated has the explicit default [`WeightValue::UNOBSERVED`]
//! (`weight = 0`, `covariance = 1`); stores never materialize that default,
//! they only report it through [`WeightStore::get`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// WeightValue
// =============================================================================

/// Weight and covariance of a single feature for a single label.
///
/// Covariance is strictly positive: smaller means more confident.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightValue {
    pub weight: f32,
    pub covariance: f32,
}

impl WeightValue {
    /// Value reported for a feature that has no stored entry.
    pub const UNOBSERVED: Self = Self {
        weight: 0.0,
        covariance: 1.0,
    };

    /// Create a new weight value.
    #[inline]
    pub fn new(weight: f32, covariance: f32) -> Self {
        Self { weight, covariance }
    }
}

impl Default for WeightValue {
    fn default() -> Self {
        Self::UNOBSERVED
    }
}

// =============================================================================
// WeightKind
// =============================================================================

/// What a store retains per feature.
///
/// Selected once per session at construction time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightKind {
    /// Weight and covariance are both retained.
    #[default]
    WithCovariance,
    /// Only the weight is retained; covariance always reads as `1.0`.
    WeightOnly,
}

// =============================================================================
// WeightStore
// =============================================================================

/// Sparse mapping `feature -> WeightValue` with an explicit default policy.
///
/// Implementations must return [`WeightValue::UNOBSERVED`] for keys that
/// were never set, so every store handles unseen features identically.
pub trait WeightStore {
    /// Stored value for `feature`, or the unobserved default.
    fn get(&self, feature: &str) -> WeightValue;

    /// Overwrite the value for `feature`.
    fn set(&mut self, feature: &str, value: WeightValue);

    /// Number of features with a stored entry.
    fn len(&self) -> usize;

    /// Whether no feature has been stored yet.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Linear score `Σ weight(f) * x(f)` over the given features.
    fn score<'a, I>(&self, features: I) -> f32
    where
        I: IntoIterator<Item = (&'a str, f32)>,
    {
        features
            .into_iter()
            .map(|(key, x)| self.get(key).weight * x)
            .sum()
    }

    /// Quadratic form `Σ covariance(f) * x(f)²` over the given features.
    fn variance<'a, I>(&self, features: I) -> f32
    where
        I: IntoIterator<Item = (&'a str, f32)>,
    {
        features
            .into_iter()
            .map(|(key, x)| self.get(key).covariance * x * x)
            .sum()
    }
}

// =============================================================================
// SparseWeights
// =============================================================================

/// Hash-map backed [`WeightStore`].
///
/// Keys only ever gain entries within a session.
#[derive(Debug, Clone, Default)]
pub struct SparseWeights {
    entries: HashMap<String, WeightValue>,
    kind: WeightKind,
}

impl SparseWeights {
    /// Create an empty store retaining what `kind` asks for.
    pub fn new(kind: WeightKind) -> Self {
        Self {
            entries: HashMap::new(),
            kind,
        }
    }

    /// What this store retains.
    #[inline]
    pub fn kind(&self) -> WeightKind {
        self.kind
    }

    /// Iterate over stored entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, WeightValue)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Consume the store, yielding owned entries.
    pub fn into_entries(self) -> impl Iterator<Item = (String, WeightValue)> {
        self.entries.into_iter()
    }
}

impl WeightStore for SparseWeights {
    #[inline]
    fn get(&self, feature: &str) -> WeightValue {
        self.entries
            .get(feature)
            .copied()
            .unwrap_or(WeightValue::UNOBSERVED)
    }

    fn set(&mut self, feature: &str, value: WeightValue) {
        let value = match self.kind {
            WeightKind::WithCovariance => value,
            WeightKind::WeightOnly => WeightValue::new(value.weight, 1.0),
        };
        match self.entries.get_mut(feature) {
            Some(slot) => *slot = value,
            None => {
                self.entries.insert(feature.to_owned(), value);
            }
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unseen_feature_reads_default() {
        let store = SparseWeights::new(WeightKind::WithCovariance);
        assert_eq!(store.get("missing"), WeightValue::UNOBSERVED);
        assert_eq!(store.get("missing"), WeightValue::new(0.0, 1.0));
        assert!(store.is_empty());
    }

    #[test]
    fn set_then_get() {
        let mut store = SparseWeights::new(WeightKind::WithCovariance);
        store.set("a", WeightValue::new(0.5, 0.25));
        store.set("a", WeightValue::new(0.7, 0.2));
        assert_eq!(store.get("a"), WeightValue::new(0.7, 0.2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn weight_only_store_discards_covariance() {
        let mut store = SparseWeights::new(WeightKind::WeightOnly);
        store.set("a", WeightValue::new(0.5, 0.25));
        assert_eq!(store.get("a"), WeightValue::new(0.5, 1.0));
    }

    #[test]
    fn score_and_variance_use_defaults_for_unseen() {
        let mut store = SparseWeights::new(WeightKind::WithCovariance);
        store.set("a", WeightValue::new(2.0, 0.5));
        let features = [("a", 3.0), ("b", 2.0)];

        // 2*3 + 0*2
        assert_eq!(store.score(features), 6.0);
        // 0.5*9 + 1*4
        assert_eq!(store.variance(features), 8.5);
    }

    #[test]
    fn iter_returns_all_entries() {
        let mut store = SparseWeights::new(WeightKind::WithCovariance);
        store.set("a", WeightValue::new(1.0, 0.5));
        store.set("b", WeightValue::new(-1.0, 0.5));
        let mut keys: Vec<&str> = store.iter().map(|(k, _)| k).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
