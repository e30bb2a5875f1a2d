//! Label → weight store registry.
//!
//! Labels are discovered dynamically: a store is created the first time a
//! label is referenced by an update. Registration order is kept, which makes
//! tie-breaking and batch output layouts deterministic.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use super::weights::{SparseWeights, WeightKind, WeightStore, WeightValue};
use crate::utils::disjoint_pair_mut;

/// Bounds required of a class label.
pub trait Label: Eq + Hash + Clone + Debug {}

impl<T: Eq + Hash + Clone + Debug> Label for T {}

/// One flushed model entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRow<L> {
    pub label: L,
    pub feature: String,
    pub weight: f32,
    pub covariance: f32,
}

/// Owns one [`SparseWeights`] per known label.
///
/// Single-writer: the registry is mutated only by the update rule, one
/// example at a time.
#[derive(Debug, Clone)]
pub struct LabelRegistry<L: Label> {
    labels: Vec<L>,
    stores: Vec<SparseWeights>,
    index: HashMap<L, usize>,
    kind: WeightKind,
}

impl<L: Label> LabelRegistry<L> {
    /// Create an empty registry whose stores retain what `kind` asks for.
    pub fn new(kind: WeightKind) -> Self {
        Self {
            labels: Vec::new(),
            stores: Vec::new(),
            index: HashMap::new(),
            kind,
        }
    }

    /// What newly created stores retain.
    #[inline]
    pub fn weight_kind(&self) -> WeightKind {
        self.kind
    }

    /// Number of known labels.
    #[inline]
    pub fn n_labels(&self) -> usize {
        self.labels.len()
    }

    /// Whether no label is known yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Known labels in registration order.
    #[inline]
    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    /// Whether `label` has a store.
    #[inline]
    pub fn contains(&self, label: &L) -> bool {
        self.index.contains_key(label)
    }

    /// Store for `label`, if known.
    pub fn store(&self, label: &L) -> Option<&SparseWeights> {
        self.index.get(label).map(|&i| &self.stores[i])
    }

    /// Iterate `(label, store)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&L, &SparseWeights)> + '_ {
        self.labels.iter().zip(self.stores.iter())
    }

    /// Weight value for `(label, feature)`, default-valued when either is unseen.
    pub fn weight(&self, label: &L, feature: &str) -> WeightValue {
        self.store(label)
            .map_or(WeightValue::UNOBSERVED, |store| store.get(feature))
    }

    /// Index of `label`'s store, creating an empty one if needed.
    pub fn ensure(&mut self, label: &L) -> usize {
        if let Some(&i) = self.index.get(label) {
            return i;
        }
        let i = self.labels.len();
        self.labels.push(label.clone());
        self.stores.push(SparseWeights::new(self.kind));
        self.index.insert(label.clone(), i);
        i
    }

    /// Mutable store for `label`, created on demand.
    pub fn store_mut(&mut self, label: &L) -> &mut SparseWeights {
        let i = self.ensure(label);
        &mut self.stores[i]
    }

    /// Mutable stores for two distinct labels, both created on demand.
    ///
    /// # Panics
    /// Panics if `a == b`; callers check this beforehand.
    pub fn pair_mut(&mut self, a: &L, b: &L) -> (&mut SparseWeights, &mut SparseWeights) {
        let ia = self.ensure(a);
        let ib = self.ensure(b);
        disjoint_pair_mut(&mut self.stores, ia, ib)
    }

    /// Total number of stored `(label, feature)` entries.
    pub fn n_entries(&self) -> usize {
        self.stores.iter().map(WeightStore::len).sum()
    }

    /// Consume the registry and yield every stored entry as a row.
    ///
    /// Labels appear in registration order; features within a label in
    /// arbitrary order.
    pub fn into_rows(self) -> impl Iterator<Item = ModelRow<L>> {
        self.labels
            .into_iter()
            .zip(self.stores)
            .flat_map(|(label, store)| {
                store.into_entries().map(move |(feature, value)| ModelRow {
                    label: label.clone(),
                    feature,
                    weight: value.weight,
                    covariance: value.covariance,
                })
            })
    }
}

impl<L: Label> Default for LabelRegistry<L> {
    fn default() -> Self {
        Self::new(WeightKind::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_created_lazily_in_order() {
        let mut registry: LabelRegistry<&str> = LabelRegistry::default();
        assert!(registry.is_empty());

        registry.ensure(&"b");
        registry.ensure(&"a");
        registry.ensure(&"b");

        assert_eq!(registry.labels(), &["b", "a"]);
        assert_eq!(registry.n_labels(), 2);
    }

    #[test]
    fn weight_defaults_for_unknown_label_and_feature() {
        let mut registry: LabelRegistry<u32> = LabelRegistry::default();
        assert_eq!(registry.weight(&7, "f"), WeightValue::UNOBSERVED);

        registry.store_mut(&7).set("f", WeightValue::new(0.3, 0.4));
        assert_eq!(registry.weight(&7, "f"), WeightValue::new(0.3, 0.4));
        assert_eq!(registry.weight(&7, "g"), WeightValue::UNOBSERVED);
    }

    #[test]
    fn pair_mut_returns_distinct_stores() {
        let mut registry: LabelRegistry<&str> = LabelRegistry::default();
        {
            let (a, b) = registry.pair_mut(&"a", &"b");
            a.set("f", WeightValue::new(1.0, 0.5));
            b.set("f", WeightValue::new(-1.0, 0.5));
        }
        assert_eq!(registry.weight(&"a", "f").weight, 1.0);
        assert_eq!(registry.weight(&"b", "f").weight, -1.0);
    }

    #[test]
    fn into_rows_flushes_every_entry() {
        let mut registry: LabelRegistry<&str> = LabelRegistry::default();
        registry.store_mut(&"a").set("x", WeightValue::new(1.0, 0.5));
        registry.store_mut(&"a").set("y", WeightValue::new(2.0, 0.25));
        registry.store_mut(&"b").set("x", WeightValue::new(-1.0, 0.5));
        assert_eq!(registry.n_entries(), 3);

        let mut rows: Vec<_> = registry.into_rows().collect();
        rows.sort_by(|l, r| (l.label, &l.feature).cmp(&(r.label, &r.feature)));

        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            ModelRow {
                label: "a",
                feature: "x".to_owned(),
                weight: 1.0,
                covariance: 0.5,
            }
        );
        assert_eq!(rows[2].label, "b");
    }
}
