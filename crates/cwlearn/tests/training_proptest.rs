//! Property-based tests for the confidence-weighted update.
//!
//! These tests use proptest to generate arbitrary example streams and verify
//! the invariants every update must keep.

use proptest::collection::{btree_map, vec as prop_vec};
use proptest::prelude::*;

use cwlearn::data::{FeatureValue, SparseFeatures};
use cwlearn::repr::LabelRegistry;
use cwlearn::training::{CwTrainer, UpdateConfig, Updater, solve_step_size};

// =============================================================================
// Arbitrary Example Generators
// =============================================================================

/// Strategy for moderate finite feature values.
fn arb_value() -> impl Strategy<Value = f32> {
    prop_oneof![(-4.0f32..4.0), Just(1.0f32)]
}

/// Strategy for a non-empty example over a small key space, distinct keys.
fn arb_example() -> impl Strategy<Value = SparseFeatures> {
    btree_map(0usize..6, arb_value(), 1..5).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(c, v)| FeatureValue::new(format!("k{c}"), v))
            .collect()
    })
}

fn arb_stream() -> impl Strategy<Value = Vec<(SparseFeatures, u8)>> {
    prop_vec((arb_example(), 0u8..4), 1..40)
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn covariance_stays_in_unit_interval(stream in arb_stream(), phi in 0.1f32..5.0) {
        let trainer = CwTrainer::new(phi);
        let mut registry = LabelRegistry::default();

        for (features, label) in &stream {
            trainer.train_one(&mut registry, features, label).unwrap();
        }

        for row in registry.into_rows() {
            prop_assert!(row.covariance > 0.0, "{row:?}");
            prop_assert!(row.covariance <= 1.0, "{row:?}");
            prop_assert!(row.weight.is_finite(), "{row:?}");
        }
    }

    #[test]
    fn update_never_lowers_true_label_margin(
        stream in arb_stream(),
        example in arb_example(),
        label in 0u8..4,
    ) {
        let trainer = CwTrainer::new(1.0);
        let mut registry = LabelRegistry::default();
        for (features, l) in &stream {
            trainer.train_one(&mut registry, features, l).unwrap();
        }

        let before = trainer.train_one(&mut registry.clone(), &example, &label).unwrap();
        let mut after_registry = registry.clone();
        trainer.train_one(&mut after_registry, &example, &label).unwrap();

        // Re-evaluating against the missed label of the first pass.
        if let (true, Some(missed)) = (before.updated, before.missed_label) {
            let score = |reg: &LabelRegistry<u8>, l: &u8| -> f32 {
                example.iter().map(|f| reg.weight(l, f.feature()).weight * f.value()).sum()
            };
            let margin_before = score(&registry, &label) - score(&registry, &missed);
            let margin_after = score(&after_registry, &label) - score(&after_registry, &missed);
            let tolerance = 1e-3 * (1.0 + margin_before.abs() + margin_after.abs());
            prop_assert!(margin_after >= margin_before - tolerance);
        }
    }

    #[test]
    fn skipped_examples_leave_registry_untouched(stream in arb_stream(), example in arb_example()) {
        let trainer = CwTrainer::new(1.0);
        let mut registry = LabelRegistry::default();
        for (features, l) in &stream {
            trainer.train_one(&mut registry, features, l).unwrap();
        }

        let mut copy = registry.clone();
        let outcome = trainer.train_one(&mut copy, &example, &0u8).unwrap();
        if !outcome.updated {
            let a: Vec<_> = registry.into_rows().collect();
            let b: Vec<_> = copy.into_rows().collect();
            prop_assert_eq!(a.len(), b.len());
            for row in &a {
                prop_assert!(b.contains(row));
            }
        }
    }

    #[test]
    fn positive_features_move_in_update_direction(
        stream in arb_stream(),
        values in prop_vec(0.0f32..4.0, 1..5),
        alpha in 0.001f32..2.0,
        labels in (0u8..4, 0u8..4).prop_filter("distinct labels", |(a, b)| a != b),
    ) {
        let trainer = CwTrainer::new(1.0);
        let mut registry = LabelRegistry::default();
        for (features, l) in &stream {
            trainer.train_one(&mut registry, features, l).unwrap();
        }

        let example: SparseFeatures = values
            .iter()
            .enumerate()
            .map(|(c, &v)| FeatureValue::new(format!("k{c}"), v))
            .collect();
        let (true_label, missed_label) = labels;
        let before = registry.clone();

        Updater::new(UpdateConfig { phi: 1.0 })
            .apply(&mut registry, &example, alpha, &true_label, Some(&missed_label))
            .unwrap();

        for f in &example {
            let key = f.feature();
            prop_assert!(registry.weight(&true_label, key).weight >= before.weight(&true_label, key).weight);
            prop_assert!(registry.weight(&missed_label, key).weight <= before.weight(&missed_label, key).weight);
        }
    }

    #[test]
    fn step_size_is_finite(
        margin in -100.0f32..100.0,
        variance in 0.001f32..100.0,
        phi in 0.01f32..5.0,
    ) {
        let gamma = solve_step_size(margin, variance, phi);
        prop_assert!(gamma.is_finite());
    }

    #[test]
    fn misclassified_examples_get_positive_step(
        margin in -100.0f32..-0.01,
        variance in 0.01f32..100.0,
        phi in 0.01f32..5.0,
    ) {
        prop_assert!(solve_step_size(margin, variance, phi) > 0.0);
    }
}
