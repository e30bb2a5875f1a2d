use rand::prelude::*;

use crate::data::{FeatureValue, SparseFeatures};

/// Feature key of column `c` in generated examples.
pub fn feature_name(c: usize) -> String {
    format!("f{c}")
}

/// Generate random sparse examples over `n_features` columns.
///
/// Each column is active with probability `density`; active values are
/// uniform in `[0, 1)`. Examples are never empty: a row with no active column
/// gets one picked uniformly.
pub fn random_sparse_features(
    rows: usize,
    n_features: usize,
    density: f32,
    seed: u64,
) -> Vec<SparseFeatures> {
    assert!(n_features > 0);
    assert!((0.0..=1.0).contains(&density));
    let mut rng = StdRng::seed_from_u64(seed);

    (0..rows)
        .map(|_| {
            let mut features = Vec::new();
            for c in 0..n_features {
                if rng.r#gen::<f32>() < density {
                    features.push(FeatureValue::new(feature_name(c), rng.r#gen::<f32>()));
                }
            }
            if features.is_empty() {
                let c = rng.gen_range(0..n_features);
                features.push(FeatureValue::new(feature_name(c), rng.r#gen::<f32>()));
            }
            SparseFeatures::new(features)
        })
        .collect()
}

/// Generate *synthetic* multiclass labels using a linear model per class.
///
/// Absent features contribute zero. Labels are class indices in
/// `0..num_classes`.
pub fn synthetic_multiclass_labels_from_linear_scores(
    examples: &[SparseFeatures],
    n_features: usize,
    num_classes: usize,
    seed: u64,
    noise_amplitude: f32,
) -> Vec<usize> {
    assert!(num_classes >= 2);
    let mut rng = StdRng::seed_from_u64(seed);

    let weights: Vec<f32> = (0..num_classes * n_features)
        .map(|_| rng.r#gen::<f32>() * 2.0 - 1.0)
        .collect();

    examples
        .iter()
        .map(|example| {
            let mut best_class = 0usize;
            let mut best_score = f32::NEG_INFINITY;
            for k in 0..num_classes {
                let w_off = k * n_features;
                let mut s: f32 = example
                    .iter()
                    .map(|f| {
                        let c = column_of(f.feature());
                        weights[w_off + c] * f.value()
                    })
                    .sum();
                if noise_amplitude > 0.0 {
                    s += (rng.r#gen::<f32>() * 2.0 - 1.0) * noise_amplitude;
                }
                if s > best_score {
                    best_score = s;
                    best_class = k;
                }
            }
            best_class
        })
        .collect()
}

/// Labeled sparse stream: random examples with linear-model labels.
pub fn synthetic_stream(
    rows: usize,
    n_features: usize,
    density: f32,
    num_classes: usize,
    seed: u64,
) -> Vec<(SparseFeatures, usize)> {
    let examples = random_sparse_features(rows, n_features, density, seed);
    let labels = synthetic_multiclass_labels_from_linear_scores(
        &examples,
        n_features,
        num_classes,
        seed.wrapping_add(1),
        0.0,
    );
    examples.into_iter().zip(labels).collect()
}

/// Render an example as `name:value` tokens.
pub fn to_tokens(example: &SparseFeatures) -> Vec<String> {
    example.iter().map(ToString::to_string).collect()
}

/// Deterministic train/valid split indices.
///
/// Returns `(train_idx, valid_idx)`.
pub fn split_indices(rows: usize, valid_fraction: f32, seed: u64) -> (Vec<usize>, Vec<usize>) {
    assert!((0.0..1.0).contains(&valid_fraction));
    let mut idx: Vec<usize> = (0..rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    idx.shuffle(&mut rng);

    let valid_len = ((rows as f32) * valid_fraction).round() as usize;
    let valid_len = valid_len.min(rows);
    let (valid, train) = idx.split_at(valid_len);
    (train.to_vec(), valid.to_vec())
}

fn column_of(feature: &str) -> usize {
    feature
        .strip_prefix('f')
        .and_then(|c| c.parse().ok())
        .unwrap_or_else(|| panic!("not a generated feature key: {feature}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic() {
        let a = synthetic_stream(50, 8, 0.3, 3, 7);
        let b = synthetic_stream(50, 8, 0.3, 3, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn examples_are_never_empty() {
        let examples = random_sparse_features(100, 20, 0.0, 1);
        assert!(examples.iter().all(|e| e.len() == 1));
    }

    #[test]
    fn labels_in_range() {
        let stream = synthetic_stream(200, 10, 0.5, 4, 3);
        assert!(stream.iter().all(|(_, y)| *y < 4));
    }

    #[test]
    fn tokens_round_trip() {
        let examples = random_sparse_features(10, 5, 0.5, 11);
        for example in &examples {
            let parsed = SparseFeatures::parse(to_tokens(example)).unwrap();
            assert_eq!(parsed.len(), example.len());
            for (a, b) in parsed.iter().zip(example.iter()) {
                assert_eq!(a.feature(), b.feature());
                assert!((a.value() - b.value()).abs() <= 1e-6);
            }
        }
    }

    #[test]
    fn split_is_a_partition() {
        let (train, valid) = split_indices(100, 0.2, 5);
        assert_eq!(valid.len(), 20);
        let mut all: Vec<usize> = train.into_iter().chain(valid).collect();
        all.sort_unstable();
        assert_eq!(all, (0..100).collect::<Vec<_>>());
    }
}
