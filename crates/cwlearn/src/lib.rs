//! cwlearn: online multiclass confidence-weighted linear classification.
//!
//! Each label keeps a sparse, string-keyed map of features to a
//! `(weight, covariance)` pair. Examples arrive one at a time; the trainer
//! computes the margin of the true label against the best-scoring other label,
//! solves the closed-form step size, and moves both labels' weights while
//! shrinking the covariance of every active feature.
//!
//! # Key Types
//!
//! - [`CwClassifier`] / [`CwConfig`] - Training session and its configuration
//! - [`CwTrainer`] - Per-example update over a [`LabelRegistry`]
//! - [`SparseFeatures`] - One example parsed from `name[:value]` tokens
//!
//! # Training
//!
//! Use `CwConfig::builder()` to configure, then feed examples to
//! [`CwClassifier::train_one`] or [`CwClassifier::train_tokens`].
//! See the [`model`] module for details.

// Re-export approx traits for users who want to compare weights
pub use approx;

pub mod data;
pub mod model;
pub mod repr;
pub mod testing;
pub mod training;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

// Session types (most users want these)
pub use model::{ConfigError, CwClassifier, CwConfig, resolve_phi};

// Training types
pub use training::{CwTrainer, TrainError, TrainOutcome, Verbosity, solve_step_size};

// Data and storage types
pub use data::{FeatureParseError, FeatureValue, SparseFeatures};
pub use repr::{Label, LabelRegistry, ModelRow, WeightKind, WeightStore, WeightValue};

// Shared utilities
pub use utils::{Parallelism, probit, run_with_threads};
