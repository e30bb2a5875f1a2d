//! Data input abstractions for labeled examples.
//!
//! # Overview
//!
//! - [`FeatureValue`]: one `(key, value)` pair parsed from a `name[:value]` token
//! - [`SparseFeatures`]: the active features of a single example
//! - [`FeatureParseError`]: malformed token, rejected before any training step
//!
//! Features are sparse and string-keyed: unseen keys simply have no entry in
//! any weight store, and the default weight policy applies.

mod feature;

pub use feature::{FeatureParseError, FeatureValue, SparseFeatures};
