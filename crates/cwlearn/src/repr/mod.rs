//! Model representations.
//!
//! - [`WeightValue`]: `(weight, covariance)` of one feature for one label
//! - [`WeightStore`] / [`SparseWeights`]: per-label sparse storage with the
//!   explicit unobserved default `(0, 1)`
//! - [`LabelRegistry`]: label → store mapping owned by a training session

mod registry;
mod weights;

pub use registry::{Label, LabelRegistry, ModelRow};
pub use weights::{SparseWeights, WeightKind, WeightStore, WeightValue};
