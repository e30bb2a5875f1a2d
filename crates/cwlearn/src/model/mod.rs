//! High-level model wrappers.
//!
//! # Overview
//!
//! - [`CwConfig`]: session configuration (`phi` / `eta`, storage, logging)
//! - [`CwClassifier`]: online multiclass classifier session
//!
//! # Example
//!
//! ```
//! use cwlearn::data::SparseFeatures;
//! use cwlearn::model::{CwClassifier, CwConfig};
//!
//! let config = CwConfig::builder().eta(0.9).build().unwrap();
//! let mut model = CwClassifier::new(config).unwrap();
//!
//! model.train_tokens(["word=good", "len:0.3"], "pos").unwrap();
//! model.train_tokens(["word=bad", "len:0.4"], "neg").unwrap();
//!
//! let query = SparseFeatures::parse(["word=good"]).unwrap();
//! assert_eq!(model.predict(&query), Some("pos"));
//!
//! for row in model.finish().into_rows() {
//!     println!("{:?}\t{}\t{}\t{}", row.label, row.feature, row.weight, row.covariance);
//! }
//! ```

mod classifier;
mod config;

pub use classifier::CwClassifier;
pub use config::{ConfigError, CwConfig, DEFAULT_PHI, PROBIT_RANGE, resolve_phi};
