//! Training infrastructure for confidence-weighted classification.
//!
//! ## Per-example pipeline
//!
//! - [`MarginEvaluator`] / [`BestCompetitor`]: margin and margin variance
//!   against the best-scoring incorrect label
//! - [`solve_step_size`]: closed-form step size from margin, variance and phi
//! - [`Updater`]: asymmetric weight/covariance update of the two affected labels
//! - [`CwTrainer`]: orchestrates the three steps for one example
//!
//! ## Shared Infrastructure
//!
//! - [`TrainingLogger`], [`Verbosity`]: Structured logging
//! - [`SessionStats`]: running counters of a session
//!
//! References:
//! - Dredze, Crammer and Pereira, "Confidence-weighted linear classification", ICML 2008
//! - Crammer, Dredze and Kulesza, "Multi-class confidence weighted algorithms", EMNLP 2008

mod logger;
mod margin;
mod step_size;
mod trainer;
mod updater;

pub use logger::{SessionStats, TrainingLogger, Verbosity};
pub use margin::{BestCompetitor, Margin, MarginEvaluator};
pub use step_size::solve_step_size;
pub use trainer::{CwTrainer, TrainError, TrainOutcome};
pub use updater::{UpdateConfig, UpdateError, Updater};
