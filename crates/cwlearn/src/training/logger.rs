//! Training progress logging.
//!
//! [`TrainingLogger`] emits `tracing` events for a training session, gated by
//! a [`Verbosity`] level so a silent session pays nothing for formatting.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// Verbosity level for training output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Verbosity {
    /// No output.
    #[default]
    Silent,
    /// Warnings only.
    Warning,
    /// Session start/finish and periodic progress.
    Info,
    /// Per-example margins and step sizes.
    Debug,
}

/// Running counters of a training session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Examples passed to training.
    pub n_examples: u64,
    /// Examples that produced a weight update.
    pub n_updates: u64,
    /// Examples whose margin was not positive before their update.
    pub n_mistakes: u64,
}

impl SessionStats {
    /// Fraction of examples that were mistakes so far.
    pub fn mistake_rate(&self) -> f64 {
        if self.n_examples == 0 {
            0.0
        } else {
            self.n_mistakes as f64 / self.n_examples as f64
        }
    }
}

/// Structured logger for a training session.
#[derive(Debug, Clone)]
pub struct TrainingLogger {
    verbosity: Verbosity,
    log_interval: u64,
}

impl TrainingLogger {
    /// Create a logger.
    ///
    /// `log_interval` is the number of examples between progress lines;
    /// `0` disables periodic progress.
    pub fn new(verbosity: Verbosity, log_interval: u64) -> Self {
        Self {
            verbosity,
            log_interval,
        }
    }

    /// Configured verbosity.
    #[inline]
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    #[inline]
    fn enabled(&self, level: Verbosity) -> bool {
        self.verbosity >= level
    }

    pub fn start_session(&self, phi: f32, weights: impl Debug) {
        if self.enabled(Verbosity::Info) {
            tracing::info!(phi, weights = ?weights, "starting confidence-weighted session");
        }
    }

    pub fn log_example<L: Debug>(
        &self,
        margin: f32,
        variance: f32,
        step_size: f32,
        missed_label: Option<&L>,
    ) {
        if self.enabled(Verbosity::Debug) {
            tracing::debug!(margin, variance, step_size, missed = ?missed_label, "example");
        }
    }

    /// Log progress when the example count hits the interval.
    pub fn log_progress(&self, stats: &SessionStats, n_labels: usize) {
        if !self.enabled(Verbosity::Info)
            || self.log_interval == 0
            || stats.n_examples % self.log_interval != 0
        {
            return;
        }
        tracing::info!(
            examples = stats.n_examples,
            updates = stats.n_updates,
            mistake_rate = stats.mistake_rate(),
            labels = n_labels,
            "training progress"
        );
    }

    pub fn log_rejected(&self, error: &dyn std::error::Error) {
        if self.enabled(Verbosity::Warning) {
            tracing::warn!(%error, "rejected training example");
        }
    }

    pub fn finish_session(&self, stats: &SessionStats, n_labels: usize, n_entries: usize) {
        if self.enabled(Verbosity::Info) {
            tracing::info!(
                examples = stats.n_examples,
                updates = stats.n_updates,
                mistakes = stats.n_mistakes,
                labels = n_labels,
                entries = n_entries,
                "finished confidence-weighted session"
            );
        }
    }
}
