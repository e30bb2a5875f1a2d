//! Common utilities used across the crate.
//!
//! This module provides the clamped probit used to map the `eta`
//! hyperparameter onto `phi`, parallelism configuration for batch inference,
//! and slice helpers used by the label registry.

use rayon::prelude::*;
use statrs::distribution::{ContinuousCDF, Normal};

// =============================================================================
// Statistical Utilities
// =============================================================================

/// Probit function clamped to `[-range, range]`.
///
/// The endpoints map exactly onto the range: `probit(0, r) == -r` and
/// `probit(1, r) == r`.
///
/// # Arguments
/// * `p` - Probability in `[0, 1]`
/// * `range` - Positive clamp bound
///
/// # Returns
/// The clamped quantile. `NaN` if `p` is outside `[0, 1]` or `range <= 0`.
pub fn probit(p: f64, range: f64) -> f64 {
    if !(range > 0.0) || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if p == 0.0 {
        return -range;
    }
    if p == 1.0 {
        return range;
    }
    Normal::standard().inverse_cdf(p).clamp(-range, range)
}

// =============================================================================
// Parallelism Configuration
// =============================================================================

/// Whether parallel execution is allowed.
///
/// Training is strictly sequential; this flag only governs read-only batch
/// inference over a frozen snapshot of the weight stores.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parallelism {
    Sequential,
    Parallel,
}

impl Parallelism {
    /// Create from thread count semantics.
    ///
    /// - 0 = auto (parallel if rayon pool has multiple threads, sequential otherwise)
    /// - 1 = sequential
    /// - >1 = parallel
    #[inline]
    pub fn from_threads(n_threads: usize) -> Self {
        if n_threads == 1 || (n_threads == 0 && rayon::current_num_threads() == 1) {
            Parallelism::Sequential
        } else {
            Parallelism::Parallel
        }
    }

    /// Returns `true` if parallel execution is allowed.
    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, Parallelism::Parallel)
    }

    #[inline]
    pub fn maybe_par_map<T, B, I, F>(self, iter: I, f: F) -> Vec<B>
    where
        T: Send,
        B: Send,
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        F: Fn(T) -> B + Sync + Send,
    {
        if self.is_parallel() {
            iter.into_par_iter().map(f).collect()
        } else {
            iter.into_iter().map(f).collect()
        }
    }
}

// =============================================================================
// Thread Pool Setup
// =============================================================================

/// Run a closure with the appropriate thread pool.
///
/// Thread count semantics:
/// - `0` = auto (use all available cores)
/// - `1` = sequential (no thread pool)
/// - `n > 1` = use exactly `n` threads
///
/// If the pool cannot be created the closure runs sequentially.
#[inline]
pub fn run_with_threads<T: Send>(n_threads: usize, f: impl FnOnce(Parallelism) -> T + Send) -> T {
    match Parallelism::from_threads(n_threads) {
        Parallelism::Sequential => f(Parallelism::Sequential),
        Parallelism::Parallel => match rayon::ThreadPoolBuilder::new()
            .num_threads(n_threads)
            .build()
        {
            Ok(pool) => pool.install(|| f(Parallelism::Parallel)),
            Err(err) => {
                tracing::warn!(%err, "failed to create thread pool, running sequentially");
                f(Parallelism::Sequential)
            }
        },
    }
}

// =============================================================================
// Slice Utilities
// =============================================================================

/// Get mutable references to two distinct elements of a slice.
///
/// # Panics
/// Panics if `a == b` or either index is out of bounds.
#[inline]
pub fn disjoint_pair_mut<T>(slice: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    assert_ne!(a, b, "indices must be distinct");
    if a < b {
        let (left, right) = slice.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = slice.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}
