//! Testing utilities for cwlearn.
//!
//! Assertion helpers and synthetic token streams shared by unit tests,
//! integration tests and benches.
//!
//! ```
//! use cwlearn::assert_approx_eq;
//! use cwlearn::testing::DEFAULT_TOLERANCE;
//!
//! assert_approx_eq!(0.1f32 + 0.2, 0.3, DEFAULT_TOLERANCE);
//! ```

pub mod data;

use approx::AbsDiffEq;

use crate::repr::WeightValue;

// =============================================================================
// Constants
// =============================================================================

/// Default tolerance for floating point comparisons of O(1) quantities.
pub const DEFAULT_TOLERANCE: f32 = 1e-5;

// =============================================================================
// Floating Point Assertions
// =============================================================================

/// Assert that two f32 values are approximately equal.
///
/// # Examples
///
/// ```
/// # use cwlearn::assert_approx_eq;
/// assert_approx_eq!(1.0f32, 1.0001f32, 0.001);
/// ```
///
/// # Panics
///
/// Panics if the absolute difference exceeds tolerance.
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $tolerance:expr) => {{
        let left_val: f32 = $left;
        let right_val: f32 = $right;
        let tol: f32 = $tolerance;
        let diff = (left_val - right_val).abs();
        if !(diff <= tol) {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`\n right: `{:?}`\n  diff: `{:?}` > tolerance `{:?}`",
                left_val, right_val, diff, tol
            );
        }
    }};
    ($left:expr, $right:expr, $tolerance:expr, $($arg:tt)+) => {{
        let left_val: f32 = $left;
        let right_val: f32 = $right;
        let tol: f32 = $tolerance;
        let diff = (left_val - right_val).abs();
        if !(diff <= tol) {
            panic!(
                "assertion failed: `(left ≈ right)` - {}\n  left: `{:?}`\n right: `{:?}`\n  diff: `{:?}` > tolerance `{:?}`",
                format_args!($($arg)+), left_val, right_val, diff, tol
            );
        }
    }};
}

/// Assert that a weight entry matches `(weight, covariance)` within tolerance.
///
/// # Panics
///
/// Panics if either component differs by more than `tolerance`.
pub fn assert_weight_eq(actual: WeightValue, expected: (f32, f32), tolerance: f32, context: &str) {
    let (weight, covariance) = expected;
    assert!(
        actual.weight.abs_diff_eq(&weight, tolerance),
        "{context}: weight {} ≠ {weight} (tolerance={tolerance})",
        actual.weight
    );
    assert!(
        actual.covariance.abs_diff_eq(&covariance, tolerance),
        "{context}: covariance {} ≠ {covariance} (tolerance={tolerance})",
        actual.covariance
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_assertion_accepts_close_values() {
        assert_weight_eq(WeightValue::new(0.5, 0.25), (0.500001, 0.25), DEFAULT_TOLERANCE, "close");
    }

    #[test]
    #[should_panic(expected = "covariance")]
    fn weight_assertion_reports_covariance() {
        assert_weight_eq(WeightValue::new(0.5, 0.25), (0.5, 0.3), DEFAULT_TOLERANCE, "far");
    }

    #[test]
    #[should_panic(expected = "left ≈ right")]
    fn approx_macro_rejects_nan() {
        assert_approx_eq!(f32::NAN, 1.0, 1.0);
    }
}
