//! Closed-form step size for confidence-weighted updates.
//!
//! The step size is the non-negative root of the quadratic obtained from the
//! confidence constraint `Pr[correct] >= eta`, i.e. `m >= phi * sqrt(v)`
//! after the update (Crammer, Dredze and Kulesza 2008):
//!
//! ```text
//! b     = 1 + 2·phi·m
//! disc  = b² - 8·phi·(m - phi·v)
//! gamma = (-b + sqrt(disc)) / (4·phi·v)
//! ```
//!
//! Expanding gives `disc = (1 - 2·phi·m)² + 8·phi²·v`, which is non-negative
//! for any non-negative variance.

/// Solve for the step size `gamma` given the margin, its variance and `phi`.
///
/// Returns exactly `0.0` when `4·phi·v == 0` (no update). A negative or
/// non-finite discriminant cannot occur for valid inputs; it is reported with
/// a warning and also yields `0.0`.
///
/// The result may be negative. Callers apply an update only when it is
/// strictly positive.
pub fn solve_step_size(margin: f32, variance: f32, phi: f32) -> f32 {
    let gamma_denom = 4.0 * phi * variance;
    if gamma_denom == 0.0 {
        return 0.0;
    }

    let b = 1.0 + 2.0 * phi * margin;
    let discriminant = b * b - 8.0 * phi * (margin - phi * variance);
    if !(discriminant >= 0.0) || !discriminant.is_finite() {
        tracing::warn!(
            margin,
            variance,
            phi,
            discriminant,
            "degenerate step size discriminant, skipping update"
        );
        return 0.0;
    }

    let gamma_numer = -b + discriminant.sqrt();
    gamma_numer / gamma_denom
}
