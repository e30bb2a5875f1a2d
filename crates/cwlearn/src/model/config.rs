//! Session configuration with builder pattern.
//!
//! [`CwConfig`] selects the confidence parameter and the storage variant of a
//! training session. It uses the `bon` crate for builder generation and
//! validates at build time.
//!
//! The confidence parameter is given either directly as `phi` or through
//! `eta` in `(0.5, 1]`, mapped with the clamped probit `phi = Φ⁻¹(eta)`.
//! A direct `phi` takes precedence; `eta` is then ignored.
//!
//! # Example
//!
//! ```
//! use cwlearn::model::CwConfig;
//!
//! // Default: phi = 1.0
//! let config = CwConfig::builder().build().unwrap();
//! assert_eq!(config.resolved_phi().unwrap(), 1.0);
//!
//! // eta = 0.9 gives phi ≈ 1.2816
//! let config = CwConfig::builder().eta(0.9).build().unwrap();
//! assert!((config.resolved_phi().unwrap() - 1.2816).abs() < 1e-3);
//! ```

use bon::Builder;

use crate::repr::WeightKind;
use crate::training::Verbosity;
use crate::utils::probit;

/// Default confidence parameter when neither `phi` nor `eta` is given.
pub const DEFAULT_PHI: f32 = 1.0;

/// Clamp bound of the probit used to map `eta` onto `phi`.
pub const PROBIT_RANGE: f64 = 5.0;

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// `eta` must lie in `(0.5, 1]`.
    #[error("confidence hyperparameter eta must be in range (0.5, 1]: {0}")]
    InvalidEta(f64),

    /// Resolved `phi` must be finite and positive.
    #[error("confidence parameter phi must be finite and > 0, got {0}")]
    InvalidPhi(f32),
}

/// Resolve the confidence parameter.
///
/// An explicit `phi` is returned as-is. Otherwise `eta` is validated against
/// `(0.5, 1]` and mapped through `probit(eta, 5.0)`. With neither, returns
/// [`DEFAULT_PHI`].
pub fn resolve_phi(explicit_phi: Option<f32>, eta: Option<f64>) -> Result<f32, ConfigError> {
    match (explicit_phi, eta) {
        (Some(phi), _) => Ok(phi),
        (None, Some(eta)) => {
            if !(eta > 0.5 && eta <= 1.0) {
                return Err(ConfigError::InvalidEta(eta));
            }
            Ok(probit(eta, PROBIT_RANGE) as f32)
        }
        (None, None) => Ok(DEFAULT_PHI),
    }
}

// =============================================================================
// CwConfig
// =============================================================================

/// Configuration of a confidence-weighted training session.
///
/// # Example
///
/// ```
/// use cwlearn::model::CwConfig;
/// use cwlearn::repr::WeightKind;
/// use cwlearn::training::Verbosity;
///
/// let config = CwConfig::builder()
///     .phi(0.5)
///     .weights(WeightKind::WithCovariance)
///     .verbosity(Verbosity::Info)
///     .log_interval(1_000)
///     .build()
///     .unwrap();
/// assert_eq!(config.resolved_phi().unwrap(), 0.5);
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct CwConfig {
    /// Confidence parameter. Takes precedence over `eta`.
    pub phi: Option<f32>,

    /// Confidence hyperparameter in `(0.5, 1]`, used when `phi` is unset.
    pub eta: Option<f64>,

    /// What the weight stores retain. Default: `WithCovariance`.
    #[builder(default)]
    pub weights: WeightKind,

    /// Verbosity level. Default: `Silent`.
    #[builder(default)]
    pub verbosity: Verbosity,

    /// Examples between progress lines at `Info`. `0` disables. Default: 10 000.
    #[builder(default = 10_000)]
    pub log_interval: u64,
}

/// Custom finishing function that validates the config.
impl<S: cw_config_builder::IsComplete> CwConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - `phi` is unset and `eta` is outside `(0.5, 1]`
    /// - the resolved `phi` is not finite or not positive
    pub fn build(self) -> Result<CwConfig, ConfigError> {
        let config = self.__build_internal();
        config.resolved_phi()?;
        Ok(config)
    }
}

impl CwConfig {
    /// Resolve and validate the confidence parameter.
    pub fn resolved_phi(&self) -> Result<f32, ConfigError> {
        let phi = resolve_phi(self.phi, self.eta)?;
        if !(phi.is_finite() && phi > 0.0) {
            return Err(ConfigError::InvalidPhi(phi));
        }
        Ok(phi)
    }
}

impl Default for CwConfig {
    fn default() -> Self {
        Self::builder().build().expect("default config is valid")
    }
}

// =============================================================================
// Tests
// =============================================================================
