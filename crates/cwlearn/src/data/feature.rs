//! Sparse feature vectors and the feature token grammar.
//!
//! Each labeled example arrives as a list of string tokens. A token is either
//! `"name"` (implicit value `1.0`) or `"name:value"` where `value` parses as
//! an `f32`. Parsing is all-or-nothing per example: a single malformed token
//! rejects the whole example before any weight is touched.
//!
//! # Example
//!
//! ```
//! use cwlearn::data::SparseFeatures;
//!
//! let features = SparseFeatures::parse(["height:1.5", "tall"]).unwrap();
//! assert_eq!(features.len(), 2);
//! assert_eq!(features.iter().nth(1).unwrap().value(), 1.0);
//! ```

use std::fmt;
use std::num::ParseFloatError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors raised while parsing feature tokens.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FeatureParseError {
    /// Token is the empty string.
    #[error("empty feature token")]
    Empty,

    /// Token is not `name` or `name:value`, or the name is empty.
    #[error("invalid feature representation: {token:?}")]
    Malformed { token: String },

    /// Value part does not parse as a float.
    #[error("invalid feature value in {token:?}: {source}")]
    InvalidValue {
        token: String,
        #[source]
        source: ParseFloatError,
    },

    /// Value part parses, but is NaN or infinite.
    #[error("feature value must be finite: {token:?}")]
    NonFinite { token: String },
}

// =============================================================================
// FeatureValue
// =============================================================================

/// A single active feature: key plus value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureValue {
    feature: String,
    value: f32,
}

impl FeatureValue {
    /// Create a feature with an explicit value.
    pub fn new(feature: impl Into<String>, value: f32) -> Self {
        Self {
            feature: feature.into(),
            value,
        }
    }

    /// Create a binary (presence) feature with value `1.0`.
    pub fn binary(feature: impl Into<String>) -> Self {
        Self::new(feature, 1.0)
    }

    /// Parse a single `name` or `name:value` token.
    pub fn parse(token: &str) -> Result<Self, FeatureParseError> {
        if token.is_empty() {
            return Err(FeatureParseError::Empty);
        }

        let mut parts = token.split(':');
        let name = parts.next().unwrap_or_default();
        let value = parts.next();
        if parts.next().is_some() || name.is_empty() {
            return Err(FeatureParseError::Malformed {
                token: token.to_owned(),
            });
        }

        let value = match value {
            None => 1.0,
            Some("") => {
                return Err(FeatureParseError::Malformed {
                    token: token.to_owned(),
                });
            }
            Some(raw) => raw
                .trim()
                .parse::<f32>()
                .map_err(|source| FeatureParseError::InvalidValue {
                    token: token.to_owned(),
                    source,
                })?,
        };

        if !value.is_finite() {
            return Err(FeatureParseError::NonFinite {
                token: token.to_owned(),
            });
        }

        Ok(Self::new(name, value))
    }

    /// Feature key.
    #[inline]
    pub fn feature(&self) -> &str {
        &self.feature
    }

    /// Feature value.
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }
}

impl FromStr for FeatureValue {
    type Err = FeatureParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.feature, self.value)
    }
}

// =============================================================================
// SparseFeatures
// =============================================================================

/// The active features of one example, in token order.
///
/// Duplicate keys are kept as-is; each occurrence contributes separately to
/// scores and updates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseFeatures {
    features: Vec<FeatureValue>,
}

impl SparseFeatures {
    /// Create from already-parsed features.
    pub fn new(features: Vec<FeatureValue>) -> Self {
        Self { features }
    }

    /// Parse every token of an example. Fails on the first malformed token.
    pub fn parse<I, S>(tokens: I) -> Result<Self, FeatureParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let features = tokens
            .into_iter()
            .map(|t| FeatureValue::parse(t.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { features })
    }

    /// Parse tokens where absent entries (`None`) are skipped.
    pub fn parse_nullable<I, S>(tokens: I) -> Result<Self, FeatureParseError>
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        Self::parse(tokens.into_iter().flatten())
    }

    /// Iterate over the active features.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, FeatureValue> {
        self.features.iter()
    }

    /// Number of active features (duplicates included).
    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the example has no active features.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Sum of squared feature values.
    pub fn squared_norm(&self) -> f32 {
        self.features.iter().map(|f| f.value * f.value).sum()
    }
}

impl FromIterator<FeatureValue> for SparseFeatures {
    fn from_iter<T: IntoIterator<Item = FeatureValue>>(iter: T) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SparseFeatures {
    type Item = &'a FeatureValue;
    type IntoIter = std::slice::Iter<'a, FeatureValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_name_only_defaults_to_one() {
        let fv = FeatureValue::parse("f").unwrap();
        assert_eq!(fv.feature(), "f");
        assert_eq!(fv.value(), 1.0);
    }

    #[test]
    fn parse_name_and_value() {
        let fv: FeatureValue = "f:3.5".parse().unwrap();
        assert_eq!(fv.feature(), "f");
        assert_eq!(fv.value(), 3.5);
        assert_eq!(fv.to_string(), "f:3.5");
    }

    #[test]
    fn parse_negative_and_scientific_values() {
        assert_eq!(FeatureValue::parse("x:-2").unwrap().value(), -2.0);
        assert_eq!(FeatureValue::parse("x:1e-3").unwrap().value(), 1e-3);
    }

    #[test]
    fn parse_rejects_extra_separator() {
        assert!(matches!(
            FeatureValue::parse("a:b:c"),
            Err(FeatureParseError::Malformed { .. })
        ));
    }

    #[test]
    fn parse_rejects_empty_parts() {
        assert_eq!(FeatureValue::parse(""), Err(FeatureParseError::Empty));
        assert!(matches!(
            FeatureValue::parse(":1.0"),
            Err(FeatureParseError::Malformed { .. })
        ));
        assert!(matches!(
            FeatureValue::parse("f:"),
            Err(FeatureParseError::Malformed { .. })
        ));
    }

    #[test]
    fn parse_rejects_non_numeric_value() {
        let err = FeatureValue::parse("f:abc").unwrap_err();
        assert!(matches!(err, FeatureParseError::InvalidValue { .. }));
        assert!(err.to_string().contains("f:abc"));
    }

    #[test]
    fn parse_rejects_non_finite_value() {
        assert!(matches!(
            FeatureValue::parse("f:NaN"),
            Err(FeatureParseError::NonFinite { .. })
        ));
        assert!(matches!(
            FeatureValue::parse("f:inf"),
            Err(FeatureParseError::NonFinite { .. })
        ));
    }

    #[test]
    fn sparse_parse_is_all_or_nothing() {
        let result = SparseFeatures::parse(["a", "b:2", "c:oops"]);
        assert!(result.is_err());
    }

    #[test]
    fn sparse_parse_nullable_skips_missing() {
        let features = SparseFeatures::parse_nullable([Some("a"), None, Some("b:2")]).unwrap();
        let keys: Vec<&str> = features.iter().map(|f| f.feature()).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn squared_norm_counts_duplicates() {
        let features = SparseFeatures::parse(["a:2", "a:2", "b"]).unwrap();
        assert_eq!(features.squared_norm(), 9.0);
    }
}
