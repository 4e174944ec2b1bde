use std::{cmp::Ordering, fmt::Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

//--------------------------------------    Confidence    -------------------------------------------------------------

/// A match confidence score. Always lies in the closed interval [0, 1].
///
/// Scores are produced by the similarity scorer and stored on wantlist references. Construction via [`Confidence::new`]
/// clamps out-of-range values rather than rejecting them, since the weighted-sum scorer can legitimately produce sums
/// a hair above 1.0 before clamping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    pub const MAX: Confidence = Confidence(1.0);
    pub const MIN: Confidence = Confidence(0.0);

    /// Creates a new confidence score, clamping the value into [0, 1]. A NaN input collapses to 0.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Strictly-greater comparison against an acceptance threshold.
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.0 > threshold
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as a confidence score: {0}")]
pub struct ConfidenceConversionError(String);

impl TryFrom<f64> for Confidence {
    type Error = ConfidenceConversionError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if value.is_nan() || !(0.0..=1.0).contains(&value) {
            Err(ConfidenceConversionError(format!("{value} is outside [0, 1]")))
        } else {
            Ok(Self(value))
        }
    }
}

impl Eq for Confidence {}

impl PartialOrd for Confidence {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Confidence {
    fn cmp(&self, other: &Self) -> Ordering {
        // Valid by construction: the inner value is never NaN.
        self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
    }
}

impl Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.0}%", self.0 * 100.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn clamps_out_of_range_values() {
        assert_eq!(Confidence::new(1.2), Confidence::MAX);
        assert_eq!(Confidence::new(-0.5), Confidence::MIN);
        assert_eq!(Confidence::new(f64::NAN), Confidence::MIN);
        assert_eq!(Confidence::new(0.731).value(), 0.731);
    }

    #[test]
    fn try_from_rejects_out_of_range_values() {
        assert!(Confidence::try_from(0.7).is_ok());
        assert!(Confidence::try_from(1.0).is_ok());
        assert!(Confidence::try_from(1.0001).is_err());
        assert!(Confidence::try_from(-0.0001).is_err());
        assert!(Confidence::try_from(f64::NAN).is_err());
    }

    #[test]
    fn threshold_comparison_is_strict() {
        let threshold = 0.70;
        assert!(!Confidence::new(0.70).exceeds(threshold));
        assert!(Confidence::new(0.7000001).exceeds(threshold));
    }

    #[test]
    fn displays_as_percentage() {
        assert_eq!(Confidence::new(0.73).to_string(), "73%");
        assert_eq!(Confidence::MAX.to_string(), "100%");
    }

    #[test]
    fn orders_by_value() {
        let mut scores = vec![Confidence::new(0.4), Confidence::MAX, Confidence::new(0.9)];
        scores.sort();
        assert_eq!(scores, vec![Confidence::new(0.4), Confidence::new(0.9), Confidence::MAX]);
    }
}
