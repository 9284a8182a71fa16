//! Similarity score value object

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Similarity between a reference and an attempt, in `[0.0, 1.0]`
///
/// `1.0` means the two transcriptions are identical.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Score(f64);

impl Score {
    /// A score of zero
    pub const ZERO: Self = Self(0.0);

    /// A perfect score
    pub const PERFECT: Self = Self(1.0);

    /// Create a score, rejecting values outside `[0.0, 1.0]` and NaN
    pub fn new(value: f64) -> Result<Self, DomainError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::out_of_range("score", value))
        }
    }

    /// Create a score from any ratio, clamping into `[0.0, 1.0]`
    ///
    /// NaN maps to zero.
    #[must_use]
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            Self::ZERO
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    /// Get the raw value
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Round to two decimals, as reported to learners
    #[must_use]
    pub fn rounded(self) -> f64 {
        (self.0 * 100.0).round() / 100.0
    }

    /// Whether the score is exactly perfect
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_perfect(self) -> bool {
        self.0 == 1.0
    }
}

impl TryFrom<f64> for Score {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
