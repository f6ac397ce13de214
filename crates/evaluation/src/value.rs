//! Feedback answer values.
//!
//! A stored value is null while unanswered, `0` when the sender has no basis
//! to answer, or a rating from 1 to 5. Only ratings count toward means; every
//! row counts toward the "received" tally.

use error::{AppError, Result};
use serde::{Deserialize, Serialize};

/// Stored value meaning "no basis to answer".
pub const NO_BASIS_TO_ANSWER: i16 = 0;
/// Lowest rating.
pub const MIN_RATING: i16 = 1;
/// Highest rating.
pub const MAX_VALUE: i16 = 5;

/// A decoded feedback value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rating", rename_all = "snake_case")]
pub enum Answer {
    Unanswered,
    NoBasis,
    Rating(i16),
}

impl Answer {
    /// Decode a stored value, rejecting anything outside null, 0 and 1 to 5.
    pub fn from_value(value: Option<i16>) -> Result<Self> {
        match value {
            None => Ok(Self::Unanswered),
            Some(NO_BASIS_TO_ANSWER) => Ok(Self::NoBasis),
            Some(rating @ MIN_RATING ..= MAX_VALUE) => Ok(Self::Rating(rating)),
            Some(other) => {
                Err(AppError::validation(format!(
                    "Feedback value must be between {} and {}, got {}",
                    NO_BASIS_TO_ANSWER, MAX_VALUE, other
                )))
            },
        }
    }

    /// Rating usable in a mean, if any.
    #[inline]
    pub fn rating(self) -> Option<i16> {
        match self {
            Self::Rating(rating) => Some(rating),
            _ => None,
        }
    }

    #[inline]
    pub fn is_answered(self) -> bool { !matches!(self, Self::Unanswered) }
}

/// Rating of a raw stored value when it counts toward a mean.
///
/// Null, zero and out-of-range values are ignored.
#[inline]
pub fn countable(value: Option<i16>) -> Option<i16> { value.filter(|v| (MIN_RATING ..= MAX_VALUE).contains(v)) }

/// Running arithmetic mean of ratings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Mean {
    sum:   i64,
    count: u32,
}

impl Mean {
    /// Add a raw value; values that do not count are skipped.
    pub fn push(&mut self, value: Option<i16>) {
        if let Some(rating) = countable(value) {
            self.sum += i64::from(rating);
            self.count += 1;
        }
    }

    #[inline]
    pub fn count(&self) -> u32 { self.count }

    /// Mean of the pushed ratings, `None` when there are none.
    pub fn value(&self) -> Option<f64> { (self.count > 0).then(|| self.sum as f64 / f64::from(self.count)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_value() {
        assert_eq!(Answer::from_value(None).unwrap(), Answer::Unanswered);
        assert_eq!(Answer::from_value(Some(0)).unwrap(), Answer::NoBasis);
        assert_eq!(Answer::from_value(Some(5)).unwrap(), Answer::Rating(5));
        assert!(Answer::from_value(Some(6)).is_err());
        assert!(Answer::from_value(Some(-1)).is_err());
    }

    #[test]
    fn test_no_basis_is_answered_but_not_rated() {
        let answer = Answer::NoBasis;
        assert!(answer.is_answered());
        assert_eq!(answer.rating(), None);
    }

    #[test]
    fn test_mean_skips_zero_and_null() {
        let mut mean = Mean::default();
        for value in [Some(4), None, Some(0), Some(3), Some(5)] {
            mean.push(value);
        }
        assert_eq!(mean.count(), 3);
        assert_eq!(mean.value(), Some(4.0));
    }

    #[test]
    fn test_empty_mean() {
        assert_eq!(Mean::default().value(), None);
    }

    #[test]
    fn test_answer_serde() {
        let json = serde_json::to_value(Answer::Rating(4)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "rating", "rating": 4}));
    }
}
