//! Level weights and standard.

use entity::levels;
use error::{AppError, Result};
use serde::{Deserialize, Serialize};

use crate::skill::SkillType;

/// Skill weights of a level, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelWeights {
    pub execution: i16,
    pub soft:      i16,
    pub strategy:  i16,
}

impl LevelWeights {
    /// Weights must add up to exactly this value.
    pub const TOTAL: i32 = 100;

    #[inline]
    pub const fn new(execution: i16, soft: i16, strategy: i16) -> Self {
        Self {
            execution,
            soft,
            strategy,
        }
    }

    #[inline]
    pub fn sum(&self) -> i32 { i32::from(self.execution) + i32::from(self.soft) + i32::from(self.strategy) }

    /// Whether every weight is non-negative and they add up to [`Self::TOTAL`].
    pub fn is_balanced(&self) -> bool {
        self.execution >= 0 && self.soft >= 0 && self.strategy >= 0 && self.sum() == Self::TOTAL
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_balanced() {
            Ok(())
        }
        else {
            Err(AppError::validation(format!(
                "Level weights must sum to {}, got {}",
                Self::TOTAL,
                self.sum()
            )))
        }
    }

    #[inline]
    pub fn weight(&self, skill: SkillType) -> i16 {
        match skill {
            SkillType::Soft => self.soft,
            SkillType::Execution => self.execution,
            SkillType::Strategy => self.strategy,
        }
    }
}

impl From<&levels::Model> for LevelWeights {
    fn from(level: &levels::Model) -> Self { Self::new(level.execution_weight, level.soft_weight, level.strategy_weight) }
}

/// Weights plus the expected score of a level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelProfile {
    pub weights:  LevelWeights,
    pub standard: f64,
}

impl From<&levels::Model> for LevelProfile {
    fn from(level: &levels::Model) -> Self {
        Self {
            weights:  LevelWeights::from(level),
            standard: level.standard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_summing_to_90_rejected() {
        let weights = LevelWeights::new(30, 30, 30);
        assert!(!weights.is_balanced());
        let err = weights.validate().unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert!(err.message().contains("got 90"));
    }

    #[test]
    fn test_weights_summing_to_100_accepted() {
        assert!(LevelWeights::new(30, 30, 40).validate().is_ok());
    }

    #[test]
    fn test_negative_weight_rejected() {
        assert!(!LevelWeights::new(-10, 60, 50).is_balanced());
    }

    #[test]
    fn test_weight_lookup() {
        let weights = LevelWeights::new(50, 30, 20);
        assert_eq!(weights.weight(SkillType::Execution), 50);
        assert_eq!(weights.weight(SkillType::Soft), 30);
        assert_eq!(weights.weight(SkillType::Strategy), 20);
    }
}
