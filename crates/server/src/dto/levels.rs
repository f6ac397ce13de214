//! # Level Data Transfer Objects
//!
//! Skill weights are percentages and are checked to sum to 100 during
//! request validation, so an unbalanced level never reaches the database.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use evaluation::LevelWeights;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Request to create a level
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
#[validate(schema(function = "validate_create_weights"))]
pub struct CreateLevelRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Role must be between 1 and 255 characters"
    ))]
    pub role:             String,
    #[validate(range(min = 0, message = "Step must not be negative"))]
    pub step:             i16,
    pub execution_weight: i16,
    pub soft_weight:      i16,
    pub strategy_weight:  i16,
    /// Benchmark on the 0-5 answer scale
    #[validate(range(min = 0.0, max = 5.0, message = "Standard must be between 0 and 5"))]
    pub standard:         f64,
}

impl CreateLevelRequest {
    pub fn weights(&self) -> LevelWeights {
        LevelWeights::new(self.execution_weight, self.soft_weight, self.strategy_weight)
    }
}

/// Request to update a level
///
/// Weights are replaced together: either all three are given or none.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
#[validate(schema(function = "validate_update_weights"))]
pub struct UpdateLevelRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Role must be between 1 and 255 characters"
    ))]
    pub role:             Option<String>,
    #[validate(range(min = 0, message = "Step must not be negative"))]
    pub step:             Option<i16>,
    pub execution_weight: Option<i16>,
    pub soft_weight:      Option<i16>,
    pub strategy_weight:  Option<i16>,
    #[validate(range(min = 0.0, max = 5.0, message = "Standard must be between 0 and 5"))]
    pub standard:         Option<f64>,
}

impl UpdateLevelRequest {
    /// The new weights, when all three are supplied.
    pub fn weights(&self) -> Option<LevelWeights> {
        match (
            self.execution_weight,
            self.soft_weight,
            self.strategy_weight,
        ) {
            (Some(execution), Some(soft), Some(strategy)) => Some(LevelWeights::new(execution, soft, strategy)),
            _ => None,
        }
    }

    fn has_any_weight(&self) -> bool {
        self.execution_weight.is_some() || self.soft_weight.is_some() || self.strategy_weight.is_some()
    }
}

fn weights_error(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Owned(message));
    error
}

fn check_weights(weights: LevelWeights) -> Result<(), ValidationError> {
    weights
        .validate()
        .map_err(|e| weights_error("weights_sum", e.message()))
}

fn validate_create_weights(req: &CreateLevelRequest) -> Result<(), ValidationError> { check_weights(req.weights()) }

fn validate_update_weights(req: &UpdateLevelRequest) -> Result<(), ValidationError> {
    match req.weights() {
        Some(weights) => check_weights(weights),
        None if req.has_any_weight() => {
            Err(weights_error(
                "weights_partial",
                "execution_weight, soft_weight and strategy_weight must be updated together".to_string(),
            ))
        },
        None => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelResponse {
    pub id:               Uuid,
    pub role:             String,
    pub step:             i16,
    pub execution_weight: i16,
    pub soft_weight:      i16,
    pub strategy_weight:  i16,
    pub standard:         f64,
    pub company_id:       Uuid,
    pub created_at:       DateTime<Utc>,
    pub updated_at:       DateTime<Utc>,
}

impl From<entity::levels::Model> for LevelResponse {
    fn from(level: entity::levels::Model) -> Self {
        Self {
            id:               level.id,
            role:             level.role,
            step:             level.step,
            execution_weight: level.execution_weight,
            soft_weight:      level.soft_weight,
            strategy_weight:  level.strategy_weight,
            standard:         level.standard,
            company_id:       level.company_id,
            created_at:       level.created_at,
            updated_at:       level.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(execution: i16, soft: i16, strategy: i16) -> CreateLevelRequest {
        CreateLevelRequest {
            role: "Senior Engineer".to_string(),
            step: 2,
            execution_weight: execution,
            soft_weight: soft,
            strategy_weight: strategy,
            standard: 4.0,
        }
    }

    #[test]
    fn test_unbalanced_weights_rejected() {
        let err = create(30, 30, 30).validate().unwrap_err();
        let err: error::AppError = err.into();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert!(err.message().contains("must sum to 100, got 90"));
    }

    #[test]
    fn test_balanced_weights_accepted() {
        assert!(create(30, 30, 40).validate().is_ok());
    }

    #[test]
    fn test_update_requires_all_weights() {
        let req = UpdateLevelRequest {
            soft_weight: Some(50),
            ..Default::default()
        };
        assert!(req.validate().is_err());

        let req = UpdateLevelRequest {
            execution_weight: Some(20),
            soft_weight: Some(50),
            strategy_weight: Some(30),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
        assert_eq!(req.weights(), Some(LevelWeights::new(20, 50, 30)));
    }

    #[test]
    fn test_update_without_weights() {
        let req = UpdateLevelRequest {
            role: Some("Lead".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
        assert_eq!(req.weights(), None);
    }
}
