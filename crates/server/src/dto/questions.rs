//! # Question Data Transfer Objects

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::SkillType;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(
        min = 1,
        max = 2000,
        message = "Description must be between 1 and 2000 characters"
    ))]
    pub description: String,
    pub skill_type:  SkillType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateQuestionRequest {
    #[validate(length(
        min = 1,
        max = 2000,
        message = "Description must be between 1 and 2000 characters"
    ))]
    pub description: Option<String>,
    pub skill_type:  Option<SkillType>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QuestionFilter {
    pub skill_type: Option<SkillType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionResponse {
    pub id:          Uuid,
    pub description: String,
    pub skill_type:  SkillType,
    pub company_id:  Uuid,
    pub created_at:  DateTime<Utc>,
    pub updated_at:  DateTime<Utc>,
}

impl From<entity::questions::Model> for QuestionResponse {
    fn from(question: entity::questions::Model) -> Self {
        Self {
            id:          question.id,
            description: question.description,
            skill_type:  question.skill_type,
            company_id:  question.company_id,
            created_at:  question.created_at,
            updated_at:  question.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_type_labels() {
        let req: CreateQuestionRequest =
            serde_json::from_str(r#"{"description": "Plans ahead", "skill_type": "STRATEGY"}"#).unwrap();
        assert_eq!(req.skill_type, SkillType::Strategy);

        assert!(serde_json::from_str::<CreateQuestionRequest>(r#"{"description": "x", "skill_type": "soft"}"#).is_err());
    }
}
