//! # Process Data Transfer Objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::double_option;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateProcessRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Process name must be between 1 and 255 characters"
    ))]
    pub name:               String,
    pub linked_question_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateProcessRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Process name must be between 1 and 255 characters"
    ))]
    pub name:               Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub linked_question_id: Option<Option<Uuid>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessResponse {
    pub id:                 Uuid,
    pub name:               String,
    pub linked_question_id: Option<Uuid>,
    pub company_id:         Uuid,
    pub created_at:         DateTime<Utc>,
    pub updated_at:         DateTime<Utc>,
}

impl From<entity::processes::Model> for ProcessResponse {
    fn from(process: entity::processes::Model) -> Self {
        Self {
            id:                 process.id,
            name:               process.name,
            linked_question_id: process.linked_question_id,
            company_id:         process.company_id,
            created_at:         process.created_at,
            updated_at:         process.updated_at,
        }
    }
}
