//! # Initiative Data Transfer Objects
//!
//! Initiatives are improvement actions a user records on a feedback topic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateInitiativeRequest {
    #[validate(length(
        min = 1,
        max = 5000,
        message = "Description must be between 1 and 5000 characters"
    ))]
    pub description:     String,
    pub question_id:     Uuid,
    #[validate(length(
        min = 1,
        max = 64,
        message = "Initiative type must be between 1 and 64 characters"
    ))]
    pub initiative_type: String,
    /// Owner of the initiative; defaults to the caller. Only administrators
    /// may record initiatives for someone else.
    pub user_id:         Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateInitiativeRequest {
    #[validate(length(
        min = 1,
        max = 5000,
        message = "Description must be between 1 and 5000 characters"
    ))]
    pub description:     Option<String>,
    #[validate(length(
        min = 1,
        max = 64,
        message = "Initiative type must be between 1 and 64 characters"
    ))]
    pub initiative_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InitiativeFilter {
    pub user_id:     Option<Uuid>,
    pub question_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitiativeResponse {
    pub id:              Uuid,
    pub description:     String,
    pub session_id:      Uuid,
    pub question_id:     Uuid,
    pub user_id:         Uuid,
    pub initiative_type: String,
    pub created_at:      DateTime<Utc>,
    pub updated_at:      DateTime<Utc>,
}

impl From<entity::initiatives::Model> for InitiativeResponse {
    fn from(initiative: entity::initiatives::Model) -> Self {
        Self {
            id:              initiative.id,
            description:     initiative.description,
            session_id:      initiative.session_id,
            question_id:     initiative.question_id,
            user_id:         initiative.user_id,
            initiative_type: initiative.initiative_type,
            created_at:      initiative.created_at,
            updated_at:      initiative.updated_at,
        }
    }
}
