//! # Session Data Transfer Objects

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::SessionStatus;
use evaluation::DuplicateReport;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request to create a session together with its clusters and rules
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateSessionRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Session name must be between 1 and 255 characters"
    ))]
    pub name:        String,
    #[serde(default)]
    #[validate(length(max = 500, message = "At most 500 clusters can be assigned at once"))]
    pub cluster_ids: Vec<Uuid>,
    #[serde(default)]
    #[validate(length(max = 500, message = "At most 500 rules can be assigned at once"))]
    pub rule_ids:    Vec<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateSessionRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Session name must be between 1 and 255 characters"
    ))]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SessionFilter {
    pub status: Option<SessionStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionResponse {
    pub id:          Uuid,
    pub name:        String,
    pub status:      SessionStatus,
    pub start_time:  Option<DateTime<Utc>>,
    pub end_time:    Option<DateTime<Utc>>,
    pub company_id:  Uuid,
    /// Only filled on single-session responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_ids: Option<Vec<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_ids:    Option<Vec<Uuid>>,
    pub created_at:  DateTime<Utc>,
    pub updated_at:  DateTime<Utc>,
}

impl SessionResponse {
    pub fn new(session: entity::sessions::Model) -> Self {
        Self {
            id:          session.id,
            name:        session.name,
            status:      session.status,
            start_time:  session.start_time,
            end_time:    session.end_time,
            company_id:  session.company_id,
            cluster_ids: None,
            rule_ids:    None,
            created_at:  session.created_at,
            updated_at:  session.updated_at,
        }
    }

    #[must_use]
    pub fn with_associations(mut self, cluster_ids: Vec<Uuid>, rule_ids: Vec<Uuid>) -> Self {
        self.cluster_ids = Some(cluster_ids);
        self.rule_ids = Some(rule_ids);
        self
    }
}

/// Duplicate requests of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicatesResponse {
    pub session_id:      Uuid,
    pub total_feedbacks: usize,
    #[serde(flatten)]
    pub report:          DuplicateReport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoveDuplicatesResponse {
    pub session_id: Uuid,
    pub removed:    u64,
}
