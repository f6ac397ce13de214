//! # Feedback Data Transfer Objects

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::SkillType;
use evaluation::Answer;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Filters for the session feedback list
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FeedbackFilter {
    pub sender_id:   Option<Uuid>,
    pub receiver_id: Option<Uuid>,
    /// `true` keeps answered rows (including "no basis"), `false` pending ones
    pub answered:    Option<bool>,
    pub rule_number: Option<i32>,
}

/// Query of the live feedback event stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct EventStreamQuery {
    /// Only events of this sender; regular users always get their own
    pub sender_id: Option<Uuid>,
}

/// A sender's answer: `null` clears it, `0` means "no basis to answer".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct RespondFeedbackRequest {
    pub value:   Option<i16>,
    #[validate(length(max = 5000, message = "Comment must not exceed 5000 characters"))]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackResponse {
    pub id:          Uuid,
    pub sender_id:   Uuid,
    pub receiver_id: Uuid,
    pub question_id: Uuid,
    pub session_id:  Uuid,
    pub value:       Option<i16>,
    pub comment:     Option<String>,
    pub rule_number: Option<i32>,
    pub created_at:  DateTime<Utc>,
    pub updated_at:  DateTime<Utc>,
}

impl From<entity::feedbacks::Model> for FeedbackResponse {
    fn from(feedback: entity::feedbacks::Model) -> Self {
        Self {
            id:          feedback.id,
            sender_id:   feedback.sender_id,
            receiver_id: feedback.receiver_id,
            question_id: feedback.question_id,
            session_id:  feedback.session_id,
            value:       feedback.value,
            comment:     feedback.comment,
            rule_number: feedback.rule_number,
            created_at:  feedback.created_at,
            updated_at:  feedback.updated_at,
        }
    }
}

/// One request on the sender's own answer sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignedFeedbackResponse {
    pub id:                   Uuid,
    pub receiver_id:          Uuid,
    pub receiver_name:        Option<String>,
    pub question_id:          Uuid,
    pub question_description: String,
    pub skill_type:           SkillType,
    pub answer:               Answer,
    pub comment:              Option<String>,
    pub updated_at:           DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_respond_request_accepts_null_value() {
        let req: RespondFeedbackRequest = serde_json::from_str(r#"{"value": null, "comment": "n/a"}"#).unwrap();
        assert_eq!(req.value, None);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_comment_length_limit() {
        let req = RespondFeedbackRequest {
            value:   Some(3),
            comment: Some("x".repeat(5001)),
        };
        assert!(req.validate().is_err());
    }
}
