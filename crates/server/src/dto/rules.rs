//! # Rule Data Transfer Objects
//!
//! Rules describe how feedback requests are generated. `content_sql` is kept
//! for operators to read; the service never executes it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::double_option;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateRuleRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Rule name must be between 1 and 255 characters"
    ))]
    pub name:        String,
    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 20000, message = "SQL content must not exceed 20000 characters"))]
    pub content_sql: Option<String>,
    /// Generation procedure the rule maps to
    pub number:      i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateRuleRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Rule name must be between 1 and 255 characters"
    ))]
    pub name:        Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub content_sql: Option<Option<String>>,
    pub number:      Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleResponse {
    pub id:          Uuid,
    pub name:        String,
    pub description: Option<String>,
    pub content_sql: Option<String>,
    pub number:      i32,
    pub is_template: bool,
    pub company_id:  Option<Uuid>,
    pub created_at:  DateTime<Utc>,
    pub updated_at:  DateTime<Utc>,
}

impl From<entity::rules::Model> for RuleResponse {
    fn from(rule: entity::rules::Model) -> Self {
        Self {
            id:          rule.id,
            name:        rule.name,
            description: rule.description,
            content_sql: rule.content_sql,
            number:      rule.number,
            is_template: rule.is_template,
            company_id:  rule.company_id,
            created_at:  rule.created_at,
            updated_at:  rule.updated_at,
        }
    }
}
