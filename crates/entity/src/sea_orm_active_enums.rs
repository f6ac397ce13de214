//! Active enums shared by several entities.
//!
//! All enums are stored as plain strings so the schema stays readable from SQL.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User account status enumeration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// Account is active and takes part in sessions
    #[sea_orm(string_value = "active")]
    Active,
    /// Account is disabled by an administrator
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Inactive => write!(f, "inactive"),
        }
    }
}

/// Skill family a question evaluates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkillType {
    #[sea_orm(string_value = "SOFT")]
    Soft,
    #[sea_orm(string_value = "EXECUTION")]
    Execution,
    #[sea_orm(string_value = "STRATEGY")]
    Strategy,
}

impl std::fmt::Display for SkillType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkillType::Soft => write!(f, "SOFT"),
            SkillType::Execution => write!(f, "EXECUTION"),
            SkillType::Strategy => write!(f, "STRATEGY"),
        }
    }
}

/// Lifecycle status of an evaluation session.
///
/// The stored values are the labels shown to operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum SessionStatus {
    /// Feedback requests are being generated; clusters and rules are editable
    #[sea_orm(string_value = "In preparazione")]
    #[serde(rename = "In preparazione")]
    Preparing,
    /// Users are answering their feedback requests
    #[sea_orm(string_value = "In corso")]
    #[serde(rename = "In corso")]
    Active,
    /// Results are final
    #[sea_orm(string_value = "Conclusa")]
    #[serde(rename = "Conclusa")]
    Concluded,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Preparing => write!(f, "In preparazione"),
            SessionStatus::Active => write!(f, "In corso"),
            SessionStatus::Concluded => write!(f, "Conclusa"),
        }
    }
}
