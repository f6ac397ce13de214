//! Simple enum tests for entity crate
//! These tests avoid database access and only exercise the string mappings.

use entity::sea_orm_active_enums::{SessionStatus, SkillType, UserStatus};
use sea_orm::{ActiveEnum, Iterable};

/// Test SessionStatus stored values
#[test]
fn test_session_status_values() {
    assert_eq!(SessionStatus::Preparing.to_value(), "In preparazione");
    assert_eq!(SessionStatus::Active.to_value(), "In corso");
    assert_eq!(SessionStatus::Concluded.to_value(), "Conclusa");
}

/// Test SessionStatus parsing from stored values
#[test]
fn test_session_status_try_from_value() {
    assert_eq!(
        SessionStatus::try_from_value(&"In corso".to_string()).unwrap(),
        SessionStatus::Active
    );
    assert!(SessionStatus::try_from_value(&"Cancellata".to_string()).is_err());
}

/// Test SessionStatus display matches storage
#[test]
fn test_session_status_display() {
    for status in SessionStatus::iter() {
        assert_eq!(status.to_string(), status.to_value());
    }
}

/// Test SessionStatus JSON uses the stored labels
#[test]
fn test_session_status_serde() {
    let json = serde_json::to_string(&SessionStatus::Preparing).unwrap();
    assert_eq!(json, "\"In preparazione\"");
    let parsed: SessionStatus = serde_json::from_str("\"Conclusa\"").unwrap();
    assert_eq!(parsed, SessionStatus::Concluded);
}

/// Test SkillType values
#[test]
fn test_skill_type_values() {
    assert_eq!(format!("{}", SkillType::Soft), "SOFT");
    assert_eq!(format!("{}", SkillType::Execution), "EXECUTION");
    assert_eq!(format!("{}", SkillType::Strategy), "STRATEGY");
    assert_eq!(SkillType::Execution.to_value(), "EXECUTION");
}

/// Test SkillType JSON
#[test]
fn test_skill_type_serde() {
    let parsed: SkillType = serde_json::from_str("\"STRATEGY\"").unwrap();
    assert_eq!(parsed, SkillType::Strategy);
    assert!(serde_json::from_str::<SkillType>("\"strategy\"").is_err());
}

/// Test UserStatus values
#[test]
fn test_user_status_values() {
    assert_eq!(format!("{}", UserStatus::Active), "active");
    assert_eq!(format!("{}", UserStatus::Inactive), "inactive");
}

/// Test UserStatus equality
#[test]
fn test_user_status_equality() {
    assert_eq!(UserStatus::Active, UserStatus::Active);
    assert_ne!(UserStatus::Active, UserStatus::Inactive);
}

/// Test enum Debug
#[test]
fn test_enum_debug() {
    assert!(format!("{:?}", SessionStatus::Preparing).contains("Preparing"));
    assert!(format!("{:?}", SkillType::Soft).contains("Soft"));
    assert!(format!("{:?}", UserStatus::Active).contains("Active"));
}
