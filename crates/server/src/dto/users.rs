//! # User Data Transfer Objects
//!
//! Request and response types for user management endpoints.

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::UserStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::double_option;

/// Request to create a new user
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// User's first name
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name:      String,
    /// User's surname
    #[validate(length(
        min = 1,
        max = 255,
        message = "Surname must be between 1 and 255 characters"
    ))]
    pub surname:   String,
    /// User's email address
    #[validate(email(message = "Invalid email format"))]
    pub email:     String,
    /// Level the user is evaluated against
    pub level_id:  Option<Uuid>,
    /// Mentor, another user of the same company
    pub mentor_id: Option<Uuid>,
    #[serde(default)]
    pub is_admin:  bool,
}

/// Request to update a user
///
/// `level_id` and `mentor_id` accept `null` to clear the value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name:      Option<String>,
    #[validate(length(
        min = 1,
        max = 255,
        message = "Surname must be between 1 and 255 characters"
    ))]
    pub surname:   Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email:     Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub level_id:  Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub mentor_id: Option<Option<Uuid>>,
    pub is_admin:  Option<bool>,
    pub status:    Option<UserStatus>,
}

/// Filters for the user list
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserFilter {
    pub status:    Option<UserStatus>,
    pub level_id:  Option<Uuid>,
    pub mentor_id: Option<Uuid>,
}

/// Response for a single user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponse {
    pub id:         Uuid,
    pub name:       String,
    pub surname:    String,
    pub full_name:  String,
    pub email:      String,
    pub company_id: Option<Uuid>,
    pub level_id:   Option<Uuid>,
    pub mentor_id:  Option<Uuid>,
    pub is_admin:   bool,
    pub status:     UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::users::Model> for UserResponse {
    fn from(user: entity::users::Model) -> Self {
        Self {
            full_name:  user.full_name(),
            id:         user.id,
            name:       user.name,
            surname:    user.surname,
            email:      user.email,
            company_id: user.company_id,
            level_id:   user.level_id,
            mentor_id:  user.mentor_id,
            is_admin:   user.is_admin,
            status:     user.status,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_distinguishes_null_from_missing() {
        let req: UpdateUserRequest = serde_json::from_str(r#"{"mentor_id": null}"#).unwrap();
        assert_eq!(req.mentor_id, Some(None));
        assert_eq!(req.level_id, None);

        let id = Uuid::new_v4();
        let req: UpdateUserRequest = serde_json::from_str(&format!(r#"{{"level_id": "{}"}}"#, id)).unwrap();
        assert_eq!(req.level_id, Some(Some(id)));
    }

    #[test]
    fn test_create_request_validation() {
        let req = CreateUserRequest {
            name:      "Ada".to_string(),
            surname:   "Lovelace".to_string(),
            email:     "not-an-email".to_string(),
            level_id:  None,
            mentor_id: None,
            is_admin:  false,
        };
        assert!(req.validate().is_err());
    }
}
