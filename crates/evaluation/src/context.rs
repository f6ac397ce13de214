//! # Request Context
//!
//! The identity of the caller is resolved once per request and passed
//! explicitly to every handler and query.

use entity::{sea_orm_active_enums::UserStatus, users};
use error::{AppError, Result};
use logging::RequestId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id:         Uuid,
    pub email:      String,
    pub company_id: Option<Uuid>,
    pub is_admin:   bool,
    pub status:     UserStatus,
}

impl CurrentUser {
    #[inline]
    pub fn is_active(&self) -> bool { self.status == UserStatus::Active }
}

impl From<&users::Model> for CurrentUser {
    fn from(user: &users::Model) -> Self {
        Self {
            id:         user.id,
            email:      user.email.clone(),
            company_id: user.company_id,
            is_admin:   user.is_admin,
            status:     user.status,
        }
    }
}

/// Per-request state threaded through handlers.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub current_user: Option<CurrentUser>,
    pub request_id:   RequestId,
}

impl RequestContext {
    pub fn new(current_user: Option<CurrentUser>, request_id: RequestId) -> Self {
        Self {
            current_user,
            request_id,
        }
    }

    /// Context for a known user with a fresh request id.
    pub fn for_user(user: CurrentUser) -> Self { Self::new(Some(user), RequestId::new()) }

    /// The caller, or `Unauthorized` when the request carries no identity.
    pub fn user(&self) -> Result<&CurrentUser> {
        self.current_user
            .as_ref()
            .ok_or_else(|| AppError::unauthorized("User not authenticated"))
    }

    /// Company every query of this request is scoped to.
    pub fn company_id(&self) -> Result<Uuid> {
        self.user()?
            .company_id
            .ok_or_else(|| AppError::conflict("company not configured for current user"))
    }

    pub fn is_admin(&self) -> bool { self.current_user.as_ref().is_some_and(|u| u.is_admin) }

    /// Whether the caller is `user_id` or an administrator.
    pub fn is_self_or_admin(&self, user_id: Uuid) -> bool {
        self.current_user
            .as_ref()
            .is_some_and(|u| u.is_admin || u.id == user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(company_id: Option<Uuid>, is_admin: bool) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
            company_id,
            is_admin,
            status: UserStatus::Active,
        }
    }

    #[test]
    fn test_company_not_configured() {
        let ctx = RequestContext::for_user(user(None, true));
        let err = ctx.company_id().unwrap_err();
        assert_eq!(err.message(), "company not configured for current user");
    }

    #[test]
    fn test_company_id() {
        let company = Uuid::new_v4();
        let ctx = RequestContext::for_user(user(Some(company), false));
        assert_eq!(ctx.company_id().unwrap(), company);
    }

    #[test]
    fn test_anonymous_context() {
        let ctx = RequestContext::new(None, RequestId::new());
        assert_eq!(ctx.user().unwrap_err().code(), "UNAUTHORIZED");
        assert!(!ctx.is_admin());
        assert!(!ctx.is_self_or_admin(Uuid::new_v4()));
    }

    #[test]
    fn test_self_or_admin() {
        let me = user(None, false);
        let id = me.id;
        let ctx = RequestContext::for_user(me);
        assert!(ctx.is_self_or_admin(id));
        assert!(!ctx.is_self_or_admin(Uuid::new_v4()));
    }
}
