//! # Permission Helpers
//!
//! In-handler checks for rules that depend on the target resource, such as
//! "the receiver themself or an administrator".

use error::{AppError, Result};
use evaluation::{
    permissions::{Permission, PermissionCheckResult, PermissionService},
    RequestContext,
};
use uuid::Uuid;

/// Require `permission`, mapping the outcome to an error.
pub fn require(ctx: &RequestContext, permission: Permission) -> Result<()> {
    match PermissionService::check(ctx, permission) {
        PermissionCheckResult::Allowed => Ok(()),
        PermissionCheckResult::Denied => {
            Err(AppError::forbidden(format!(
                "Permission '{}' is required",
                permission
            )))
        },
        PermissionCheckResult::Unauthenticated => Err(AppError::unauthorized("User not authenticated")),
    }
}

/// Allow administrators, or the caller acting on their own `user_id`.
pub fn require_self_or_admin(ctx: &RequestContext, user_id: Uuid) -> Result<()> {
    ctx.user()?;
    if ctx.is_self_or_admin(user_id) {
        Ok(())
    }
    else {
        Err(AppError::forbidden("Only administrators can access other users' data"))
    }
}

#[cfg(test)]
mod tests {
    use entity::sea_orm_active_enums::UserStatus;
    use evaluation::{
        permissions::{DirectoryAction, ResultAction},
        CurrentUser,
    };
    use logging::RequestId;

    use super::*;

    fn member() -> RequestContext {
        RequestContext::for_user(CurrentUser {
            id:         Uuid::new_v4(),
            email:      "ada@example.com".to_string(),
            company_id: Some(Uuid::new_v4()),
            is_admin:   false,
            status:     UserStatus::Active,
        })
    }

    #[test]
    fn test_require_member_permissions() {
        let ctx = member();
        assert!(require(&ctx, Permission::Results(ResultAction::ReadOwn)).is_ok());

        let err = require(&ctx, Permission::Directory(DirectoryAction::Manage)).unwrap_err();
        assert_eq!(err.code(), "FORBIDDEN");
    }

    #[test]
    fn test_require_anonymous() {
        let ctx = RequestContext::new(None, RequestId::new());
        let err = require(&ctx, Permission::Results(ResultAction::ReadOwn)).unwrap_err();
        assert_eq!(err.code(), "UNAUTHORIZED");
    }

    #[test]
    fn test_require_self_or_admin() {
        let ctx = member();
        let own_id = ctx.user().unwrap().id;
        assert!(require_self_or_admin(&ctx, own_id).is_ok());
        assert!(require_self_or_admin(&ctx, Uuid::new_v4()).is_err());
    }
}
