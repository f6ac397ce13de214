//! # Permission Service
//!
//! Permissions follow a `resource:action` naming convention, e.g.
//! `sessions:start` or `feedbacks:respond`.
//!
//! Administrators hold every permission. Active regular users may read the
//! sessions of their company, answer the feedback they were asked for, read
//! their own results and write initiatives for themselves. Inactive users
//! hold nothing.

use serde::{Deserialize, Serialize};

use crate::context::RequestContext;

/// Represents a single permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    /// Users, teams, clusters, levels, questions, processes and rules
    Directory(DirectoryAction),
    Sessions(SessionAction),
    Feedbacks(FeedbackAction),
    Results(ResultAction),
    Initiatives(InitiativeAction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectoryAction {
    Read,
    Manage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionAction {
    Read,
    Manage,
    /// Run rule procedures and remove duplicates
    Generate,
    Start,
    Conclude,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedbackAction {
    /// Every feedback of the company
    ReadAll,
    /// Feedback the caller has to give
    ReadOwn,
    Respond,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultAction {
    ReadAll,
    ReadOwn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InitiativeAction {
    ReadAll,
    ReadOwn,
    CreateOwn,
    Manage,
}

impl Permission {
    /// Parse a permission string into a Permission enum
    #[must_use]
    pub fn from_string(s: &str) -> Option<Self> {
        let (resource, action) = s.split_once(':')?;
        match resource {
            "directory" => DirectoryAction::from_string(action).map(Permission::Directory),
            "sessions" => SessionAction::from_string(action).map(Permission::Sessions),
            "feedbacks" => FeedbackAction::from_string(action).map(Permission::Feedbacks),
            "results" => ResultAction::from_string(action).map(Permission::Results),
            "initiatives" => InitiativeAction::from_string(action).map(Permission::Initiatives),
            _ => None,
        }
    }

    /// Whether a regular active user holds this permission.
    fn granted_to_members(self) -> bool {
        matches!(
            self,
            Permission::Sessions(SessionAction::Read) |
                Permission::Feedbacks(FeedbackAction::ReadOwn | FeedbackAction::Respond) |
                Permission::Results(ResultAction::ReadOwn) |
                Permission::Initiatives(InitiativeAction::ReadOwn | InitiativeAction::CreateOwn)
        )
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Permission::Directory(action) => write!(f, "directory:{}", action),
            Permission::Sessions(action) => write!(f, "sessions:{}", action),
            Permission::Feedbacks(action) => write!(f, "feedbacks:{}", action),
            Permission::Results(action) => write!(f, "results:{}", action),
            Permission::Initiatives(action) => write!(f, "initiatives:{}", action),
        }
    }
}

impl std::fmt::Display for DirectoryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DirectoryAction::Read => write!(f, "read"),
            DirectoryAction::Manage => write!(f, "manage"),
        }
    }
}

impl DirectoryAction {
    #[must_use]
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "read" => Some(DirectoryAction::Read),
            "manage" => Some(DirectoryAction::Manage),
            _ => None,
        }
    }
}

impl std::fmt::Display for SessionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionAction::Read => write!(f, "read"),
            SessionAction::Manage => write!(f, "manage"),
            SessionAction::Generate => write!(f, "generate"),
            SessionAction::Start => write!(f, "start"),
            SessionAction::Conclude => write!(f, "conclude"),
        }
    }
}

impl SessionAction {
    #[must_use]
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "read" => Some(SessionAction::Read),
            "manage" => Some(SessionAction::Manage),
            "generate" => Some(SessionAction::Generate),
            "start" => Some(SessionAction::Start),
            "conclude" => Some(SessionAction::Conclude),
            _ => None,
        }
    }
}

impl std::fmt::Display for FeedbackAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedbackAction::ReadAll => write!(f, "read_all"),
            FeedbackAction::ReadOwn => write!(f, "read_own"),
            FeedbackAction::Respond => write!(f, "respond"),
        }
    }
}

impl FeedbackAction {
    #[must_use]
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "read_all" => Some(FeedbackAction::ReadAll),
            "read_own" => Some(FeedbackAction::ReadOwn),
            "respond" => Some(FeedbackAction::Respond),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResultAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultAction::ReadAll => write!(f, "read_all"),
            ResultAction::ReadOwn => write!(f, "read_own"),
        }
    }
}

impl ResultAction {
    #[must_use]
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "read_all" => Some(ResultAction::ReadAll),
            "read_own" => Some(ResultAction::ReadOwn),
            _ => None,
        }
    }
}

impl std::fmt::Display for InitiativeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InitiativeAction::ReadAll => write!(f, "read_all"),
            InitiativeAction::ReadOwn => write!(f, "read_own"),
            InitiativeAction::CreateOwn => write!(f, "create_own"),
            InitiativeAction::Manage => write!(f, "manage"),
        }
    }
}

impl InitiativeAction {
    #[must_use]
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "read_all" => Some(InitiativeAction::ReadAll),
            "read_own" => Some(InitiativeAction::ReadOwn),
            "create_own" => Some(InitiativeAction::CreateOwn),
            "manage" => Some(InitiativeAction::Manage),
            _ => None,
        }
    }
}

/// Permission check result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionCheckResult {
    /// User has the permission
    Allowed,
    /// User doesn't have the permission
    Denied,
    /// User is not authenticated
    Unauthenticated,
}

/// Permission service for checking the caller's permissions
#[derive(Clone, Copy, Debug, Default)]
pub struct PermissionService;

impl PermissionService {
    /// Check whether the caller of `ctx` holds `permission`.
    #[must_use]
    pub fn check(ctx: &RequestContext, permission: Permission) -> PermissionCheckResult {
        let Some(user) = ctx.current_user.as_ref()
        else {
            return PermissionCheckResult::Unauthenticated;
        };

        let allowed = user.is_active() && (user.is_admin || permission.granted_to_members());
        tracing::debug!(
            user_id = %user.id,
            permission = %permission,
            allowed,
            "Permission check"
        );

        if allowed {
            PermissionCheckResult::Allowed
        }
        else {
            PermissionCheckResult::Denied
        }
    }

    /// Check that every permission is held.
    #[must_use]
    pub fn check_all(ctx: &RequestContext, permissions: &[Permission]) -> PermissionCheckResult {
        for permission in permissions {
            match Self::check(ctx, *permission) {
                PermissionCheckResult::Allowed => {},
                other => return other,
            }
        }
        PermissionCheckResult::Allowed
    }

    /// Check that at least one permission is held.
    #[must_use]
    pub fn check_any(ctx: &RequestContext, permissions: &[Permission]) -> PermissionCheckResult {
        let mut result = PermissionCheckResult::Denied;
        for permission in permissions {
            match Self::check(ctx, *permission) {
                PermissionCheckResult::Allowed => return PermissionCheckResult::Allowed,
                PermissionCheckResult::Unauthenticated => return PermissionCheckResult::Unauthenticated,
                PermissionCheckResult::Denied => result = PermissionCheckResult::Denied,
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use entity::sea_orm_active_enums::UserStatus;
    use logging::RequestId;
    use uuid::Uuid;

    use super::*;
    use crate::context::CurrentUser;

    fn ctx(is_admin: bool, status: UserStatus) -> RequestContext {
        RequestContext::for_user(CurrentUser {
            id: Uuid::new_v4(),
            email: "grace@example.com".to_string(),
            company_id: Some(Uuid::new_v4()),
            is_admin,
            status,
        })
    }

    #[test]
    fn test_permission_round_trip_strings() {
        let permission = Permission::Sessions(SessionAction::Start);
        assert_eq!(permission.to_string(), "sessions:start");
        assert_eq!(Permission::from_string("sessions:start"), Some(permission));
        assert_eq!(Permission::from_string("sessions"), None);
        assert_eq!(Permission::from_string("unknown:read"), None);
    }

    #[test]
    fn test_admin_holds_everything() {
        let admin = ctx(true, UserStatus::Active);
        assert_eq!(
            PermissionService::check(&admin, Permission::Sessions(SessionAction::Generate)),
            PermissionCheckResult::Allowed
        );
        assert_eq!(
            PermissionService::check(&admin, Permission::Directory(DirectoryAction::Manage)),
            PermissionCheckResult::Allowed
        );
    }

    #[test]
    fn test_member_permissions() {
        let member = ctx(false, UserStatus::Active);
        assert_eq!(
            PermissionService::check(&member, Permission::Feedbacks(FeedbackAction::Respond)),
            PermissionCheckResult::Allowed
        );
        assert_eq!(
            PermissionService::check(&member, Permission::Results(ResultAction::ReadAll)),
            PermissionCheckResult::Denied
        );
        assert_eq!(
            PermissionService::check(&member, Permission::Sessions(SessionAction::Start)),
            PermissionCheckResult::Denied
        );
    }

    #[test]
    fn test_inactive_admin_denied() {
        let inactive = ctx(true, UserStatus::Inactive);
        assert_eq!(
            PermissionService::check(&inactive, Permission::Sessions(SessionAction::Read)),
            PermissionCheckResult::Denied
        );
    }

    #[test]
    fn test_anonymous_unauthenticated() {
        let anonymous = RequestContext::new(None, RequestId::new());
        assert_eq!(
            PermissionService::check_any(&anonymous, &[Permission::Results(ResultAction::ReadOwn)]),
            PermissionCheckResult::Unauthenticated
        );
    }

    #[test]
    fn test_any_and_all() {
        let member = ctx(false, UserStatus::Active);
        let mixed = [
            Permission::Results(ResultAction::ReadAll),
            Permission::Results(ResultAction::ReadOwn),
        ];
        assert_eq!(PermissionService::check_any(&member, &mixed), PermissionCheckResult::Allowed);
        assert_eq!(PermissionService::check_all(&member, &mixed), PermissionCheckResult::Denied);
    }
}
