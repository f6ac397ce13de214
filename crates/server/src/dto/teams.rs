//! # Team Data Transfer Objects
//!
//! Request and response types for team management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::double_option;

/// Request to create a new team
///
/// The leader is added as a member; the team, its cluster link and its
/// memberships are written in one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateTeamRequest {
    /// Team name
    #[validate(length(
        min = 1,
        max = 255,
        message = "Team name must be between 1 and 255 characters"
    ))]
    pub name:              String,
    pub leader_id:         Uuid,
    #[serde(default)]
    pub is_project:        bool,
    #[serde(default)]
    pub is_cluster_leader: bool,
    /// Cluster the team belongs to
    pub cluster_id:        Option<Uuid>,
    /// Additional members besides the leader
    #[serde(default)]
    #[validate(length(max = 500, message = "At most 500 members can be added at once"))]
    pub member_ids:        Vec<Uuid>,
}

/// Request to update an existing team
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateTeamRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Team name must be between 1 and 255 characters"
    ))]
    pub name:              Option<String>,
    pub leader_id:         Option<Uuid>,
    pub is_project:        Option<bool>,
    pub is_cluster_leader: Option<bool>,
}

/// Request to add a member to a team
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddTeamMemberRequest {
    pub user_id: Uuid,
}

/// Request to move a team to another cluster; `null` detaches it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssignClusterRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub cluster_id: Option<Option<Uuid>>,
}

/// Response for a single team
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamResponse {
    pub id:                Uuid,
    pub name:              String,
    pub leader_id:         Uuid,
    pub company_id:        Uuid,
    pub is_project:        bool,
    pub is_cluster_leader: bool,
    pub cluster_id:        Option<Uuid>,
    /// Only filled on single-team responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_ids:        Option<Vec<Uuid>>,
    pub created_at:        DateTime<Utc>,
    pub updated_at:        DateTime<Utc>,
}

impl TeamResponse {
    pub fn new(team: entity::teams::Model, cluster_id: Option<Uuid>, member_ids: Option<Vec<Uuid>>) -> Self {
        Self {
            id: team.id,
            name: team.name,
            leader_id: team.leader_id,
            company_id: team.company_id,
            is_project: team.is_project,
            is_cluster_leader: team.is_cluster_leader,
            cluster_id,
            member_ids,
            created_at: team.created_at,
            updated_at: team.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_cluster_null_detaches() {
        let req: AssignClusterRequest = serde_json::from_str(r#"{"cluster_id": null}"#).unwrap();
        assert_eq!(req.cluster_id, Some(None));
    }

    #[test]
    fn test_create_team_defaults() {
        let leader = Uuid::new_v4();
        let req: CreateTeamRequest =
            serde_json::from_str(&format!(r#"{{"name": "Platform", "leader_id": "{}"}}"#, leader)).unwrap();
        assert!(!req.is_project);
        assert!(req.member_ids.is_empty());
        assert!(req.validate().is_ok());
    }
}
