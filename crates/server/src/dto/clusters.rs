//! # Cluster Data Transfer Objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateClusterRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Cluster name must be between 1 and 255 characters"
    ))]
    pub name:      String,
    pub leader_id: Uuid,
    #[validate(range(min = 0, max = 100, message = "Cluster level must be between 0 and 100"))]
    pub level:     i16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateClusterRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Cluster name must be between 1 and 255 characters"
    ))]
    pub name:      Option<String>,
    pub leader_id: Option<Uuid>,
    #[validate(range(min = 0, max = 100, message = "Cluster level must be between 0 and 100"))]
    pub level:     Option<i16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterResponse {
    pub id:         Uuid,
    pub name:       String,
    pub leader_id:  Uuid,
    pub level:      i16,
    pub company_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_ids:   Option<Vec<Uuid>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClusterResponse {
    pub fn new(cluster: entity::clusters::Model, team_ids: Option<Vec<Uuid>>) -> Self {
        Self {
            id: cluster.id,
            name: cluster.name,
            leader_id: cluster.leader_id,
            level: cluster.level,
            company_id: cluster.company_id,
            team_ids,
            created_at: cluster.created_at,
            updated_at: cluster.updated_at,
        }
    }
}
