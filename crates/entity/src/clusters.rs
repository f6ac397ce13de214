//! Clusters Entity
//!
//! Groups of teams evaluated together in a session.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "clusters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:         uuid::Uuid,
    pub name:       String,
    pub leader_id:  uuid::Uuid,
    pub level:      i16,
    pub company_id: uuid::Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::LeaderId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Leader,
    #[sea_orm(has_many = "super::team_clusters::Entity")]
    TeamClusters,
    #[sea_orm(has_many = "super::session_clusters::Entity")]
    SessionClusters,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef { Relation::Leader.def() }
}

impl Related<super::team_clusters::Entity> for Entity {
    fn to() -> RelationDef { Relation::TeamClusters.def() }
}

impl Related<super::session_clusters::Entity> for Entity {
    fn to() -> RelationDef { Relation::SessionClusters.def() }
}

impl Related<super::teams::Entity> for Entity {
    fn to() -> RelationDef { super::team_clusters::Relation::Team.def() }

    fn via() -> Option<RelationDef> { Some(super::team_clusters::Relation::Cluster.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}
