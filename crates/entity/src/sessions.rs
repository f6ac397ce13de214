//! Sessions Entity
//!
//! An evaluation round. Created preparing, started once feedback requests
//! exist, concluded when results are final.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub use crate::sea_orm_active_enums::SessionStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:         uuid::Uuid,
    pub name:       String,
    pub start_time: Option<chrono::DateTime<chrono::Utc>>,
    pub end_time:   Option<chrono::DateTime<chrono::Utc>>,
    pub status:     SessionStatus,
    pub company_id: uuid::Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::feedbacks::Entity")]
    Feedbacks,
    #[sea_orm(has_many = "super::session_clusters::Entity")]
    SessionClusters,
    #[sea_orm(has_many = "super::session_rules::Entity")]
    SessionRules,
}

impl Related<super::feedbacks::Entity> for Entity {
    fn to() -> RelationDef { Relation::Feedbacks.def() }
}

impl Related<super::session_clusters::Entity> for Entity {
    fn to() -> RelationDef { Relation::SessionClusters.def() }
}

impl Related<super::session_rules::Entity> for Entity {
    fn to() -> RelationDef { Relation::SessionRules.def() }
}

impl Related<super::clusters::Entity> for Entity {
    fn to() -> RelationDef { super::session_clusters::Relation::Cluster.def() }

    fn via() -> Option<RelationDef> { Some(super::session_clusters::Relation::Session.def().rev()) }
}

impl Related<super::rules::Entity> for Entity {
    fn to() -> RelationDef { super::session_rules::Relation::Rule.def() }

    fn via() -> Option<RelationDef> { Some(super::session_rules::Relation::Session.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}
