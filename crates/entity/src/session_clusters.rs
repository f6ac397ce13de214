//! Clusters taking part in a session.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "session_clusters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub session_id: uuid::Uuid,
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub cluster_id: uuid::Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sessions::Entity",
        from = "Column::SessionId",
        to = "super::sessions::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Session,
    #[sea_orm(
        belongs_to = "super::clusters::Entity",
        from = "Column::ClusterId",
        to = "super::clusters::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Cluster,
}

impl Related<super::sessions::Entity> for Entity {
    fn to() -> RelationDef { Relation::Session.def() }
}

impl Related<super::clusters::Entity> for Entity {
    fn to() -> RelationDef { Relation::Cluster.def() }
}

impl ActiveModelBehavior for ActiveModel {}
