//! Rules selected for a session.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "session_rules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub session_id: uuid::Uuid,
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub rule_id:    uuid::Uuid,
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
        belongs_to = "super::rules::Entity",
        from = "Column::RuleId",
        to = "super::rules::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Rule,
}

impl Related<super::sessions::Entity> for Entity {
    fn to() -> RelationDef { Relation::Session.def() }
}

impl Related<super::rules::Entity> for Entity {
    fn to() -> RelationDef { Relation::Rule.def() }
}

impl ActiveModelBehavior for ActiveModel {}
