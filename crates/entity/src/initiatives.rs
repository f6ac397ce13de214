//! Initiatives Entity
//!
//! Free-text improvement notes a user attaches to a feedback topic.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "initiatives")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:              uuid::Uuid,
    #[sea_orm(column_type = "Text")]
    pub description:     String,
    pub session_id:      uuid::Uuid,
    pub question_id:     uuid::Uuid,
    pub user_id:         uuid::Uuid,
    pub initiative_type: String,
    pub created_at:      chrono::DateTime<chrono::Utc>,
    pub updated_at:      chrono::DateTime<chrono::Utc>,
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
        belongs_to = "super::questions::Entity",
        from = "Column::QuestionId",
        to = "super::questions::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Question,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::sessions::Entity> for Entity {
    fn to() -> RelationDef { Relation::Session.def() }
}

impl Related<super::questions::Entity> for Entity {
    fn to() -> RelationDef { Relation::Question.def() }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl ActiveModelBehavior for ActiveModel {}
