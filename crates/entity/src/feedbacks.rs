//! Feedbacks Entity
//!
//! One feedback request from `sender` about `receiver` on a question.
//! `value` is null until answered; 0 means "no basis to answer".

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "feedbacks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:          uuid::Uuid,
    pub sender_id:   uuid::Uuid,
    pub receiver_id: uuid::Uuid,
    pub question_id: uuid::Uuid,
    pub session_id:  uuid::Uuid,
    pub value:       Option<i16>,
    #[sea_orm(column_type = "Text", nullable)]
    pub comment:     Option<String>,
    pub rule_number: Option<i32>,
    pub created_at:  chrono::DateTime<chrono::Utc>,
    pub updated_at:  chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::SenderId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Sender,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ReceiverId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Receiver,
    #[sea_orm(
        belongs_to = "super::questions::Entity",
        from = "Column::QuestionId",
        to = "super::questions::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Question,
    #[sea_orm(
        belongs_to = "super::sessions::Entity",
        from = "Column::SessionId",
        to = "super::sessions::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Session,
}

impl Related<super::questions::Entity> for Entity {
    fn to() -> RelationDef { Relation::Question.def() }
}

impl Related<super::sessions::Entity> for Entity {
    fn to() -> RelationDef { Relation::Session.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether the sender has answered, including "no basis to answer".
    pub fn is_answered(&self) -> bool { self.value.is_some() }

    /// Whether the comment carries any text.
    pub fn has_comment(&self) -> bool { self.comment.as_deref().is_some_and(|c| !c.trim().is_empty()) }
}
