//! Processes Entity
//!
//! Company processes, optionally tied to the question that evaluates them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "processes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:                 uuid::Uuid,
    pub name:               String,
    pub linked_question_id: Option<uuid::Uuid>,
    pub company_id:         uuid::Uuid,
    pub created_at:         chrono::DateTime<chrono::Utc>,
    pub updated_at:         chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::questions::Entity",
        from = "Column::LinkedQuestionId",
        to = "super::questions::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    LinkedQuestion,
    #[sea_orm(has_many = "super::user_processes::Entity")]
    UserProcesses,
}

impl Related<super::questions::Entity> for Entity {
    fn to() -> RelationDef { Relation::LinkedQuestion.def() }
}

impl Related<super::user_processes::Entity> for Entity {
    fn to() -> RelationDef { Relation::UserProcesses.def() }
}

impl ActiveModelBehavior for ActiveModel {}
