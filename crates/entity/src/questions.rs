//! Questions Entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub use crate::sea_orm_active_enums::SkillType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:          uuid::Uuid,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub skill_type:  SkillType,
    pub company_id:  uuid::Uuid,
    pub created_at:  chrono::DateTime<chrono::Utc>,
    pub updated_at:  chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::feedbacks::Entity")]
    Feedbacks,
    #[sea_orm(has_many = "super::processes::Entity")]
    Processes,
}

impl Related<super::feedbacks::Entity> for Entity {
    fn to() -> RelationDef { Relation::Feedbacks.def() }
}

impl Related<super::processes::Entity> for Entity {
    fn to() -> RelationDef { Relation::Processes.def() }
}

impl ActiveModelBehavior for ActiveModel {}
