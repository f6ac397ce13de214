//! Levels Entity
//!
//! Career levels. Each level weighs the three skill families and sets the
//! standard score a person at that level is expected to reach.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "levels")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:               uuid::Uuid,
    pub role:             String,
    pub step:             i16,
    pub execution_weight: i16,
    pub soft_weight:      i16,
    pub strategy_weight:  i16,
    #[sea_orm(column_type = "Double")]
    pub standard:         f64,
    pub company_id:       uuid::Uuid,
    pub created_at:       chrono::DateTime<chrono::Utc>,
    pub updated_at:       chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::users::Entity")]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef { Relation::Users.def() }
}

impl ActiveModelBehavior for ActiveModel {}
