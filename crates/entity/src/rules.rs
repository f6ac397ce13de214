//! Rules Entity
//!
//! Feedback-generation rules. `content_sql` documents what the matching
//! database procedure does; the service never executes it.
//! Templates have no company and are copied by administrators.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "rules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:          uuid::Uuid,
    pub name:        String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub content_sql: Option<String>,
    pub number:      i32,
    pub is_template: bool,
    pub company_id:  Option<uuid::Uuid>,
    pub created_at:  chrono::DateTime<chrono::Utc>,
    pub updated_at:  chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::session_rules::Entity")]
    SessionRules,
}

impl Related<super::session_rules::Entity> for Entity {
    fn to() -> RelationDef { Relation::SessionRules.def() }
}

impl ActiveModelBehavior for ActiveModel {}
