//! Users Entity
//!
//! People being evaluated and evaluating others, scoped to a company.
//!
//! CUSTOMIZATION REGION START: user_entity_custom_types
//! This region is preserved during entity regeneration. Add custom types and implementations here.
//! CUSTOMIZATION REGION END

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub use crate::sea_orm_active_enums::UserStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:         uuid::Uuid,
    pub name:       String,
    pub surname:    String,
    #[sea_orm(unique)]
    pub email:      String,
    pub company_id: Option<uuid::Uuid>,
    pub level_id:   Option<uuid::Uuid>,
    pub mentor_id:  Option<uuid::Uuid>,
    pub is_admin:   bool,
    pub status:     UserStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::levels::Entity",
        from = "Column::LevelId",
        to = "super::levels::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Level,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::MentorId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Mentor,
    #[sea_orm(has_many = "super::user_teams::Entity")]
    UserTeams,
}

impl Related<super::levels::Entity> for Entity {
    fn to() -> RelationDef { Relation::Level.def() }
}

impl Related<super::user_teams::Entity> for Entity {
    fn to() -> RelationDef { Relation::UserTeams.def() }
}

impl Related<super::teams::Entity> for Entity {
    fn to() -> RelationDef { super::user_teams::Relation::Team.def() }

    fn via() -> Option<RelationDef> { Some(super::user_teams::Relation::User.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}

// CUSTOMIZATION REGION START: user_entity_methods
impl Model {
    /// Display name used in reports.
    pub fn full_name(&self) -> String { format!("{} {}", self.name, self.surname) }
}
// CUSTOMIZATION REGION END
