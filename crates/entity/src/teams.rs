//! Teams Entity
//!
//! Working groups of a company. A team belongs to at most one cluster.
//!
//! CUSTOMIZATION REGION START: teams_entity_custom_types
//! This region is preserved during entity regeneration. Add custom types and implementations here.
//! CUSTOMIZATION REGION END

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "teams")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:                uuid::Uuid,
    pub name:              String,
    pub leader_id:         uuid::Uuid,
    pub company_id:        uuid::Uuid,
    pub is_project:        bool,
    pub is_cluster_leader: bool,
    pub created_at:        chrono::DateTime<chrono::Utc>,
    pub updated_at:        chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::LeaderId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Leader,
    #[sea_orm(has_many = "super::user_teams::Entity")]
    UserTeams,
    #[sea_orm(has_many = "super::team_clusters::Entity")]
    TeamClusters,
}

impl Related<super::user_teams::Entity> for Entity {
    fn to() -> RelationDef { Relation::UserTeams.def() }
}

impl Related<super::team_clusters::Entity> for Entity {
    fn to() -> RelationDef { Relation::TeamClusters.def() }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef { super::user_teams::Relation::User.def() }

    fn via() -> Option<RelationDef> { Some(super::user_teams::Relation::Team.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}

// CUSTOMIZATION REGION START: teams_entity_methods
// Add custom methods and trait implementations here
// CUSTOMIZATION REGION END
