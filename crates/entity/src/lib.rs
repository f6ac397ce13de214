//! Entity definitions for Prism
//!
//! This crate contains Sea-ORM entity definitions for the database models.
//! Entities mirror the schema created by the `migration` crate.

pub mod sea_orm_active_enums;

pub mod clusters;
pub use clusters::Entity as Clusters;
pub mod feedbacks;
pub use feedbacks::Entity as Feedbacks;
pub mod initiatives;
pub use initiatives::Entity as Initiatives;
pub mod levels;
pub use levels::Entity as Levels;
pub mod processes;
pub use processes::Entity as Processes;
pub mod questions;
pub use questions::Entity as Questions;
pub mod rules;
pub use rules::Entity as Rules;
pub mod session_clusters;
pub use session_clusters::Entity as SessionClusters;
pub mod session_rules;
pub use session_rules::Entity as SessionRules;
pub mod sessions;
pub use sessions::Entity as Sessions;
pub mod team_clusters;
pub use team_clusters::Entity as TeamClusters;
pub mod teams;
pub use teams::Entity as Teams;
pub mod user_processes;
pub use user_processes::Entity as UserProcesses;
pub mod user_teams;
pub use user_teams::Entity as UserTeams;
pub mod users;
pub use users::Entity as Users;
