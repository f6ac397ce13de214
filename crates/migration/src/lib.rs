//! # Prism Database Migrations
//!
//! Schema migrations, the duplicate-removal procedure and seed data.

pub use sea_orm_migration::prelude::*;

mod m20261001_000001_create_directory_tables;
mod m20261001_000002_create_catalog_tables;
mod m20261001_000003_create_session_tables;
mod m20261001_000004_add_updated_at_triggers;
mod m20261001_000005_create_remove_duplicate_feedbacks;
pub mod migrator;
pub mod seeds;

pub use migrator::Migrator;

/// Database connection helper for CLI usage
pub async fn connect_to_database(database_url: &str) -> Result<sea_orm::DatabaseConnection, sea_orm::DbErr> {
    sea_orm::Database::connect(database_url).await
}
