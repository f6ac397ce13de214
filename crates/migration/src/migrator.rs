//! # Database Migrator
//!
//! This module implements the Sea-ORM migrator trait for managing database schema changes.
//! The migrator coordinates all migration operations and maintains the migration history.

use sea_orm_migration::prelude::*;

use crate::{
    m20261001_000001_create_directory_tables,
    m20261001_000002_create_catalog_tables,
    m20261001_000003_create_session_tables,
    m20261001_000004_add_updated_at_triggers,
    m20261001_000005_create_remove_duplicate_feedbacks,
};

/// The main migrator that coordinates all migration operations
///
/// # Example
///
/// ```rust,ignore
/// use migration::{Migrator, MigratorTrait};
///
/// Migrator::up(&db, None).await?;
/// ```
#[derive(Debug)]
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    /// Migrations are executed in the order they appear in this list.
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_create_directory_tables::Migration),
            Box::new(m20261001_000002_create_catalog_tables::Migration),
            Box::new(m20261001_000003_create_session_tables::Migration),
            Box::new(m20261001_000004_add_updated_at_triggers::Migration),
            Box::new(m20261001_000005_create_remove_duplicate_feedbacks::Migration),
        ]
    }
}
