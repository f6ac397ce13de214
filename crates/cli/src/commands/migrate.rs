//! # CLI Migration Command
//!
//! Applies, previews or rolls back schema migrations, optionally followed by
//! the rule template seeds.

use error::{AppError, Result};
use migration::{Migrator, MigratorTrait as _};
use tracing::info;

use crate::{
    commands::MigrateArgs,
    config::{build_database_url, DatabaseConfig},
};

/// Runs database migrations
///
/// # Errors
///
/// Returns a migration error if the database is unreachable or a migration fails.
pub async fn migrate(config: &DatabaseConfig, args: MigrateArgs) -> Result<()> {
    info!(
        target: "migrate",
        dry_run = %args.dry_run,
        rollback = %args.rollback,
        seed = %args.seed,
        "Running database migrations..."
    );

    let db = migration::connect_to_database(&build_database_url(config))
        .await
        .map_err(|e| AppError::database(format!("Failed to connect to database: {}", e)))?;

    if args.dry_run {
        let pending = Migrator::get_pending_migrations(&db)
            .await
            .map_err(|e| AppError::migration(format!("Failed to get pending migrations: {}", e)))?;

        info!(target: "migrate", pending_count = %pending.len(), "Pending migrations found");
        for m in &pending {
            info!(target: "migrate", migration = %m.name(), "Would apply");
        }
        return Ok(());
    }

    if args.rollback {
        Migrator::down(&db, Some(1))
            .await
            .map_err(|e| AppError::migration(format!("Failed to rollback migration: {}", e)))?;

        info!(target: "migrate", "Rollback completed successfully");
        return Ok(());
    }

    Migrator::up(&db, None)
        .await
        .map_err(|e| AppError::migration(format!("Failed to run migrations: {}", e)))?;
    info!(target: "migrate", "Migrations completed successfully");

    if args.seed {
        let results = migration::seeds::run_all_seeds(&db, true).await?;
        let inserted: usize = results.iter().map(|r| r.inserted_count).sum();
        info!(target: "migrate", seeds = results.len(), inserted, "Seed data applied");
    }
    Ok(())
}
