//! # Seed Data Management
//!
//! Reference data every installation needs. Seeds are idempotent: rows that
//! already exist are skipped.

mod rule_templates;

use ::error::{AppError, SeedResult};
use sea_orm::DatabaseConnection;

pub use rule_templates::{RuleTemplate, RuleTemplateSeed, RULE_TEMPLATES};

/// Trait for seed data providers
#[async_trait::async_trait]
pub trait SeedProvider: Send + Sync {
    /// The name of this seed
    fn name(&self) -> &str;

    /// Runs the seed operation
    ///
    /// # Errors
    ///
    /// Returns an error if the seed operation fails.
    async fn run(&self, db: &DatabaseConnection) -> Result<SeedResult, AppError>;
}

/// All registered seed providers, in execution order.
pub fn providers() -> Vec<Box<dyn SeedProvider>> { vec![Box::new(RuleTemplateSeed)] }

/// Runs all registered seed providers
///
/// # Errors
///
/// Returns an error if any seed operation fails.
pub async fn run_all_seeds(db: &DatabaseConnection, verbose: bool) -> Result<Vec<SeedResult>, AppError> {
    let mut results = Vec::new();

    for provider in providers() {
        let result = provider.run(db).await?;
        if verbose {
            tracing::info!(
                target: "seeds",
                seed = %result.seed_name,
                inserted = result.inserted_count,
                skipped = result.skipped_count,
                duration_ms = result.duration_ms,
                "Seed applied"
            );
        }
        results.push(result);
    }

    Ok(results)
}
