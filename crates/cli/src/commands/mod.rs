//! # CLI Commands
//!
//! Subcommands of the `prism` binary.

pub mod completions;
pub mod migrate;
pub mod validate;

use clap::{Args, Subcommand};

/// Available commands for the Prism CLI
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the API server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Verify configuration
    Validate,
}

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Server host to bind to
    #[arg(long, env = "PRISM_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Server port to bind to
    #[arg(short, long, env = "PRISM_PORT", default_value = "3000")]
    pub port: u16,

    /// Skip applying pending migrations before serving
    #[arg(long, env = "PRISM_SKIP_MIGRATIONS")]
    pub skip_migrations: bool,
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// List pending migrations without applying them
    #[arg(long, conflicts_with = "rollback")]
    pub dry_run: bool,

    /// Rollback the last migration
    #[arg(long)]
    pub rollback: bool,

    /// Insert the rule templates after migrating
    #[arg(long, conflicts_with_all = ["dry_run", "rollback"])]
    pub seed: bool,
}

/// Arguments for the completions command
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
