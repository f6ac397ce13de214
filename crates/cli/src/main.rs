//! # Prism CLI
//!
//! Command-line interface for the Prism 360° feedback service.
//!
//! ## Usage
//!
//! ```bash
//! prism serve             # Start the API server (applies migrations first)
//! prism migrate --seed    # Apply migrations and insert the rule templates
//! prism completions zsh   # Print shell completions
//! prism validate          # Check the environment
//! ```

mod commands;
mod config;
mod server;

use clap::{CommandFactory as _, Parser};
use commands::Commands;
use config::DatabaseConfig;
use error::{AppError, Result};

/// Prism - 360° feedback administration
#[derive(Parser, Debug)]
#[command(name = "prism")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level or filter directive (debug, info, `server=debug,sea_orm=warn`)
    #[arg(short = 'L', long, env = "RUST_LOG", default_value = "info")]
    log_level: String,

    /// Output format (json, pretty, compact)
    #[arg(short, long, env = "PRISM_LOG_FORMAT", default_value = "pretty")]
    log_format: String,

    /// Also write logs to this file, rotated hourly
    #[arg(long, env = "PRISM_LOG_FILE")]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Commands::Completions(args) = &cli.command {
        return commands::completions::completions(args.shell, &mut Cli::command());
    }

    let _guard = logging::init(&cli.log_level, &cli.log_format, cli.log_file.as_deref())
        .map_err(|e| AppError::config(format!("Failed to initialize logging: {}", e)))?;

    logging::info!(target: "app", command = ?cli.command, "Prism CLI starting...");

    match cli.command {
        Commands::Serve(args) => {
            let config = DatabaseConfig::from_env().map_err(|e| AppError::config(e.to_string()))?;
            server::serve(&config, &args).await?;
        },
        Commands::Migrate(args) => {
            let config = DatabaseConfig::from_env().map_err(|e| AppError::config(e.to_string()))?;
            commands::migrate::migrate(&config, args).await?;
        },
        Commands::Validate => {
            commands::validate::validate()?;
        },
        Commands::Completions(_) => {},
    }

    logging::info!(target: "app", "Prism CLI completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_parse_serve() {
        let cli = Cli::parse_from(["prism", "serve", "--host", "127.0.0.1", "--port", "8080"]);
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.host, "127.0.0.1");
                assert_eq!(args.port, 8080);
                assert!(!args.skip_migrations);
            },
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_parse_validate() {
        let cli = Cli::parse_from(["prism", "validate"]);
        assert!(matches!(cli.command, Commands::Validate));
    }

    #[test]
    fn test_migrate_seed() {
        let cli = Cli::parse_from(["prism", "migrate", "--seed"]);
        match cli.command {
            Commands::Migrate(args) => {
                assert!(args.seed);
                assert!(!args.rollback);
            },
            _ => panic!("Expected Migrate command"),
        }
    }

    #[test]
    fn test_migrate_seed_conflicts_with_rollback() {
        let result = Cli::try_parse_from(["prism", "migrate", "--seed", "--rollback"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_completions_shell() {
        let cli = Cli::parse_from(["prism", "completions", "bash"]);
        match cli.command {
            Commands::Completions(args) => assert_eq!(args.shell, clap_complete::Shell::Bash),
            _ => panic!("Expected Completions command"),
        }
    }

    #[test]
    fn test_cli_command_factory() {
        let cmd = Cli::command();
        cmd.clone().debug_assert();
        assert_eq!(cmd.get_name(), "prism");
    }
}
