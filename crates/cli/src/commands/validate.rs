//! # CLI Validate Command
//!
//! Checks that the database configuration and the bind address can be
//! assembled from the environment without connecting to anything.

use error::{AppError, Result};
use tracing::info;

use crate::config::{parse_socket_addr, DatabaseConfig};

/// Variables without a usable default.
pub const REQUIRED_VARS: [&str; 3] = [
    "PRISM_DATABASE_NAME",
    "PRISM_DATABASE_USER",
    "PRISM_DATABASE_PASSWORD",
];

/// Validates the CLI configuration
///
/// # Errors
///
/// Returns a validation error listing missing variables, or a config error
/// when a present variable cannot be parsed.
pub fn validate() -> Result<DatabaseConfig> {
    let missing: Vec<&str> = REQUIRED_VARS
        .iter()
        .copied()
        .filter(|var| std::env::var(var).is_err())
        .collect();

    if !missing.is_empty() {
        return Err(AppError::validation(format!(
            "Missing required environment variables: {}",
            missing.join(", ")
        )));
    }

    let config = DatabaseConfig::from_env().map_err(|e| AppError::config(e.to_string()))?;

    let host = std::env::var("PRISM_HOST").unwrap_or_else(|_| "0.0.0.0".to_owned());
    let port = std::env::var("PRISM_PORT").unwrap_or_else(|_| "3000".to_owned());
    let port = port
        .parse::<u16>()
        .map_err(|_e| AppError::config(format!("Invalid PRISM_PORT: {}", port)))?;
    let address = parse_socket_addr(&host, port)
        .map_err(|e| AppError::config(format!("Invalid bind address {}:{}: {}", host, port, e)))?;

    info!(
        target: "validate",
        %address,
        host = %config.host,
        port = %config.port,
        database = %config.database,
        "Configuration is valid"
    );
    Ok(config)
}
