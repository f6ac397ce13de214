//! # Database Configuration
//!
//! Reads the `PRISM_DATABASE_*` environment variables and assembles the
//! Postgres connection URL.

use std::net::SocketAddr;

const HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Database configuration for CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host:     String,
    pub port:     u16,
    pub database: String,
    pub username: String,
    pub password: String,
    /// libpq `sslmode` (disable, prefer, require, ...)
    pub ssl_mode: String,
}

/// Errors that can occur when parsing database configuration.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseConfigError {
    #[error("Invalid port number: {value}")]
    InvalidPort { value: String },
}

impl DatabaseConfig {
    /// Creates a new DatabaseConfig from environment variables.
    ///
    /// Returns `Err` if any present variable has an invalid format.
    pub fn from_env() -> Result<Self, DatabaseConfigError> {
        let port_str = std::env::var("PRISM_DATABASE_PORT").unwrap_or_else(|_| "5432".to_owned());
        let port = port_str.parse::<u16>().map_err(|_e| {
            DatabaseConfigError::InvalidPort {
                value: port_str.clone(),
            }
        })?;

        Ok(Self {
            host: std::env::var("PRISM_DATABASE_HOST").unwrap_or_else(|_| "localhost".to_owned()),
            port,
            database: std::env::var("PRISM_DATABASE_NAME").unwrap_or_else(|_| "prism".to_owned()),
            username: std::env::var("PRISM_DATABASE_USER").unwrap_or_else(|_| "prism".to_owned()),
            password: std::env::var("PRISM_DATABASE_PASSWORD").unwrap_or_default(),
            ssl_mode: std::env::var("PRISM_DATABASE_SSL_MODE").unwrap_or_else(|_| "prefer".to_owned()),
        })
    }
}

/// Builds the Postgres connection URL, percent-encoding the credentials.
pub fn build_database_url(config: &DatabaseConfig) -> String {
    format!(
        "postgres://{}:{}@{}:{}/{}?sslmode={}",
        percent_encode_userinfo(&config.username),
        percent_encode_userinfo(&config.password),
        config.host,
        config.port,
        config.database,
        config.ssl_mode
    )
}

/// Encodes everything outside the RFC 3986 unreserved set.
fn percent_encode_userinfo(s: &str) -> String {
    let mut result = String::with_capacity(s.len().saturating_mul(3));
    for byte in s.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            result.push(char::from(byte));
        }
        else {
            result.push('%');
            result.push(char::from(HEX[usize::from(byte >> 4)]));
            result.push(char::from(HEX[usize::from(byte & 0x0F)]));
        }
    }
    result
}

/// Parses a host and port into a SocketAddr, bracketing bare IPv6 hosts.
pub fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, std::net::AddrParseError> {
    let addr_str = if host.contains(':') && !host.starts_with('[') {
        format!("[{}]:{}", host, port)
    }
    else {
        format!("{}:{}", host, port)
    };
    addr_str.parse()
}
