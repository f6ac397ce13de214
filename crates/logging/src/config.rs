//! # Logging Configuration
//!
//! Configuration for the logging subsystem.
//! Supports environment variables and programmatic configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*, Registry};

/// Boxed subscriber plus the guard that keeps the file writer flushing.
pub type BuiltSubscriber = (
    Box<dyn tracing::Subscriber + Send + Sync>,
    Option<WorkerGuard>,
);

/// Logging configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingConfig {
    /// Log level or filter directive (debug, info, `server=debug,sea_orm=warn`)
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format (json, pretty, compact)
    #[serde(default = "default_format")]
    pub format: String,

    /// Optional log file path, rotated hourly
    #[serde(default)]
    pub log_file: Option<String>,

    /// Environment (development, testing, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_level() -> String { "info".to_string() }

fn default_format() -> String { "compact".to_string() }

fn default_environment() -> String { "development".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level:       default_level(),
            format:      default_format(),
            log_file:    None,
            environment: default_environment(),
        }
    }
}

impl LoggingConfig {
    /// Create configuration from environment variables, falling back to the given values.
    pub fn from_env(level: &str, format: &str, log_file: Option<&str>) -> Self {
        Self {
            level:       std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string()),
            format:      std::env::var("PRISM_LOG_FORMAT").unwrap_or_else(|_| format.to_string()),
            log_file:    std::env::var("PRISM_LOG_FILE")
                .ok()
                .or(log_file.map(|s| s.to_string())),
            environment: std::env::var("PRISM_ENV").unwrap_or_else(|_| default_environment()),
        }
    }

    /// Whether this configuration targets production.
    pub fn is_production(&self) -> bool { self.environment.eq_ignore_ascii_case("production") }

    fn filter(&self) -> EnvFilter { EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info")) }

    /// Build the tracing subscriber from this configuration.
    ///
    /// The returned guard must be held for as long as file logging should keep flushing.
    pub fn build(&self) -> BuiltSubscriber {
        match self.format.as_str() {
            "json" => self.build_json_subscriber(),
            "pretty" => (self.build_pretty_subscriber(), None),
            _ => (self.build_compact_subscriber(), None),
        }
    }

    /// Build a JSON subscriber for production logging.
    fn build_json_subscriber(&self) -> BuiltSubscriber {
        let stdout_layer = fmt::layer()
            .json()
            .with_timer(fmt::time::UtcTime::rfc_3339());

        match self.log_file {
            Some(ref log_file) => {
                let path = Path::new(log_file);
                let directory = path.parent().unwrap_or_else(|| Path::new("."));
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "prism.log".to_string());
                let file_appender = tracing_appender::rolling::hourly(directory, file_name);
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
                let file_layer = fmt::layer().json().with_writer(non_blocking);
                (
                    Box::new(
                        Registry::default()
                            .with(self.filter())
                            .with(stdout_layer)
                            .with(file_layer),
                    ),
                    Some(guard),
                )
            },
            None => {
                (
                    Box::new(Registry::default().with(self.filter()).with(stdout_layer)),
                    None,
                )
            },
        }
    }

    /// Build a pretty subscriber for development logging.
    fn build_pretty_subscriber(&self) -> Box<dyn tracing::Subscriber + Send + Sync> {
        let layer = fmt::layer()
            .pretty()
            .with_timer(fmt::time::UtcTime::rfc_3339());
        Box::new(Registry::default().with(self.filter()).with(layer))
    }

    /// Build a compact subscriber for terminals and tests.
    fn build_compact_subscriber(&self) -> Box<dyn tracing::Subscriber + Send + Sync> {
        let layer = fmt::layer()
            .compact()
            .with_timer(fmt::time::UtcTime::rfc_3339());
        Box::new(Registry::default().with(self.filter()).with(layer))
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn test_config_fallbacks() {
        std::env::remove_var("RUST_LOG");
        std::env::remove_var("PRISM_LOG_FORMAT");
        std::env::remove_var("PRISM_ENV");

        let config = LoggingConfig::from_env("info", "json", None);
        assert_eq!(config.level, "info");
        assert_eq!(config.format, "json");
        assert_eq!(config.environment, "development");
        assert!(!config.is_production());
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        std::env::set_var("RUST_LOG", "debug");
        std::env::set_var("PRISM_LOG_FORMAT", "pretty");
        std::env::set_var("PRISM_ENV", "production");

        let config = LoggingConfig::from_env("info", "json", None);
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, "pretty");
        assert!(config.is_production());

        std::env::remove_var("RUST_LOG");
        std::env::remove_var("PRISM_LOG_FORMAT");
        std::env::remove_var("PRISM_ENV");
    }

    #[test]
    fn test_build_json_subscriber() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            format: "json".to_string(),
            ..Default::default()
        };
        let (_subscriber, guard) = config.build();
        assert!(guard.is_none());
    }

    #[test]
    fn test_build_with_directive_filter() {
        let config = LoggingConfig {
            level: "server=debug,sea_orm=warn".to_string(),
            format: "pretty".to_string(),
            ..Default::default()
        };
        let _ = config.build();
    }
}
