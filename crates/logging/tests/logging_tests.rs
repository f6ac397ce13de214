//! # Logging Configuration Tests
//!
//! Tests for structured logging setup and configuration.

#[cfg(test)]
mod logging_config_tests {
    use logging::LoggingConfig;

    #[test]
    fn test_logging_config_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, "compact");
        assert_eq!(config.environment, "development");
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_config_deserializes_kebab_case() {
        let config: LoggingConfig =
            serde_json::from_str(r#"{"level":"warn","log-file":"/var/log/prism/app.log"}"#).unwrap();
        assert_eq!(config.level, "warn");
        assert_eq!(config.format, "compact");
        assert_eq!(config.log_file.as_deref(), Some("/var/log/prism/app.log"));
    }
}

#[cfg(test)]
mod macro_tests {
    use logging::{info_with_request, log_db_call, measure_duration, warn_with_request, RequestId};

    #[test]
    fn test_request_macros_expand() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let request_id = RequestId::new();
        info_with_request!(target: "api", request_id, rule = 3, "Rule generated");
        warn_with_request!(target: "api", request_id, "Rule already applied");
        log_db_call!("generate_rule1_feedbacks", "session-1", 12);
    }

    #[test]
    fn test_measure_duration_returns_value() {
        let value = measure_duration!("test", "sum", { 2 + 2 });
        assert_eq!(value, 4);
    }
}
