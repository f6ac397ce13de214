//! # Prism Error Infrastructure
//!
//! Error types and API response handling for the Prism feedback service.

pub mod middleware;
pub mod rejection;
pub mod response;
pub mod traits;

pub use middleware::{attach_request_id, ErrorEnvelope, ErrorHandler};
pub use response::{ApiResponse, PaginatedResponse, PaginationMeta};
pub use traits::{Context, ResultExt};

/// Convenience type alias for Result with AppError.
pub type Result<T, E = AppError> = std::result::Result<T, E>;

/// Main application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("NotFound: {message}")]
    NotFound {
        message: String,
    },

    #[error("BadRequest: {message}")]
    BadRequest {
        message: String,
    },

    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
    },

    #[error("Forbidden: {message}")]
    Forbidden {
        message: String,
    },

    #[error("Conflict: {message}")]
    Conflict {
        message: String,
    },

    #[error("Validation: {message}")]
    Validation {
        message: String,
    },

    #[error("Internal: {message}")]
    Internal {
        message: String,
    },

    #[error("Database: {message}")]
    Database {
        message: String,
    },

    #[error("IO: {message}")]
    Io {
        message: String,
    },

    #[error("Config: {message}")]
    Config {
        message: String,
    },

    #[error("Migration: {message}")]
    Migration {
        message: String,
    },
}

/// Seed operation result
#[derive(Debug, Clone)]
pub struct SeedResult {
    /// Number of records inserted
    pub inserted_count: usize,
    /// Number of records that already existed and were left untouched
    pub skipped_count:  usize,
    /// Seed name for logging
    pub seed_name:      String,
    /// Duration of the seed operation in milliseconds
    pub duration_ms:    u64,
    /// Any errors that occurred
    pub errors:         Vec<String>,
}

impl SeedResult {
    /// Creates a new successful seed result
    #[must_use]
    pub fn success(seed_name: &str, inserted: usize, skipped: usize, duration_ms: u64) -> Self {
        Self {
            inserted_count: inserted,
            skipped_count: skipped,
            seed_name: seed_name.to_string(),
            duration_ms,
            errors: Vec::new(),
        }
    }

    /// Creates a new failed seed result
    #[must_use]
    pub fn with_error(seed_name: &str, error: &str) -> Self {
        Self {
            inserted_count: 0,
            skipped_count:  0,
            seed_name:      seed_name.to_string(),
            duration_ms:    0,
            errors:         vec![error.to_string()],
        }
    }

    /// Returns true if the seed operation was successful
    #[must_use]
    pub fn is_success(&self) -> bool { self.errors.is_empty() }
}

impl AppError {
    /// Create a not found error.
    #[inline]
    pub fn not_found(resource: impl ToString) -> Self {
        Self::NotFound {
            message: resource.to_string(),
        }
    }

    /// Create a bad request error.
    #[inline]
    pub fn bad_request(message: impl ToString) -> Self {
        Self::BadRequest {
            message: message.to_string(),
        }
    }

    /// Create an unauthorized error.
    #[inline]
    pub fn unauthorized(message: impl ToString) -> Self {
        Self::Unauthorized {
            message: message.to_string(),
        }
    }

    /// Create a forbidden error.
    #[inline]
    pub fn forbidden(message: impl ToString) -> Self {
        Self::Forbidden {
            message: message.to_string(),
        }
    }

    /// Create a conflict error.
    #[inline]
    pub fn conflict(message: impl ToString) -> Self {
        Self::Conflict {
            message: message.to_string(),
        }
    }

    /// Create a validation error.
    #[inline]
    pub fn validation(message: impl ToString) -> Self {
        Self::Validation {
            message: message.to_string(),
        }
    }

    /// Create an internal error.
    #[inline]
    pub fn internal(message: impl ToString) -> Self {
        Self::Internal {
            message: message.to_string(),
        }
    }

    /// Create a database error.
    #[inline]
    pub fn database(message: impl ToString) -> Self {
        Self::Database {
            message: message.to_string(),
        }
    }

    /// Create a config error.
    #[inline]
    pub fn config(message: impl ToString) -> Self {
        Self::Config {
            message: message.to_string(),
        }
    }

    /// Create a migration error.
    #[inline]
    pub fn migration(message: impl ToString) -> Self {
        Self::Migration {
            message: message.to_string(),
        }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> http::StatusCode {
        match self {
            AppError::NotFound {
                ..
            } => http::StatusCode::NOT_FOUND,
            AppError::BadRequest {
                ..
            } => http::StatusCode::BAD_REQUEST,
            AppError::Unauthorized {
                ..
            } => http::StatusCode::UNAUTHORIZED,
            AppError::Forbidden {
                ..
            } => http::StatusCode::FORBIDDEN,
            AppError::Conflict {
                ..
            } => http::StatusCode::CONFLICT,
            AppError::Validation {
                ..
            } => http::StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal {
                ..
            } |
            AppError::Database {
                ..
            } |
            AppError::Io {
                ..
            } |
            AppError::Config {
                ..
            } |
            AppError::Migration {
                ..
            } => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound {
                ..
            } => "NOT_FOUND",
            AppError::BadRequest {
                ..
            } => "BAD_REQUEST",
            AppError::Unauthorized {
                ..
            } => "UNAUTHORIZED",
            AppError::Forbidden {
                ..
            } => "FORBIDDEN",
            AppError::Conflict {
                ..
            } => "CONFLICT",
            AppError::Validation {
                ..
            } => "VALIDATION_ERROR",
            AppError::Internal {
                ..
            } => "INTERNAL_ERROR",
            AppError::Database {
                ..
            } => "DATABASE_ERROR",
            AppError::Io {
                ..
            } => "IO_ERROR",
            AppError::Config {
                ..
            } => "CONFIG_ERROR",
            AppError::Migration {
                ..
            } => "MIGRATION_ERROR",
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::NotFound {
                message,
            } |
            AppError::BadRequest {
                message,
            } |
            AppError::Unauthorized {
                message,
            } |
            AppError::Forbidden {
                message,
            } |
            AppError::Conflict {
                message,
            } |
            AppError::Validation {
                message,
            } |
            AppError::Internal {
                message,
            } |
            AppError::Database {
                message,
            } |
            AppError::Io {
                message,
            } |
            AppError::Config {
                message,
            } |
            AppError::Migration {
                message,
            } => message.clone(),
        }
    }

    /// Whether the error is caused by the caller (4xx) rather than the service.
    pub fn is_client_error(&self) -> bool { self.status().is_client_error() }

    /// Add context to the error.
    #[inline]
    pub fn context(self, context: impl ToString) -> Self {
        let context_msg = context.to_string();
        let wrap = |message: String| format!("{}: {}", context_msg, message);
        match self {
            AppError::NotFound {
                message,
            } => {
                Self::NotFound {
                    message: wrap(message),
                }
            },
            AppError::BadRequest {
                message,
            } => {
                Self::BadRequest {
                    message: wrap(message),
                }
            },
            AppError::Unauthorized {
                message,
            } => {
                Self::Unauthorized {
                    message: wrap(message),
                }
            },
            AppError::Forbidden {
                message,
            } => {
                Self::Forbidden {
                    message: wrap(message),
                }
            },
            AppError::Conflict {
                message,
            } => {
                Self::Conflict {
                    message: wrap(message),
                }
            },
            AppError::Validation {
                message,
            } => {
                Self::Validation {
                    message: wrap(message),
                }
            },
            AppError::Internal {
                message,
            } => {
                Self::Internal {
                    message: wrap(message),
                }
            },
            AppError::Database {
                message,
            } => {
                Self::Database {
                    message: wrap(message),
                }
            },
            AppError::Io {
                message,
            } => {
                Self::Io {
                    message: wrap(message),
                }
            },
            AppError::Config {
                message,
            } => {
                Self::Config {
                    message: wrap(message),
                }
            },
            AppError::Migration {
                message,
            } => {
                Self::Migration {
                    message: wrap(message),
                }
            },
        }
    }
}

/// Convert anyhow errors to AppError.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

/// Convert std::io errors to AppError.
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

/// Convert String to AppError.
impl From<String> for AppError {
    fn from(s: String) -> Self {
        Self::BadRequest {
            message: s,
        }
    }
}

/// Convert &str to AppError.
impl From<&str> for AppError {
    fn from(s: &str) -> Self { Self::from(s.to_string()) }
}

/// Convert Sea-ORM database errors to AppError.
impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database {
            message: err.to_string(),
        }
    }
}

/// Convert validator validation errors to AppError.
///
/// Field-level and struct-level (schema) messages are both collected, so a
/// weights-sum failure reaches the client with its own message.
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = err
            .errors()
            .iter()
            .flat_map(|(field, kind)| {
                match kind {
                    validator::ValidationErrorsKind::Field(errors) => {
                        errors
                            .iter()
                            .map(|e| {
                                e.message
                                    .as_ref()
                                    .map(|s| s.to_string())
                                    .unwrap_or_else(|| format!("Invalid value for {}", field))
                            })
                            .collect::<Vec<_>>()
                    },
                    _ => vec![format!("Invalid value for {}", field)],
                }
            })
            .collect();

        let message = if messages.is_empty() {
            "Validation failed".to_string()
        }
        else {
            messages.join(", ")
        };

        Self::Validation {
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_not_found() {
        let err = AppError::not_found("Session not found");
        assert_eq!(err.status(), http::StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "NOT_FOUND");
        assert!(err.to_string().contains("NotFound"));
    }

    #[test]
    fn test_error_conflict() {
        let err = AppError::conflict("Rule 2 already applied");
        assert_eq!(err.status(), http::StatusCode::CONFLICT);
        assert_eq!(err.code(), "CONFLICT");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_error_validation() {
        let err = AppError::validation("Weights must sum to 100");
        assert_eq!(err.status(), http::StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_error_database_is_server_error() {
        let err = AppError::database("procedure failed");
        assert_eq!(err.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "DATABASE_ERROR");
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_error_context() {
        let err = AppError::database("connection reset").context("Failed to generate rule 3");
        assert_eq!(err.message(), "Failed to generate rule 3: connection reset");
        assert_eq!(err.code(), "DATABASE_ERROR");
    }

    #[test]
    fn test_from_db_err() {
        let err: AppError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert!(matches!(err, AppError::Database { .. }));
        assert!(err.message().contains("boom"));
    }

    #[test]
    fn test_from_str_is_bad_request() {
        let err: AppError = "no basis to answer".into();
        assert_eq!(err.code(), "BAD_REQUEST");
    }

    #[test]
    fn test_from_anyhow() {
        let err: AppError = anyhow::anyhow!("unexpected").into();
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_seed_result() {
        let ok = SeedResult::success("rule_templates", 6, 0, 12);
        assert!(ok.is_success());
        assert_eq!(ok.inserted_count, 6);

        let failed = SeedResult::with_error("rule_templates", "table missing");
        assert!(!failed.is_success());
    }
}
