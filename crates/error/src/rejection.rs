//! # Rejection Handlers
//!
//! Converts Axum extractor rejections into [`AppError`] so malformed bodies and
//! query strings share the standard error envelope.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};

use crate::AppError;

/// Extract the field name from serde's "missing field `name`" message.
fn missing_field(message: &str) -> Option<&str> {
    let start = message.find("missing field `")? + "missing field `".len();
    let len = message[start ..].find('`')?;
    Some(&message[start .. start + len])
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        match missing_field(&message) {
            Some(field) => AppError::bad_request(format!("Missing required field: {}", field)),
            None => AppError::bad_request(message),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::bad_request(format!(
            "Query string deserialization error: {}",
            rejection.body_text()
        ))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::bad_request(format!("Invalid path parameter: {}", rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_extraction() {
        let msg = "Failed to deserialize the JSON body into the target type: missing field `name` at line 1 column 2";
        assert_eq!(missing_field(msg), Some("name"));
    }

    #[test]
    fn test_missing_field_absent() {
        assert_eq!(missing_field("expected value at line 1 column 1"), None);
    }
}
