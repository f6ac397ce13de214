use error::{AppError, Result};
use uuid::Uuid;

/// Escape LIKE wildcards (% and _) in a search string
pub fn escape_like_wildcards(s: &str) -> String { s.replace('%', "\\%").replace('_', "\\_") }

/// `%search%` pattern for a case-insensitive LIKE filter.
pub fn like_pattern(search: &str) -> String { format!("%{}%", escape_like_wildcards(search.trim())) }

/// Parse a path segment as a UUID, naming the resource in the error.
pub fn parse_id(raw: &str, resource: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::bad_request(format!("Invalid {} id: {}", resource, raw)))
}
