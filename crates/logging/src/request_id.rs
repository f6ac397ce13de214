//! # Request ID Tracking
//!
//! Identifiers correlating log lines and error envelopes of a single request.
//! The id travels with the request context instead of thread-local storage,
//! since handlers hop across runtime threads.

/// Header carrying the request id in and out of the service.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// A request ID, either supplied by the caller or generated from a UUID v4.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random request ID.
    #[inline]
    pub fn new() -> Self { Self(uuid::Uuid::new_v4().simple().to_string()) }

    /// Accept a caller-supplied id if it looks safe to echo back.
    pub fn try_from_header(value: &str) -> Option<Self> {
        let value = value.trim();
        let valid = (8 ..= 64).contains(&value.len()) &&
            value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| Self(value.to_string()))
    }

    /// Reuse the caller's id when valid, otherwise generate one.
    pub fn from_header_or_new(value: Option<&str>) -> Self { value.and_then(Self::try_from_header).unwrap_or_default() }

    /// Get the request ID as a string.
    #[inline]
    pub fn as_str(&self) -> &str { &self.0 }
}

impl Default for RequestId {
    #[inline]
    fn default() -> Self { Self::new() }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(&self.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_uniqueness() {
        assert_ne!(RequestId::new(), RequestId::new());
        assert_eq!(RequestId::new().as_str().len(), 32);
    }

    #[test]
    fn test_try_from_header() {
        let id = RequestId::try_from_header("  req-2026-10-17_abc  ").unwrap();
        assert_eq!(id.as_str(), "req-2026-10-17_abc");
    }

    #[test]
    fn test_try_from_header_invalid() {
        assert!(RequestId::try_from_header("short").is_none());
        assert!(RequestId::try_from_header("invalid!@#chars").is_none());
    }

    #[test]
    fn test_from_header_or_new() {
        let kept = RequestId::from_header_or_new(Some("abcdef123456"));
        assert_eq!(kept.as_str(), "abcdef123456");

        let generated = RequestId::from_header_or_new(Some("bad id!"));
        assert_eq!(generated.as_str().len(), 32);
    }
}
