//! # API Response Types
//!
//! Response envelope shared by every Prism endpoint.
//!
//! ## Response Format
//!
//! ```json
//! { "status": "success", "data": { ... } }
//! { "status": "error", "code": "CONFLICT", "message": "..." }
//! ```

use serde::{Deserialize, Serialize};

/// Pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PaginationMeta {
    /// Current page number (1-indexed).
    pub page: u64,

    /// Number of items per page.
    pub per_page: u64,

    /// Total number of items.
    pub total_items: u64,

    /// Total number of pages.
    pub total_pages: u64,

    /// Has next page.
    pub has_next: bool,

    /// Has previous page.
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Maximum allowed page number.
    pub const MAX_PAGE: u64 = 1_000_000;

    /// Create a new pagination meta.
    ///
    /// `page` is clamped into `1..=MAX_PAGE` and `per_page` to at least 1.
    pub fn new(page: u64, per_page: u64, total_items: u64) -> Self {
        let page = page.clamp(1, Self::MAX_PAGE);
        let per_page = per_page.max(1);
        let total_pages = total_items.div_ceil(per_page);
        Self {
            page,
            per_page,
            total_items,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// Offset for database queries, `None` on overflow.
    pub fn offset(&self) -> Option<u64> { self.page.checked_sub(1)?.checked_mul(self.per_page) }

    /// Calculate limit.
    pub fn limit(&self) -> u64 { self.per_page }
}

/// A page of items plus its pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaginatedResponse<T> {
    /// Items on this page
    pub items:      Vec<T>,
    /// Pagination info
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    /// Build a page from already-fetched items.
    pub fn new(items: Vec<T>, page: u64, per_page: u64, total_items: u64) -> Self {
        Self {
            items,
            pagination: PaginationMeta::new(page, per_page, total_items),
        }
    }
}

/// API response type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum ApiResponse<T> {
    /// Success response.
    Success {
        /// Response data.
        data: T,
    },

    /// Error response.
    Error {
        /// Error code.
        code: String,

        /// Error message.
        message: String,

        /// Request ID for correlation.
        #[serde(skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
    },
}

impl<T> ApiResponse<T> {
    /// Create a success response with data.
    #[inline]
    pub fn ok(data: T) -> Self {
        ApiResponse::Success {
            data,
        }
    }

    /// Create an error response.
    #[inline]
    pub fn error(code: impl ToString, message: impl ToString) -> Self {
        ApiResponse::Error {
            code:       code.to_string(),
            message:    message.to_string(),
            request_id: None,
        }
    }

    /// Attach a request id to an error response; success responses are unchanged.
    #[must_use]
    pub fn with_request_id(self, id: impl ToString) -> Self {
        match self {
            ApiResponse::Error {
                code,
                message,
                ..
            } => {
                ApiResponse::Error {
                    code,
                    message,
                    request_id: Some(id.to_string()),
                }
            },
            other => other,
        }
    }

    /// Get a reference to the data if this is a success response.
    #[inline]
    pub fn data(&self) -> Option<&T> {
        match self {
            ApiResponse::Success {
                data,
            } => Some(data),
            ApiResponse::Error {
                ..
            } => None,
        }
    }

    /// Check if this is a success response.
    #[inline]
    pub fn is_success(&self) -> bool { matches!(self, ApiResponse::Success { .. }) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_ok() {
        let response = ApiResponse::ok("test data");
        assert!(response.is_success());
        assert_eq!(response.data(), Some(&"test data"));
    }

    #[test]
    fn test_response_error_serialization() {
        let response: ApiResponse<()> = ApiResponse::error("NOT_FOUND", "Not found");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"error\""));
        assert!(json.contains("\"code\":\"NOT_FOUND\""));
        assert!(!json.contains("requestId"));
    }

    #[test]
    fn test_response_error_with_request_id() {
        let response: ApiResponse<()> = ApiResponse::error("CONFLICT", "dup").with_request_id("req-1");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["requestId"], "req-1");
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(1, 10, 100);
        assert_eq!(meta.total_pages, 10);
        assert!(meta.has_next);
        assert!(!meta.has_prev);
        assert_eq!(meta.offset(), Some(0));
    }

    #[test]
    fn test_pagination_last_page() {
        let meta = PaginationMeta::new(5, 10, 50);
        assert_eq!(meta.total_pages, 5);
        assert!(!meta.has_next);
        assert!(meta.has_prev);
        assert_eq!(meta.offset(), Some(40));
    }

    #[test]
    fn test_pagination_clamps_page() {
        assert_eq!(PaginationMeta::new(0, 10, 100).page, 1);
        assert_eq!(
            PaginationMeta::new(PaginationMeta::MAX_PAGE + 1, 10, 100).page,
            PaginationMeta::MAX_PAGE
        );
    }

    #[test]
    fn test_pagination_empty() {
        let meta = PaginationMeta::new(1, 20, 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next);
    }

    #[test]
    fn test_paginated_response() {
        let page = PaginatedResponse::new(vec![1, 2, 3], 2, 3, 7);
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.pagination.total_pages, 3);
        assert!(page.pagination.has_next);
    }
}
