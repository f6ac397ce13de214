//! # Data Transfer Objects Module
//!
//! Request and response types for API endpoints.

use serde::{Deserialize, Deserializer};
use validator::Validate;

pub mod clusters;
pub mod feedbacks;
pub mod initiatives;
pub mod levels;
pub mod processes;
pub mod questions;
pub mod results;
pub mod rules;
pub mod sessions;
pub mod teams;
pub mod users;

/// Default page size for list endpoints
pub const DEFAULT_PER_PAGE: u64 = 20;
/// Upper bound on the page size
pub const MAX_PER_PAGE: u64 = 100;

/// Query parameters shared by list endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct ListQuery {
    /// Page number (1-indexed)
    pub page:     Option<u64>,
    /// Items per page
    pub per_page: Option<u64>,
    /// Case-insensitive name search
    #[validate(length(max = 255, message = "Search must not exceed 255 characters"))]
    pub search:   Option<String>,
}

impl ListQuery {
    pub fn page(&self) -> u64 { self.page.unwrap_or(1).max(1) }

    pub fn per_page(&self) -> u64 { self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE) }

    /// Non-blank search term.
    pub fn search(&self) -> Option<&str> { self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) }
}

/// Distinguish an absent field from an explicit `null`.
///
/// Used with `#[serde(default, deserialize_with = "double_option")]`: a
/// missing field stays `None`, `null` becomes `Some(None)`.
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Request body listing the ids that replace an association.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct ReplaceIdsRequest {
    #[validate(length(max = 500, message = "At most 500 ids can be assigned at once"))]
    pub ids: Vec<uuid::Uuid>,
}
