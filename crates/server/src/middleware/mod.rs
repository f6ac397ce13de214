//! # HTTP Middleware
//!
//! Request context resolution and permission helpers.

pub mod context;
pub mod permissions;

pub use context::{context_middleware, USER_ID_HEADER};
