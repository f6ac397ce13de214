//! # Error Traits
//!
//! Conversion helpers for attaching context to fallible calls.

use crate::{AppError, Result};

/// Trait for adding context to errors.
pub trait Context<T> {
    fn context<C: ToString>(self, context: C) -> Result<T>;
}

impl<T, E> Context<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn context<C: ToString>(self, context: C) -> Result<T> {
        self.map_err(|e| {
            let err: AppError = e.into();
            err.context(context)
        })
    }
}

impl<T> Context<T> for Option<T> {
    /// Missing values become `NotFound` carrying the context as message.
    fn context<C: ToString>(self, context: C) -> Result<T> { self.ok_or_else(|| AppError::not_found(context)) }
}

/// Extension methods for Result types.
pub trait ResultExt<T> {
    fn log_error(self) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn log_error(self) -> Result<T> {
        self.map_err(|e| {
            let err: AppError = e.into();
            tracing::error!(error = %err, "Error occurred");
            err
        })
    }
}
