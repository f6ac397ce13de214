//! # Error Response Handling
//!
//! Converts [`AppError`] values into JSON HTTP responses.
//!
//! ## Usage
//!
//! ```rust
//! use error::{middleware::ErrorHandler, AppError};
//!
//! let handler = ErrorHandler::new(false);
//! let error = AppError::not_found("Session not found");
//! let response = handler.to_response(&error);
//! assert_eq!(response.status(), 404);
//! ```

use axum::{
    http::{header::CONTENT_LENGTH, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::{response::ApiResponse, AppError};

/// Code and client-facing message of a rendered error, kept in the response
/// extensions so an outer layer can re-render the body with a request id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub code:    String,
    pub message: String,
}

/// Error handler that converts errors to HTTP responses.
#[derive(Clone, Debug)]
pub struct ErrorHandler {
    /// Whether to include server-side error details in the response.
    pub include_details: bool,
}

impl ErrorHandler {
    /// Create a new error handler.
    #[inline]
    pub fn new(include_details: bool) -> Self {
        Self {
            include_details,
        }
    }

    /// Convert an error to a response.
    ///
    /// Client errors always carry their message, since those are the banners
    /// shown to the operator. Server errors are masked unless
    /// `include_details` is set.
    pub fn to_response(&self, err: &AppError) -> Response {
        let status = err.status();
        let message = if self.include_details || err.is_client_error() {
            err.message()
        }
        else {
            match status {
                StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".to_string(),
                _ => "An error occurred".to_string(),
            }
        };

        if !err.is_client_error() {
            tracing::error!(code = err.code(), error = %err, "Request failed");
        }

        let body = ApiResponse::<()>::error(err.code(), &message);
        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(ErrorEnvelope {
            code: err.code().to_string(),
            message,
        });
        response
    }
}

/// Re-render an error response so its envelope carries `request_id`.
///
/// Responses that were not produced by [`ErrorHandler`] are returned unchanged.
pub fn attach_request_id(response: Response, request_id: &str) -> Response {
    let (mut parts, body) = response.into_parts();
    let Some(envelope) = parts.extensions.remove::<ErrorEnvelope>()
    else {
        return Response::from_parts(parts, body);
    };

    let body = ApiResponse::<()>::error(envelope.code, envelope.message).with_request_id(request_id);
    parts.headers.remove(CONTENT_LENGTH);
    Response::from_parts(parts, Json(body).into_response().into_body())
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let handler = ErrorHandler::new(false);
        handler.to_response(&self)
    }
}
