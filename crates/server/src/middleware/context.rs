//! # Request Context Middleware
//!
//! Resolves the caller from the `X-User-Id` header set by the upstream
//! authentication proxy and attaches a [`RequestContext`] to the request.
//! The request id is taken from `X-Request-Id` when valid and echoed back,
//! both as a header and inside error envelopes.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use entity::{sea_orm_active_enums::UserStatus, users::Entity as UsersEntity};
use error::{AppError, Result};
use evaluation::{CurrentUser, RequestContext};
use logging::{request_id::REQUEST_ID_HEADER, RequestId};
use sea_orm::EntityTrait;
use tracing::debug;
use uuid::Uuid;

use crate::AppState;

/// Header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Resolve the caller and request id, then run the rest of the stack.
///
/// Requests without an identity header continue anonymously; handlers
/// reject them through their permission checks. A malformed or unknown id
/// or an inactive user is rejected here.
pub async fn context_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let started = Instant::now();
    let request_id = RequestId::from_header_or_new(
        request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok()),
    );

    let mut response = match resolve_current_user(&state, request.headers()).await {
        Ok(current_user) => {
            let method = request.method().clone();
            let path = request.uri().path().to_string();
            request
                .extensions_mut()
                .insert(RequestContext::new(current_user, request_id.clone()));

            let response = next.run(request).await;
            debug!(
                target: "http",
                request_id = %request_id,
                %method,
                path = %path,
                status = response.status().as_u16(),
                duration_ms = started.elapsed().as_millis() as u64,
                "Request completed"
            );
            response
        },
        Err(err) => {
            logging::warn_with_request!(target: "http", request_id, error = %err, "Rejected request identity");
            err.into_response()
        },
    };

    response = error::attach_request_id(response, request_id.as_str());
    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Parse the identity header, if any.
pub fn user_id_from_headers(headers: &HeaderMap) -> Result<Option<Uuid>> {
    let Some(value) = headers.get(USER_ID_HEADER)
    else {
        return Ok(None);
    };
    let raw = value
        .to_str()
        .map_err(|_| AppError::unauthorized("Invalid X-User-Id header encoding"))?;
    Uuid::parse_str(raw.trim())
        .map(Some)
        .map_err(|_| AppError::unauthorized("Invalid X-User-Id header"))
}

async fn resolve_current_user(state: &AppState, headers: &HeaderMap) -> Result<Option<CurrentUser>> {
    let Some(user_id) = user_id_from_headers(headers)?
    else {
        return Ok(None);
    };

    let user = UsersEntity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::unauthorized("Unknown user"))?;
    if user.status == UserStatus::Inactive {
        return Err(AppError::unauthorized("User is inactive"));
    }

    Ok(Some(CurrentUser::from(&user)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_header_is_anonymous() {
        assert_eq!(user_id_from_headers(&HeaderMap::new()).unwrap(), None);
    }

    #[test]
    fn test_valid_header() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_str(&id.to_string()).unwrap());
        assert_eq!(user_id_from_headers(&headers).unwrap(), Some(id));
    }

    #[test]
    fn test_malformed_header_is_unauthorized() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("admin"));
        let err = user_id_from_headers(&headers).unwrap_err();
        assert_eq!(err.code(), "UNAUTHORIZED");
    }
}
