//! # Router Tests
//!
//! Requests sent through the full router, middleware included.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{empty_state, init_test_env, state_with, user};
use http_body_util::BodyExt;
use sea_orm::{DatabaseBackend, MockDatabase};
use serde_json::Value;
use server::{create_app_router, middleware::USER_ID_HEADER};
use tower::ServiceExt;
use uuid::Uuid;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

#[tokio::test]
async fn test_health_check() {
    init_test_env();
    let app = create_app_router(empty_state());

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let body = body_json(response).await;
    assert_eq!(body["status"], "OK");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    init_test_env();
    let app = create_app_router(empty_state());

    let response = app
        .oneshot(
            Request::get("/health")
                .header("x-request-id", "trace-0042")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "trace-0042");
}

#[tokio::test]
async fn test_missing_identity_is_unauthorized() {
    init_test_env();
    let app = create_app_router(empty_state());

    let response = app
        .oneshot(Request::get("/api/v1/sessions").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_error_envelope_carries_request_id() {
    init_test_env();
    let app = create_app_router(empty_state());

    let response = app
        .oneshot(
            Request::get("/api/v1/sessions")
                .header("x-request-id", "trace-0042")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()["x-request-id"], "trace-0042");
    let body = body_json(response).await;
    assert_eq!(body["requestId"], "trace-0042");
}

#[tokio::test]
async fn test_malformed_identity_is_unauthorized() {
    init_test_env();
    let app = create_app_router(empty_state());

    let response = app
        .oneshot(
            Request::get("/api/v1/me")
                .header(USER_ID_HEADER, "not-a-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_path_id_is_bad_request() {
    init_test_env();
    let admin = user(Uuid::new_v4(), true);
    let state = state_with(MockDatabase::new(DatabaseBackend::Postgres).append_query_results([vec![admin.clone()]]));
    let app = create_app_router(state);

    let response = app
        .oneshot(
            Request::get("/api/v1/sessions/latest")
                .header(USER_ID_HEADER, admin.id.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_unbalanced_level_is_unprocessable() {
    init_test_env();
    let admin = user(Uuid::new_v4(), true);
    let state = state_with(MockDatabase::new(DatabaseBackend::Postgres).append_query_results([vec![admin.clone()]]));
    let app = create_app_router(state);

    let payload = serde_json::json!({
        "role": "Developer",
        "step": 1,
        "execution_weight": 30,
        "soft_weight": 30,
        "strategy_weight": 30,
        "standard": 3.0
    });
    let response = app
        .oneshot(
            Request::post("/api/v1/levels")
                .header(USER_ID_HEADER, admin.id.to_string())
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}
