//! # Common Test Utilities
//!
//! Shared fixtures for the server integration tests: a mock database backed
//! application state, request contexts and entity models.

#![allow(dead_code)]

use std::{collections::BTreeMap, sync::Once};

use chrono::Utc;
use entity::{
    feedbacks,
    sea_orm_active_enums::{SessionStatus, UserStatus},
    sessions,
    users,
};
use evaluation::{CurrentUser, RequestContext};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, Value};
use server::AppState;
use uuid::Uuid;

/// Initialize test logging (run once per test session)
static INIT: Once = Once::new();

/// Initialize test environment including structured logging
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Application state over an empty mock database.
pub fn empty_state() -> AppState { AppState::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection()) }

/// Application state over a prepared mock database.
pub fn state_with(db: MockDatabase) -> AppState { AppState::new(db.into_connection()) }

/// Number of statements the handler sent to the database.
pub fn statement_count(state: &AppState) -> usize { state.db.clone().into_transaction_log().len() }

/// Everything sent to the database so far, as debug text.
pub fn transaction_log_text(db: &DatabaseConnection) -> String { format!("{:?}", db.clone().into_transaction_log()) }

/// Mock row answering a `COUNT(*)` query.
pub fn count_row(count: i64) -> BTreeMap<&'static str, Value> { BTreeMap::from([("num_items", Value::BigInt(Some(count)))]) }

pub fn user(company_id: Uuid, is_admin: bool) -> users::Model {
    let now = Utc::now();
    users::Model {
        id: Uuid::new_v4(),
        name: "Giulia".to_string(),
        surname: "Bianchi".to_string(),
        email: format!("{}@example.com", Uuid::new_v4().simple()),
        company_id: Some(company_id),
        level_id: None,
        mentor_id: None,
        is_admin,
        status: UserStatus::Active,
        created_at: now,
        updated_at: now,
    }
}

pub fn context_for(user: &users::Model) -> RequestContext { RequestContext::for_user(CurrentUser::from(user)) }

/// Context of an administrator of a fresh company.
pub fn admin_context() -> (RequestContext, Uuid) {
    let company_id = Uuid::new_v4();
    (context_for(&user(company_id, true)), company_id)
}

/// Context of a regular user of a fresh company.
pub fn member_context() -> (RequestContext, Uuid) {
    let company_id = Uuid::new_v4();
    (context_for(&user(company_id, false)), company_id)
}

pub fn anonymous_context() -> RequestContext { RequestContext::new(None, logging::RequestId::new()) }

pub fn session(company_id: Uuid, status: SessionStatus) -> sessions::Model {
    let now = Utc::now();
    sessions::Model {
        id: Uuid::new_v4(),
        name: "Spring review".to_string(),
        start_time: None,
        end_time: None,
        status,
        company_id,
        created_at: now,
        updated_at: now,
    }
}

pub fn feedback(session_id: Uuid, sender_id: Uuid, receiver_id: Uuid, value: Option<i16>) -> feedbacks::Model {
    let now = Utc::now();
    feedbacks::Model {
        id: Uuid::new_v4(),
        sender_id,
        receiver_id,
        question_id: Uuid::new_v4(),
        session_id,
        value,
        comment: None,
        rule_number: Some(1),
        created_at: now,
        updated_at: now,
    }
}
