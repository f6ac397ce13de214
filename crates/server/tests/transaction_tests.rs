//! # Transaction Tests
//!
//! Multi-row writes must commit together or not at all.

mod common;

use chrono::Utc;
use common::{admin_context, count_row, init_test_env, session, state_with, transaction_log_text};
use entity::{sea_orm_active_enums::SessionStatus, teams};
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};
use server::{
    dto::{sessions::CreateSessionRequest, teams::CreateTeamRequest},
    handlers::{sessions, teams as team_handlers},
};
use uuid::Uuid;

fn exec_ok(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

fn team(company_id: Uuid, leader_id: Uuid) -> teams::Model {
    let now = Utc::now();
    teams::Model {
        id: Uuid::new_v4(),
        name: "Platform".to_string(),
        leader_id,
        company_id,
        is_project: false,
        is_cluster_leader: false,
        created_at: now,
        updated_at: now,
    }
}

fn team_request(leader_id: Uuid) -> CreateTeamRequest {
    CreateTeamRequest {
        name: "Platform".to_string(),
        leader_id,
        is_project: false,
        is_cluster_leader: false,
        cluster_id: None,
        member_ids: Vec::new(),
    }
}

#[tokio::test]
async fn test_create_team_commits_team_and_leader_membership() {
    init_test_env();
    let (ctx, company_id) = admin_context();
    let leader_id = Uuid::new_v4();

    let state = state_with(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![count_row(1)]])
            .append_query_results([vec![team(company_id, leader_id)]])
            .append_exec_results([exec_ok(1)]),
    );

    let response = team_handlers::create_team_handler(&state, ctx, team_request(leader_id))
        .await
        .expect("team should be created");
    let data = response.0.data().cloned().expect("success envelope");
    assert_eq!(data.member_ids, Some(vec![leader_id]));

    let log = transaction_log_text(&state.db);
    let begin = log.find("BEGIN").expect("writes run in a transaction");
    let insert = log.find("user_teams").expect("leader membership inserted");
    let commit = log.find("COMMIT").expect("transaction committed");
    assert!(begin < insert && insert < commit);
}

#[tokio::test]
async fn test_create_team_failed_membership_is_not_committed() {
    init_test_env();
    let (ctx, company_id) = admin_context();
    let leader_id = Uuid::new_v4();

    let state = state_with(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![count_row(1)]])
            .append_query_results([vec![team(company_id, leader_id)]])
            .append_exec_errors([DbErr::Custom("user_teams_pkey violated".to_string())]),
    );

    let err = team_handlers::create_team_handler(&state, ctx, team_request(leader_id))
        .await
        .err()
        .expect("membership insert fails");

    assert_eq!(err.status().as_u16(), 500);
    assert_eq!(err.code(), "DATABASE_ERROR");
    assert!(!transaction_log_text(&state.db).contains("COMMIT"));
}

#[tokio::test]
async fn test_create_session_commits_session_and_clusters() {
    init_test_env();
    let (ctx, company_id) = admin_context();
    let cluster_id = Uuid::new_v4();

    let state = state_with(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![count_row(1)], vec![count_row(0)]])
            .append_query_results([vec![session(company_id, SessionStatus::Preparing)]])
            .append_exec_results([exec_ok(0), exec_ok(1), exec_ok(0)]),
    );
    let req = CreateSessionRequest {
        name:        "Spring review".to_string(),
        cluster_ids: vec![cluster_id],
        rule_ids:    Vec::new(),
    };

    let response = sessions::create_session_handler(&state, ctx, req)
        .await
        .expect("session should be created");
    let data = response.0.data().cloned().expect("success envelope");
    assert_eq!(data.status, SessionStatus::Preparing);
    assert_eq!(data.cluster_ids, Some(vec![cluster_id]));

    let log = transaction_log_text(&state.db);
    let begin = log.find("BEGIN").expect("writes run in a transaction");
    let insert = log.find("session_clusters").expect("cluster links written");
    let commit = log.find("COMMIT").expect("transaction committed");
    assert!(begin < insert && insert < commit);
}

#[tokio::test]
async fn test_create_session_failed_association_is_not_committed() {
    init_test_env();
    let (ctx, company_id) = admin_context();

    let state = state_with(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![count_row(1)], vec![count_row(0)]])
            .append_query_results([vec![session(company_id, SessionStatus::Preparing)]])
            .append_exec_results([exec_ok(0)])
            .append_exec_errors([DbErr::Custom("session_clusters_pkey violated".to_string())]),
    );
    let req = CreateSessionRequest {
        name:        "Spring review".to_string(),
        cluster_ids: vec![Uuid::new_v4()],
        rule_ids:    Vec::new(),
    };

    let err = sessions::create_session_handler(&state, ctx, req)
        .await
        .err()
        .expect("association insert fails");

    assert_eq!(err.status().as_u16(), 500);
    assert_eq!(err.code(), "DATABASE_ERROR");
    assert!(!transaction_log_text(&state.db).contains("COMMIT"));
}

#[tokio::test]
async fn test_failed_rule_step_rolls_back_the_whole_rule() {
    init_test_env();
    let (ctx, company_id) = admin_context();
    let session = session(company_id, SessionStatus::Preparing);

    let state = state_with(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![session.clone()], vec![session.clone()]])
            .append_query_results([vec![count_row(0)]])
            .append_exec_results([exec_ok(6)])
            .append_exec_errors([DbErr::Custom("generate_rule3b_feedbacks failed".to_string())]),
    );

    let err = sessions::generate_rule_handler(&state, ctx, session.id, 3)
        .await
        .err()
        .expect("second step of rule 3 fails");
    assert_eq!(err.code(), "DATABASE_ERROR");

    let log = transaction_log_text(&state.db);
    let begin = log.find("BEGIN").expect("rule steps share a transaction");
    let first = log.find("generate_rule3_feedbacks").expect("first step called");
    let second = log.find("generate_rule3b_feedbacks").expect("second step called");
    assert!(begin < first && first < second);
    assert!(!log.contains("COMMIT"));
}
