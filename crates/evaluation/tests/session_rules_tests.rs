//! Rule generation and session lifecycle against an in-memory store.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::Utc;
use entity::{
    feedbacks,
    sessions::{self, SessionStatus},
};
use error::{AppError, Result};
use evaluation::{
    conclude_session,
    generate_rule,
    remove_duplicates,
    start_session,
    FeedbackStore,
    Procedure,
    RuleNumber,
};
use uuid::Uuid;

/// Users every generated rule row is attached to.
const SENDER: Uuid = Uuid::from_u128(1);
const RECEIVER: Uuid = Uuid::from_u128(2);
const QUESTION: Uuid = Uuid::from_u128(3);

#[derive(Default)]
struct State {
    sessions:  HashMap<Uuid, sessions::Model>,
    feedbacks: Vec<feedbacks::Model>,
    calls:     Vec<String>,
    failing:   Option<String>,
}

#[derive(Clone, Default)]
struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    fn with_session(status: SessionStatus) -> (Self, Uuid) {
        let store = Self::default();
        let now = Utc::now();
        let session = sessions::Model {
            id: Uuid::new_v4(),
            name: "Q4 review".to_string(),
            start_time: None,
            end_time: None,
            status,
            company_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        };
        let id = session.id;
        store.state.lock().unwrap().sessions.insert(id, session);
        (store, id)
    }

    fn add_feedback(&self, session_id: Uuid, rule_number: Option<i32>) {
        let now = Utc::now();
        self.state.lock().unwrap().feedbacks.push(feedbacks::Model {
            id: Uuid::new_v4(),
            sender_id: SENDER,
            receiver_id: RECEIVER,
            question_id: QUESTION,
            session_id,
            value: None,
            comment: None,
            rule_number,
            created_at: now,
            updated_at: now,
        });
    }

    fn fail_on(&self, procedure: &str) { self.state.lock().unwrap().failing = Some(procedure.to_string()); }

    fn clear_failure(&self) { self.state.lock().unwrap().failing = None; }

    fn feedback_count(&self, session_id: Uuid) -> usize {
        let state = self.state.lock().unwrap();
        state.feedbacks.iter().filter(|f| f.session_id == session_id).count()
    }

    fn calls(&self) -> Vec<String> { self.state.lock().unwrap().calls.clone() }

    fn status(&self, session_id: Uuid) -> SessionStatus { self.state.lock().unwrap().sessions[&session_id].status }
}

#[async_trait]
impl FeedbackStore for MemoryStore {
    async fn find_session(&self, session_id: Uuid) -> Result<Option<sessions::Model>> {
        Ok(self.state.lock().unwrap().sessions.get(&session_id).cloned())
    }

    async fn count_feedbacks(&self, session_id: Uuid) -> Result<u64> {
        let state = self.state.lock().unwrap();
        Ok(state.feedbacks.iter().filter(|f| f.session_id == session_id).count() as u64)
    }

    async fn count_feedbacks_for_rule(&self, session_id: Uuid, rule_number: i32) -> Result<u64> {
        let state = self.state.lock().unwrap();
        Ok(state
            .feedbacks
            .iter()
            .filter(|f| f.session_id == session_id && f.rule_number == Some(rule_number))
            .count() as u64)
    }

    async fn run_procedures(&self, procedures: &[Procedure], session_id: Uuid) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let rollback_to = state.feedbacks.len();
        for procedure in procedures {
            let name = procedure.name();
            state.calls.push(name.clone());
            if state.failing.as_deref() == Some(name.as_str()) {
                state.feedbacks.truncate(rollback_to);
                return Err(AppError::database(format!("{} failed", name)));
            }
            let rule_number = match procedure {
                Procedure::GenerateRule(rule) => Some(rule.get()),
                Procedure::GenerateRule3b => Some(3),
                Procedure::RemoveDuplicateFeedbacks => None,
            };
            let now = Utc::now();
            state.feedbacks.push(feedbacks::Model {
                id: Uuid::new_v4(),
                sender_id: SENDER,
                receiver_id: RECEIVER,
                question_id: QUESTION,
                session_id,
                value: None,
                comment: None,
                rule_number,
                created_at: now,
                updated_at: now,
            });
        }
        Ok(())
    }

    async fn remove_duplicate_feedbacks(&self, session_id: Uuid) -> Result<u64> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Procedure::RemoveDuplicateFeedbacks.name());
        let mut seen = std::collections::HashSet::new();
        let before = state.feedbacks.len();
        state.feedbacks.retain(|f| {
            f.session_id != session_id || seen.insert((f.sender_id, f.receiver_id, f.question_id))
        });
        Ok((before - state.feedbacks.len()) as u64)
    }

    async fn update_session(&self, session: sessions::Model) -> Result<sessions::Model> {
        self.state
            .lock()
            .unwrap()
            .sessions
            .insert(session.id, session.clone());
        Ok(session)
    }
}

fn rule(number: i32) -> RuleNumber { RuleNumber::try_from(number).unwrap() }

#[tokio::test]
async fn test_rule_applied_once() {
    let (store, session_id) = MemoryStore::with_session(SessionStatus::Preparing);

    let outcome = generate_rule(&store, session_id, rule(1)).await.unwrap();
    assert_eq!(outcome.procedures, vec!["generate_rule1_feedbacks"]);
    assert_eq!(outcome.feedback_count, 1);

    let err = generate_rule(&store, session_id, rule(1)).await.unwrap_err();
    assert_eq!(err.code(), "CONFLICT");
    assert!(err.message().contains("already applied"));
    assert_eq!(store.calls(), vec!["generate_rule1_feedbacks"]);
}

#[tokio::test]
async fn test_rule_three_calls_both_procedures_in_order() {
    let (store, session_id) = MemoryStore::with_session(SessionStatus::Preparing);

    let outcome = generate_rule(&store, session_id, rule(3)).await.unwrap();
    assert_eq!(store.calls(), vec!["generate_rule3_feedbacks", "generate_rule3b_feedbacks"]);
    assert_eq!(outcome.feedback_count, 2);
}

#[tokio::test]
async fn test_rule_requires_preparing_session() {
    let (store, session_id) = MemoryStore::with_session(SessionStatus::Active);

    let err = generate_rule(&store, session_id, rule(2)).await.unwrap_err();
    assert_eq!(err.code(), "CONFLICT");
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_rule_unknown_session() {
    let store = MemoryStore::default();

    let err = generate_rule(&store, Uuid::new_v4(), rule(2)).await.unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_procedure_failure_surfaces_verbatim() {
    let (store, session_id) = MemoryStore::with_session(SessionStatus::Preparing);
    store.fail_on("generate_rule3b_feedbacks");

    let err = generate_rule(&store, session_id, rule(3)).await.unwrap_err();
    assert_eq!(err.code(), "DATABASE_ERROR");
    assert_eq!(err.message(), "generate_rule3b_feedbacks failed");
}

#[tokio::test]
async fn test_failed_rule_leaves_nothing_and_can_be_retried() {
    let (store, session_id) = MemoryStore::with_session(SessionStatus::Preparing);
    store.fail_on("generate_rule3b_feedbacks");

    assert!(generate_rule(&store, session_id, rule(3)).await.is_err());
    assert_eq!(store.feedback_count(session_id), 0);

    store.clear_failure();
    let outcome = generate_rule(&store, session_id, rule(3)).await.unwrap();
    assert_eq!(outcome.procedures, vec!["generate_rule3_feedbacks", "generate_rule3b_feedbacks"]);
    assert_eq!(outcome.feedback_count, 2);
}

#[tokio::test]
async fn test_start_rejected_without_feedback() {
    let (store, session_id) = MemoryStore::with_session(SessionStatus::Preparing);

    let err = start_session(&store, session_id).await.unwrap_err();
    assert_eq!(err.code(), "BAD_REQUEST");
    assert_eq!(store.status(session_id), SessionStatus::Preparing);
}

#[tokio::test]
async fn test_full_lifecycle() {
    let (store, session_id) = MemoryStore::with_session(SessionStatus::Preparing);
    generate_rule(&store, session_id, rule(4)).await.unwrap();

    let started = start_session(&store, session_id).await.unwrap();
    assert_eq!(started.status, SessionStatus::Active);
    assert!(started.start_time.is_some());

    assert!(start_session(&store, session_id).await.is_err());

    let concluded = conclude_session(&store, session_id).await.unwrap();
    assert_eq!(concluded.status, SessionStatus::Concluded);
    assert!(concluded.end_time.is_some());
    assert!(conclude_session(&store, session_id).await.is_err());
}

#[tokio::test]
async fn test_conclude_requires_active() {
    let (store, session_id) = MemoryStore::with_session(SessionStatus::Preparing);

    let err = conclude_session(&store, session_id).await.unwrap_err();
    assert_eq!(err.code(), "CONFLICT");
}

#[tokio::test]
async fn test_remove_duplicates_returns_count() {
    let (store, session_id) = MemoryStore::with_session(SessionStatus::Preparing);
    store.add_feedback(session_id, Some(1));
    store.add_feedback(session_id, Some(2));
    store.add_feedback(session_id, Some(3));

    assert_eq!(remove_duplicates(&store, session_id).await.unwrap(), 2);
    assert_eq!(remove_duplicates(&store, session_id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_remove_duplicates_refused_once_concluded() {
    let (store, session_id) = MemoryStore::with_session(SessionStatus::Concluded);

    assert!(remove_duplicates(&store, session_id).await.is_err());
    assert!(store.calls().is_empty());
}
