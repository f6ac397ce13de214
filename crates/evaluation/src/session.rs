//! # Session Lifecycle
//!
//! `In preparazione` → `In corso` → `Conclusa`. There is no way back and no
//! cancellation. Clusters and rules can only change while preparing; answers
//! are only accepted while the session is in progress.

use chrono::{DateTime, Utc};
use entity::sessions::{self, SessionStatus};
use error::{AppError, Result};
use tracing::info;
use uuid::Uuid;

use crate::store::FeedbackStore;

/// Lifecycle queries on [`SessionStatus`].
pub trait SessionLifecycle {
    fn is_preparing(&self) -> bool;
    fn is_active(&self) -> bool;
    fn is_concluded(&self) -> bool;
    /// The only status reachable from this one.
    fn next(&self) -> Option<SessionStatus>;

    fn can_transition_to(&self, target: SessionStatus) -> bool { self.next() == Some(target) }
}

impl SessionLifecycle for SessionStatus {
    #[inline]
    fn is_preparing(&self) -> bool { *self == SessionStatus::Preparing }

    #[inline]
    fn is_active(&self) -> bool { *self == SessionStatus::Active }

    #[inline]
    fn is_concluded(&self) -> bool { *self == SessionStatus::Concluded }

    fn next(&self) -> Option<SessionStatus> {
        match self {
            SessionStatus::Preparing => Some(SessionStatus::Active),
            SessionStatus::Active => Some(SessionStatus::Concluded),
            SessionStatus::Concluded => None,
        }
    }
}

/// Fail unless the session is still being prepared.
pub fn ensure_preparing(session: &sessions::Model) -> Result<()> {
    if session.status.is_preparing() {
        Ok(())
    }
    else {
        Err(AppError::conflict(format!(
            "Session '{}' is '{}', expected '{}'",
            session.name,
            session.status,
            SessionStatus::Preparing
        )))
    }
}

/// Fail unless clusters and rules of the session may still change.
pub fn ensure_associations_editable(session: &sessions::Model) -> Result<()> {
    ensure_preparing(session)
        .map_err(|_| AppError::conflict("Clusters and rules are frozen once the session has started"))
}

/// Fail unless the session accepts answers.
pub fn ensure_accepting_responses(session: &sessions::Model) -> Result<()> {
    if session.status.is_active() {
        Ok(())
    }
    else {
        Err(AppError::conflict(format!(
            "Session '{}' is not accepting answers",
            session.name
        )))
    }
}

/// Move `session` to `target`, stamping the matching time bound when unset.
pub fn transition(session: &sessions::Model, target: SessionStatus, now: DateTime<Utc>) -> Result<sessions::Model> {
    if !session.status.can_transition_to(target) {
        return Err(AppError::conflict(format!(
            "Session '{}' cannot move from '{}' to '{}'",
            session.name, session.status, target
        )));
    }

    let mut updated = session.clone();
    updated.status = target;
    match target {
        SessionStatus::Active => {
            updated.start_time.get_or_insert(now);
        },
        SessionStatus::Concluded => {
            updated.end_time.get_or_insert(now);
        },
        SessionStatus::Preparing => {},
    }
    updated.updated_at = now;
    Ok(updated)
}

pub(crate) async fn load_session<S>(store: &S, session_id: Uuid) -> Result<sessions::Model>
where
    S: FeedbackStore + ?Sized,
{
    store
        .find_session(session_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Session {} not found", session_id)))
}

/// Start a prepared session. Rejected while the session has no feedback.
pub async fn start_session<S>(store: &S, session_id: Uuid) -> Result<sessions::Model>
where
    S: FeedbackStore + ?Sized,
{
    let session = load_session(store, session_id).await?;
    ensure_preparing(&session)?;

    let feedbacks = store.count_feedbacks(session_id).await?;
    if feedbacks == 0 {
        return Err(AppError::bad_request(
            "Cannot start a session without feedback requests; generate feedback first",
        ));
    }

    let updated = store
        .update_session(transition(&session, SessionStatus::Active, Utc::now())?)
        .await?;
    info!(session_id = %session_id, feedbacks, "Session started");
    Ok(updated)
}

/// Close a session in progress.
pub async fn conclude_session<S>(store: &S, session_id: Uuid) -> Result<sessions::Model>
where
    S: FeedbackStore + ?Sized,
{
    let session = load_session(store, session_id).await?;
    let updated = store
        .update_session(transition(&session, SessionStatus::Concluded, Utc::now())?)
        .await?;
    info!(session_id = %session_id, "Session concluded");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(status: SessionStatus) -> sessions::Model {
        let now = Utc::now();
        sessions::Model {
            id: Uuid::new_v4(),
            name: "Autumn review".to_string(),
            start_time: None,
            end_time: None,
            status,
            company_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_forward_only() {
        assert!(SessionStatus::Preparing.can_transition_to(SessionStatus::Active));
        assert!(SessionStatus::Active.can_transition_to(SessionStatus::Concluded));
        assert!(!SessionStatus::Active.can_transition_to(SessionStatus::Preparing));
        assert!(!SessionStatus::Preparing.can_transition_to(SessionStatus::Concluded));
        assert_eq!(SessionStatus::Concluded.next(), None);
    }

    #[test]
    fn test_transition_stamps_start_time() {
        let now = Utc::now();
        let started = transition(&session(SessionStatus::Preparing), SessionStatus::Active, now).unwrap();
        assert_eq!(started.status, SessionStatus::Active);
        assert_eq!(started.start_time, Some(now));
        assert_eq!(started.end_time, None);
    }

    #[test]
    fn test_transition_keeps_planned_end_time() {
        let planned = Utc::now();
        let mut active = session(SessionStatus::Active);
        active.end_time = Some(planned);
        let concluded = transition(&active, SessionStatus::Concluded, Utc::now()).unwrap();
        assert_eq!(concluded.end_time, Some(planned));
    }

    #[test]
    fn test_associations_frozen_after_start() {
        assert!(ensure_associations_editable(&session(SessionStatus::Preparing)).is_ok());
        let err = ensure_associations_editable(&session(SessionStatus::Active)).unwrap_err();
        assert_eq!(err.code(), "CONFLICT");
    }

    #[test]
    fn test_responses_only_while_active() {
        assert!(ensure_accepting_responses(&session(SessionStatus::Active)).is_ok());
        assert!(ensure_accepting_responses(&session(SessionStatus::Preparing)).is_err());
        assert!(ensure_accepting_responses(&session(SessionStatus::Concluded)).is_err());
    }
}
