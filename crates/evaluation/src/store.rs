//! Database seam for the session and rule operations.
//!
//! The server implements this trait on top of SeaORM; tests use an in-memory
//! fake.

use async_trait::async_trait;
use entity::sessions;
use error::Result;
use uuid::Uuid;

use crate::rules::Procedure;

#[async_trait]
pub trait FeedbackStore: Send + Sync {
    async fn find_session(&self, session_id: Uuid) -> Result<Option<sessions::Model>>;

    /// Number of feedback rows of the session.
    async fn count_feedbacks(&self, session_id: Uuid) -> Result<u64>;

    /// Number of feedback rows of the session produced by `rule_number`.
    async fn count_feedbacks_for_rule(&self, session_id: Uuid, rule_number: i32) -> Result<u64>;

    /// Invoke the feedback-generating procedures for the session, in order.
    ///
    /// The calls are all-or-nothing: when one fails, rows written by the
    /// earlier ones are rolled back.
    async fn run_procedures(&self, procedures: &[Procedure], session_id: Uuid) -> Result<()>;

    /// Invoke `remove_duplicate_feedbacks` and return the number of rows deleted.
    async fn remove_duplicate_feedbacks(&self, session_id: Uuid) -> Result<u64>;

    /// Persist the status and time bounds of `session`.
    async fn update_session(&self, session: sessions::Model) -> Result<sessions::Model>;
}
