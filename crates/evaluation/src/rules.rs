//! # Rule-Driven Feedback Generation
//!
//! Each numbered rule maps to a database procedure that inserts feedback
//! requests for a session. Rule 3 runs two procedures in sequence.
//!
//! A rule is applied at most once per session. The guard is a pre-check on
//! the `rule_number` of existing rows; concurrent calls are not coordinated.

use error::{AppError, Result};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::{
    session::{ensure_preparing, load_session, SessionLifecycle},
    store::FeedbackStore,
};

/// Rule numbers with a matching procedure.
pub const KNOWN_RULES: [i32; 6] = [1, 2, 3, 4, 5, 6];

/// A validated rule number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RuleNumber(i32);

impl RuleNumber {
    #[inline]
    pub fn get(self) -> i32 { self.0 }

    /// Procedures to invoke, in order.
    pub fn procedures(self) -> Vec<Procedure> {
        match self.0 {
            3 => vec![Procedure::GenerateRule(self), Procedure::GenerateRule3b],
            _ => vec![Procedure::GenerateRule(self)],
        }
    }
}

impl TryFrom<i32> for RuleNumber {
    type Error = AppError;

    fn try_from(value: i32) -> Result<Self> {
        if KNOWN_RULES.contains(&value) {
            Ok(Self(value))
        }
        else {
            Err(AppError::validation(format!(
                "Unknown rule number {}; expected one of {:?}",
                value, KNOWN_RULES
            )))
        }
    }
}

impl std::fmt::Display for RuleNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

/// A database procedure taking a session id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Procedure {
    GenerateRule(RuleNumber),
    /// Second half of rule 3
    GenerateRule3b,
    RemoveDuplicateFeedbacks,
}

impl Procedure {
    pub fn name(&self) -> String {
        match self {
            Procedure::GenerateRule(rule) => format!("generate_rule{}_feedbacks", rule),
            Procedure::GenerateRule3b => "generate_rule3b_feedbacks".to_string(),
            Procedure::RemoveDuplicateFeedbacks => "remove_duplicate_feedbacks".to_string(),
        }
    }
}

impl std::fmt::Display for Procedure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(&self.name()) }
}

/// Result of a successful rule run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleOutcome {
    pub session_id:     Uuid,
    pub rule_number:    RuleNumber,
    pub procedures:     Vec<String>,
    /// Feedback rows of the session after generation
    pub feedback_count: u64,
}

/// Apply `rule` to a session.
///
/// # Errors
///
/// - `NotFound` when the session does not exist
/// - `Conflict` when the session is not preparing, or the rule was already applied
/// - `Database` when a procedure fails; nothing the rule wrote is kept, so it can be retried
pub async fn generate_rule<S>(store: &S, session_id: Uuid, rule: RuleNumber) -> Result<RuleOutcome>
where
    S: FeedbackStore + ?Sized,
{
    let session = load_session(store, session_id).await?;
    ensure_preparing(&session)?;

    let existing = store.count_feedbacks_for_rule(session_id, rule.get()).await?;
    if existing > 0 {
        return Err(AppError::conflict(format!(
            "Rule {} already applied to session '{}' ({} feedback requests)",
            rule, session.name, existing
        )));
    }

    let steps = rule.procedures();
    store.run_procedures(&steps, session_id).await?;
    let procedures = steps.iter().map(Procedure::name).collect();

    let feedback_count = store.count_feedbacks(session_id).await?;
    info!(
        session_id = %session_id,
        rule = %rule,
        feedback_count,
        "Rule applied"
    );

    Ok(RuleOutcome {
        session_id,
        rule_number: rule,
        procedures,
        feedback_count,
    })
}

/// Delete duplicate feedback requests of a session, keeping one per key.
///
/// Concluded sessions are left untouched.
pub async fn remove_duplicates<S>(store: &S, session_id: Uuid) -> Result<u64>
where
    S: FeedbackStore + ?Sized,
{
    let session = load_session(store, session_id).await?;
    if session.status.is_concluded() {
        return Err(AppError::conflict(format!(
            "Session '{}' is concluded; its feedback can no longer change",
            session.name
        )));
    }

    let removed = store.remove_duplicate_feedbacks(session_id).await?;
    info!(session_id = %session_id, removed, "Duplicate feedbacks removed");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_rules_only() {
        for number in KNOWN_RULES {
            assert!(RuleNumber::try_from(number).is_ok());
        }
        for number in [0, 7, 8, -1] {
            let err = RuleNumber::try_from(number).unwrap_err();
            assert_eq!(err.code(), "VALIDATION_ERROR");
        }
    }

    #[test]
    fn test_rule_three_runs_two_procedures() {
        let rule = RuleNumber::try_from(3).unwrap();
        let names = rule.procedures().iter().map(Procedure::name).collect::<Vec<_>>();
        assert_eq!(names, vec!["generate_rule3_feedbacks", "generate_rule3b_feedbacks"]);
    }

    #[test]
    fn test_procedure_names() {
        let rule = RuleNumber::try_from(6).unwrap();
        assert_eq!(rule.procedures(), vec![Procedure::GenerateRule(rule)]);
        assert_eq!(Procedure::GenerateRule(rule).to_string(), "generate_rule6_feedbacks");
        assert_eq!(Procedure::RemoveDuplicateFeedbacks.name(), "remove_duplicate_feedbacks");
    }
}
