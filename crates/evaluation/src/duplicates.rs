//! # Duplicate Detection
//!
//! Feedback requests are keyed by `(sender, receiver, question)`. Rules run
//! independently, so the same key can be generated more than once per session.

use std::collections::{HashMap, HashSet};

use entity::feedbacks;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Composite key a feedback request must be unique on within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DuplicateKey {
    pub sender_id:   Uuid,
    pub receiver_id: Uuid,
    pub question_id: Uuid,
}

impl From<&feedbacks::Model> for DuplicateKey {
    fn from(feedback: &feedbacks::Model) -> Self {
        Self {
            sender_id:   feedback.sender_id,
            receiver_id: feedback.receiver_id,
            question_id: feedback.question_id,
        }
    }
}

/// Which records of a duplicate group are flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Every record of the group, the first occurrence included.
    FlagAll,
    /// Every record except the first occurrence.
    KeepFirst,
}

/// Policy used by the service. Operators review the whole group before removal.
pub const DUPLICATE_POLICY: DuplicatePolicy = DuplicatePolicy::FlagAll;

/// Records sharing one key, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub key:          DuplicateKey,
    pub feedback_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateReport {
    /// Flagged record ids, in input order
    pub flagged:             Vec<Uuid>,
    /// Occurrences beyond the first in every group
    pub duplicate_feedbacks: usize,
    pub groups:              Vec<DuplicateGroup>,
}

impl DuplicateReport {
    #[inline]
    pub fn is_empty(&self) -> bool { self.groups.is_empty() }
}

/// Group `records` by [`DuplicateKey`] and flag every group holding more than one record.
///
/// The first occurrence of a group is the earliest record in `records`.
pub fn detect_duplicates(records: &[feedbacks::Model], policy: DuplicatePolicy) -> DuplicateReport {
    let mut positions: HashMap<DuplicateKey, usize> = HashMap::with_capacity(records.len());
    let mut groups: Vec<DuplicateGroup> = Vec::new();

    for record in records {
        let key = DuplicateKey::from(record);
        match positions.get(&key) {
            Some(&index) => groups[index].feedback_ids.push(record.id),
            None => {
                positions.insert(key, groups.len());
                groups.push(DuplicateGroup {
                    key,
                    feedback_ids: vec![record.id],
                });
            },
        }
    }

    groups.retain(|group| group.feedback_ids.len() > 1);

    let skip = match policy {
        DuplicatePolicy::FlagAll => 0,
        DuplicatePolicy::KeepFirst => 1,
    };
    let duplicate_feedbacks = groups.iter().map(|g| g.feedback_ids.len() - 1).sum();
    let flagged_in_group = groups
        .iter()
        .flat_map(|g| g.feedback_ids.iter().skip(skip).copied())
        .collect::<HashSet<_>>();
    let flagged = records
        .iter()
        .map(|r| r.id)
        .filter(|id| flagged_in_group.contains(id))
        .collect();

    DuplicateReport {
        flagged,
        duplicate_feedbacks,
        groups,
    }
}
