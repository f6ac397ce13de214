//! End-to-end aggregation of a small session batch.

use std::collections::HashMap;

use chrono::Utc;
use entity::{feedbacks, sea_orm_active_enums::UserStatus, users};
use evaluation::{
    aggregate_receiver,
    aggregate_session,
    detect_duplicates,
    gap::GapBand,
    sort_by_skill,
    LevelProfile,
    LevelWeights,
    MentorIndex,
    SkillType,
    DUPLICATE_POLICY,
};
use uuid::Uuid;

struct Batch {
    receiver:  Uuid,
    mentor:    Uuid,
    peers:     [Uuid; 2],
    soft:      Uuid,
    execution: Uuid,
    strategy:  Uuid,
    users:     Vec<users::Model>,
}

impl Batch {
    fn new() -> Self {
        let receiver = Uuid::new_v4();
        let mentor = Uuid::new_v4();
        let peers = [Uuid::new_v4(), Uuid::new_v4()];
        let users = [receiver, mentor, peers[0], peers[1]]
            .into_iter()
            .map(|id| user(id, (id == receiver).then_some(mentor)))
            .collect();
        Self {
            receiver,
            mentor,
            peers,
            soft: Uuid::new_v4(),
            execution: Uuid::new_v4(),
            strategy: Uuid::new_v4(),
            users,
        }
    }

    fn skills(&self) -> HashMap<Uuid, SkillType> {
        HashMap::from([
            (self.soft, SkillType::Soft),
            (self.execution, SkillType::Execution),
            (self.strategy, SkillType::Strategy),
        ])
    }
}

fn user(id: Uuid, mentor_id: Option<Uuid>) -> users::Model {
    let now = Utc::now();
    users::Model {
        id,
        name: "Test".to_string(),
        surname: "User".to_string(),
        email: format!("{}@example.com", id.simple()),
        company_id: None,
        level_id: None,
        mentor_id,
        is_admin: false,
        status: UserStatus::Active,
        created_at: now,
        updated_at: now,
    }
}

fn feedback(sender: Uuid, receiver: Uuid, question: Uuid, value: Option<i16>) -> feedbacks::Model {
    let now = Utc::now();
    feedbacks::Model {
        id: Uuid::new_v4(),
        sender_id: sender,
        receiver_id: receiver,
        question_id: question,
        session_id: Uuid::nil(),
        value,
        comment: Some("Clear communicator".to_string()),
        rule_number: Some(1),
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn test_receiver_report_against_level() {
    let b = Batch::new();
    // Strategy first to check the report is reordered
    let rows = vec![
        feedback(b.mentor, b.receiver, b.strategy, Some(4)),
        feedback(b.peers[0], b.receiver, b.soft, Some(3)),
        feedback(b.mentor, b.receiver, b.soft, Some(4)),
        feedback(b.peers[1], b.receiver, b.soft, Some(5)),
        feedback(b.peers[0], b.receiver, b.execution, Some(0)),
        feedback(b.peers[1], b.receiver, b.execution, Some(3)),
        feedback(b.receiver, b.receiver, b.soft, Some(5)),
    ];
    let mentors = MentorIndex::from_users(&b.users);
    let level = LevelProfile {
        weights:  LevelWeights::new(30, 30, 40),
        standard: 4.0,
    };

    let report = aggregate_receiver(b.receiver, &rows, &b.skills(), &mentors, Some(&level));

    let order = report.questions.iter().map(|q| q.skill_type).collect::<Vec<_>>();
    assert_eq!(order, vec![SkillType::Soft, SkillType::Execution, SkillType::Strategy]);

    let soft = &report.questions[0];
    assert_eq!(soft.overall_mean, Some(4.0));
    assert_eq!(soft.self_value, Some(5));
    assert_eq!(soft.mentor_value, Some(4));
    assert_eq!(soft.comment_count, 4);

    let execution = &report.questions[1];
    assert_eq!(execution.received_count, 2);
    assert_eq!(execution.rated_count, 1);
    assert_eq!(execution.overall_mean, Some(3.0));

    // (4.0 * 30 + 3.0 * 30 + 4.0 * 40) / 100
    let weighted = report.weighted_score.unwrap();
    assert!((weighted - 3.7).abs() < 1e-9);
    let gap = report.gap.unwrap();
    assert!((gap.value + 0.3).abs() < 1e-9);
    assert_eq!(gap.band, GapBand::Under);
    assert!(gap.percent.unwrap() < 0.0);
    assert_eq!(report.received_count, 7);
}

#[test]
fn test_session_summary_per_receiver() {
    let b = Batch::new();
    let rows = vec![
        feedback(b.peers[0], b.receiver, b.soft, Some(2)),
        feedback(b.receiver, b.peers[0], b.soft, Some(5)),
        feedback(b.peers[1], b.receiver, b.soft, None),
    ];
    let mentors = MentorIndex::from_users(&b.users);

    let summary = aggregate_session(&rows, &b.skills(), &mentors, &HashMap::new());
    assert_eq!(summary.len(), 2);
    assert_eq!(summary[0].receiver_id, b.receiver);
    assert_eq!(summary[0].received_count, 2);
    assert_eq!(summary[0].answered_count, 1);
    assert_eq!(summary[0].overall_mean, Some(2.0));
    assert!(summary[0].gap.is_none());
    assert_eq!(summary[1].receiver_id, b.peers[0]);
    assert_eq!(summary[1].overall_mean, Some(5.0));
}

#[test]
fn test_duplicates_then_sorted_view() {
    let b = Batch::new();
    let mut rows = vec![
        feedback(b.peers[0], b.receiver, b.strategy, None),
        feedback(b.peers[0], b.receiver, b.soft, None),
        feedback(b.peers[0], b.receiver, b.strategy, None),
        feedback(b.peers[0], b.receiver, b.execution, None),
    ];

    let report = detect_duplicates(&rows, DUPLICATE_POLICY);
    assert_eq!(report.flagged, vec![rows[0].id, rows[2].id]);
    assert_eq!(report.duplicate_feedbacks, 1);

    let skills = b.skills();
    sort_by_skill(&mut rows, |f| skills[&f.question_id]);
    let order = rows.iter().map(|f| skills[&f.question_id]).collect::<Vec<_>>();
    assert_eq!(
        order,
        vec![SkillType::Soft, SkillType::Execution, SkillType::Strategy, SkillType::Strategy]
    );
}
