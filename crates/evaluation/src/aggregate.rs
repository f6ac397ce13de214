//! # Feedback Aggregation
//!
//! Turns the feedback a receiver got in a session into per-question,
//! per-skill and per-rater figures, then weighs the skill means with the
//! receiver's level and compares the result to the level standard.
//!
//! Means only use ratings from 1 to 5 given by mentors and peers. Self
//! assessments are reported separately and never enter the overall mean.
//! Every row, "no basis to answer" and unanswered included, counts as received.

use std::collections::HashMap;

use entity::{feedbacks, users};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    gap::Gap,
    level::LevelProfile,
    skill::{sort_by_skill, SkillType, SKILL_ORDER},
    value::{Mean, NO_BASIS_TO_ANSWER},
};

/// Who gave a feedback, relative to its receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaterKind {
    SelfAssessment,
    Mentor,
    Peer,
}

/// Map from user id to that user's mentor, built once per batch.
#[derive(Debug, Clone, Default)]
pub struct MentorIndex {
    mentors: HashMap<Uuid, Uuid>,
}

impl MentorIndex {
    pub fn from_users<'a, I>(users: I) -> Self
    where
        I: IntoIterator<Item = &'a users::Model>,
    {
        let mentors = users
            .into_iter()
            .filter_map(|user| user.mentor_id.map(|mentor| (user.id, mentor)))
            .collect();
        Self {
            mentors,
        }
    }

    pub fn insert(&mut self, user_id: Uuid, mentor_id: Uuid) { self.mentors.insert(user_id, mentor_id); }

    #[inline]
    pub fn mentor_of(&self, user_id: Uuid) -> Option<Uuid> { self.mentors.get(&user_id).copied() }

    pub fn classify(&self, sender_id: Uuid, receiver_id: Uuid) -> RaterKind {
        if sender_id == receiver_id {
            RaterKind::SelfAssessment
        }
        else if self.mentor_of(receiver_id) == Some(sender_id) {
            RaterKind::Mentor
        }
        else {
            RaterKind::Peer
        }
    }
}

/// Figures for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionAggregate {
    pub question_id:    Uuid,
    pub skill_type:     SkillType,
    /// Mean of mentor and peer ratings
    pub overall_mean:   Option<f64>,
    pub mentor_value:   Option<i16>,
    pub self_value:     Option<i16>,
    pub comment_count:  usize,
    pub received_count: usize,
    pub answered_count: usize,
    pub rated_count:    u32,
    pub no_basis_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillAggregate {
    pub skill_type:  SkillType,
    pub mean:        Option<f64>,
    pub rated_count: u32,
    /// Level weight in percent, when the receiver has a level
    pub weight:      Option<i16>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RaterMeans {
    pub self_mean:   Option<f64>,
    pub mentor_mean: Option<f64>,
    pub peer_mean:   Option<f64>,
}

/// Everything shown on a receiver's result page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiverReport {
    pub receiver_id:    Uuid,
    /// In canonical skill order
    pub questions:      Vec<QuestionAggregate>,
    /// Always three entries, in canonical skill order
    pub skills:         Vec<SkillAggregate>,
    pub raters:         RaterMeans,
    pub overall_mean:   Option<f64>,
    pub weighted_score: Option<f64>,
    pub standard:       Option<f64>,
    pub gap:            Option<Gap>,
    pub received_count: usize,
    pub answered_count: usize,
    pub no_basis_count: usize,
    pub comment_count:  usize,
}

/// One row of the session overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiverSummary {
    pub receiver_id:    Uuid,
    pub overall_mean:   Option<f64>,
    pub weighted_score: Option<f64>,
    pub gap:            Option<Gap>,
    pub received_count: usize,
    pub answered_count: usize,
}

impl From<&ReceiverReport> for ReceiverSummary {
    fn from(report: &ReceiverReport) -> Self {
        Self {
            receiver_id:    report.receiver_id,
            overall_mean:   report.overall_mean,
            weighted_score: report.weighted_score,
            gap:            report.gap,
            received_count: report.received_count,
            answered_count: report.answered_count,
        }
    }
}

#[derive(Debug)]
struct QuestionAccumulator {
    question_id:    Uuid,
    skill_type:     SkillType,
    mean:           Mean,
    mentor_value:   Option<i16>,
    self_value:     Option<i16>,
    comment_count:  usize,
    received_count: usize,
    answered_count: usize,
    no_basis_count: usize,
}

impl QuestionAccumulator {
    fn new(question_id: Uuid, skill_type: SkillType) -> Self {
        Self {
            question_id,
            skill_type,
            mean: Mean::default(),
            mentor_value: None,
            self_value: None,
            comment_count: 0,
            received_count: 0,
            answered_count: 0,
            no_basis_count: 0,
        }
    }

    fn finish(self) -> QuestionAggregate {
        QuestionAggregate {
            question_id:    self.question_id,
            skill_type:     self.skill_type,
            overall_mean:   self.mean.value(),
            mentor_value:   self.mentor_value,
            self_value:     self.self_value,
            comment_count:  self.comment_count,
            received_count: self.received_count,
            answered_count: self.answered_count,
            rated_count:    self.mean.count(),
            no_basis_count: self.no_basis_count,
        }
    }
}

/// Weighted score: Σ(skill mean × weight) / Σ(weights of skills that have a mean).
pub fn weighted_score(skills: &[SkillAggregate]) -> Option<f64> {
    let (total, weights) = skills
        .iter()
        .filter_map(|skill| Some((skill.mean?, f64::from(skill.weight?))))
        .fold((0.0, 0.0), |(total, weights), (mean, weight)| {
            (total + mean * weight, weights + weight)
        });
    (weights > 0.0).then(|| total / weights)
}

/// Aggregate the feedback `receiver_id` got.
///
/// Rows addressed to other receivers are ignored, as are rows whose question
/// is missing from `question_skills`.
pub fn aggregate_receiver<'a, I>(
    receiver_id: Uuid,
    feedbacks: I,
    question_skills: &HashMap<Uuid, SkillType>,
    mentors: &MentorIndex,
    level: Option<&LevelProfile>,
) -> ReceiverReport
where
    I: IntoIterator<Item = &'a feedbacks::Model>,
{
    let mut questions: Vec<QuestionAccumulator> = Vec::new();
    let mut positions: HashMap<Uuid, usize> = HashMap::new();
    let mut skill_means: HashMap<SkillType, Mean> = HashMap::new();
    let (mut self_mean, mut mentor_mean, mut peer_mean, mut overall) =
        (Mean::default(), Mean::default(), Mean::default(), Mean::default());

    for feedback in feedbacks.into_iter().filter(|f| f.receiver_id == receiver_id) {
        let Some(&skill_type) = question_skills.get(&feedback.question_id)
        else {
            tracing::warn!(
                target: "aggregate",
                feedback_id = %feedback.id,
                question_id = %feedback.question_id,
                "Skipping feedback for unknown question"
            );
            continue;
        };

        let index = *positions.entry(feedback.question_id).or_insert_with(|| {
            questions.push(QuestionAccumulator::new(feedback.question_id, skill_type));
            questions.len() - 1
        });
        let question = &mut questions[index];

        question.received_count += 1;
        if feedback.value.is_some() {
            question.answered_count += 1;
        }
        if feedback.value == Some(NO_BASIS_TO_ANSWER) {
            question.no_basis_count += 1;
        }
        if feedback.has_comment() {
            question.comment_count += 1;
        }

        match mentors.classify(feedback.sender_id, receiver_id) {
            RaterKind::SelfAssessment => {
                self_mean.push(feedback.value);
                if question.self_value.is_none() {
                    question.self_value = feedback.value;
                }
            },
            kind => {
                if kind == RaterKind::Mentor {
                    mentor_mean.push(feedback.value);
                    if question.mentor_value.is_none() {
                        question.mentor_value = feedback.value;
                    }
                }
                else {
                    peer_mean.push(feedback.value);
                }
                question.mean.push(feedback.value);
                overall.push(feedback.value);
                skill_means.entry(skill_type).or_default().push(feedback.value);
            },
        }
    }

    let skills = SKILL_ORDER
        .iter()
        .map(|&skill_type| {
            let mean = skill_means.get(&skill_type).copied().unwrap_or_default();
            SkillAggregate {
                skill_type,
                mean: mean.value(),
                rated_count: mean.count(),
                weight: level.map(|l| l.weights.weight(skill_type)),
            }
        })
        .collect::<Vec<_>>();

    let weighted = weighted_score(&skills);
    let gap = match (weighted, level) {
        (Some(score), Some(level)) => Some(Gap::compute(score, level.standard)),
        _ => None,
    };

    let mut questions = questions.into_iter().map(QuestionAccumulator::finish).collect::<Vec<_>>();
    sort_by_skill(&mut questions, |q| q.skill_type);

    ReceiverReport {
        receiver_id,
        received_count: questions.iter().map(|q| q.received_count).sum(),
        answered_count: questions.iter().map(|q| q.answered_count).sum(),
        no_basis_count: questions.iter().map(|q| q.no_basis_count).sum(),
        comment_count: questions.iter().map(|q| q.comment_count).sum(),
        questions,
        skills,
        raters: RaterMeans {
            self_mean:   self_mean.value(),
            mentor_mean: mentor_mean.value(),
            peer_mean:   peer_mean.value(),
        },
        overall_mean: overall.value(),
        weighted_score: weighted,
        standard: level.map(|l| l.standard),
        gap,
    }
}

/// Aggregate every receiver of a session batch.
///
/// Receivers appear in order of their first feedback; `levels` maps a
/// receiver id to that receiver's level.
pub fn aggregate_session(
    feedbacks: &[feedbacks::Model],
    question_skills: &HashMap<Uuid, SkillType>,
    mentors: &MentorIndex,
    levels: &HashMap<Uuid, LevelProfile>,
) -> Vec<ReceiverSummary> {
    let mut order: Vec<Uuid> = Vec::new();
    let mut by_receiver: HashMap<Uuid, Vec<&feedbacks::Model>> = HashMap::new();
    for feedback in feedbacks {
        by_receiver
            .entry(feedback.receiver_id)
            .or_insert_with(|| {
                order.push(feedback.receiver_id);
                Vec::new()
            })
            .push(feedback);
    }

    logging::measure_duration!("aggregate", "session", {
        order
            .into_iter()
            .map(|receiver_id| {
                let rows = by_receiver.remove(&receiver_id).unwrap_or_default();
                let report = aggregate_receiver(
                    receiver_id,
                    rows,
                    question_skills,
                    mentors,
                    levels.get(&receiver_id),
                );
                ReceiverSummary::from(&report)
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::level::LevelWeights;

    struct Fixture {
        receiver: Uuid,
        mentor:   Uuid,
        question: Uuid,
        skills:   HashMap<Uuid, SkillType>,
        mentors:  MentorIndex,
    }

    impl Fixture {
        fn new() -> Self {
            let receiver = Uuid::new_v4();
            let mentor = Uuid::new_v4();
            let question = Uuid::new_v4();
            let mut mentors = MentorIndex::default();
            mentors.insert(receiver, mentor);
            Self {
                receiver,
                mentor,
                question,
                skills: HashMap::from([(question, SkillType::Soft)]),
                mentors,
            }
        }

        fn feedback(&self, sender: Uuid, value: Option<i16>) -> feedbacks::Model {
            let now = Utc::now();
            feedbacks::Model {
                id: Uuid::new_v4(),
                sender_id: sender,
                receiver_id: self.receiver,
                question_id: self.question,
                session_id: Uuid::nil(),
                value,
                comment: None,
                rule_number: None,
                created_at: now,
                updated_at: now,
            }
        }
    }

    #[test]
    fn test_classification() {
        let f = Fixture::new();
        assert_eq!(f.mentors.classify(f.receiver, f.receiver), RaterKind::SelfAssessment);
        assert_eq!(f.mentors.classify(f.mentor, f.receiver), RaterKind::Mentor);
        assert_eq!(f.mentors.classify(Uuid::new_v4(), f.receiver), RaterKind::Peer);
        // Mentorship is not symmetric
        assert_eq!(f.mentors.classify(f.receiver, f.mentor), RaterKind::Peer);
    }

    #[test]
    fn test_mean_of_mentor_and_peers_excludes_self() {
        let f = Fixture::new();
        let rows = vec![
            f.feedback(f.mentor, Some(4)),
            f.feedback(Uuid::new_v4(), Some(3)),
            f.feedback(Uuid::new_v4(), Some(5)),
            f.feedback(f.receiver, Some(1)),
        ];

        let report = aggregate_receiver(f.receiver, &rows, &f.skills, &f.mentors, None);
        let question = &report.questions[0];
        assert_eq!(question.overall_mean, Some(4.0));
        assert_eq!(question.mentor_value, Some(4));
        assert_eq!(question.self_value, Some(1));
        assert_eq!(report.raters.self_mean, Some(1.0));
        assert_eq!(report.raters.peer_mean, Some(4.0));
        assert_eq!(report.overall_mean, Some(4.0));
    }

    #[test]
    fn test_no_basis_counted_as_received_only() {
        let f = Fixture::new();
        let rows = vec![
            f.feedback(Uuid::new_v4(), Some(0)),
            f.feedback(Uuid::new_v4(), Some(2)),
            f.feedback(Uuid::new_v4(), None),
        ];

        let report = aggregate_receiver(f.receiver, &rows, &f.skills, &f.mentors, None);
        let question = &report.questions[0];
        assert_eq!(question.overall_mean, Some(2.0));
        assert_eq!(question.rated_count, 1);
        assert_eq!(question.received_count, 3);
        assert_eq!(question.answered_count, 2);
        assert_eq!(question.no_basis_count, 1);
    }

    #[test]
    fn test_weighted_score_skips_skills_without_mean() {
        let skills = vec![
            SkillAggregate {
                skill_type:  SkillType::Soft,
                mean:        Some(4.0),
                rated_count: 2,
                weight:      Some(20),
            },
            SkillAggregate {
                skill_type:  SkillType::Execution,
                mean:        Some(3.0),
                rated_count: 2,
                weight:      Some(60),
            },
            SkillAggregate {
                skill_type:  SkillType::Strategy,
                mean:        None,
                rated_count: 0,
                weight:      Some(20),
            },
        ];
        let score = weighted_score(&skills).unwrap();
        assert!((score - 3.25).abs() < 1e-9);
    }

    #[test]
    fn test_gap_needs_level() {
        let f = Fixture::new();
        let rows = vec![f.feedback(f.mentor, Some(3))];
        let profile = LevelProfile {
            weights:  LevelWeights::new(40, 30, 30),
            standard: 4.0,
        };

        let without = aggregate_receiver(f.receiver, &rows, &f.skills, &f.mentors, None);
        assert!(without.gap.is_none());
        assert!(without.weighted_score.is_none());

        let with = aggregate_receiver(f.receiver, &rows, &f.skills, &f.mentors, Some(&profile));
        assert_eq!(with.weighted_score, Some(3.0));
        assert_eq!(with.gap.map(|g| g.value), Some(-1.0));
    }

    #[test]
    fn test_other_receivers_ignored() {
        let f = Fixture::new();
        let mut stray = f.feedback(Uuid::new_v4(), Some(1));
        stray.receiver_id = Uuid::new_v4();
        let rows = vec![f.feedback(Uuid::new_v4(), Some(5)), stray];

        let report = aggregate_receiver(f.receiver, &rows, &f.skills, &f.mentors, None);
        assert_eq!(report.received_count, 1);
        assert_eq!(report.overall_mean, Some(5.0));
    }
}
