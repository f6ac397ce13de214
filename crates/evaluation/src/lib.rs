//! # Prism Evaluation Core
//!
//! Pure feedback logic shared by the HTTP handlers: skill ordering, answer
//! values, duplicate detection, per-receiver aggregation, gap against the
//! level standard, rule-driven feedback generation and the session lifecycle.
//!
//! Database access goes through the [`store::FeedbackStore`] trait so the
//! logic can be exercised without a database.

pub mod aggregate;
pub mod context;
pub mod duplicates;
pub mod gap;
pub mod level;
pub mod permissions;
pub mod rules;
pub mod session;
pub mod skill;
pub mod store;
pub mod value;

pub use aggregate::{aggregate_receiver, aggregate_session, MentorIndex, RaterKind, ReceiverReport, ReceiverSummary};
pub use context::{CurrentUser, RequestContext};
pub use duplicates::{detect_duplicates, DuplicatePolicy, DuplicateReport, DUPLICATE_POLICY};
pub use gap::{Gap, GapBand, GAP_OVER_THRESHOLD, GAP_UNDER_THRESHOLD};
pub use level::{LevelProfile, LevelWeights};
pub use rules::{generate_rule, remove_duplicates, Procedure, RuleNumber, RuleOutcome};
pub use session::{conclude_session, start_session, SessionLifecycle};
pub use skill::{compare_skill, sort_by_skill, SkillType, SKILL_ORDER};
pub use store::FeedbackStore;
pub use value::Answer;
