//! # Result Handlers
//!
//! Per-receiver result pages and the session overview. Scores are computed on
//! read from the stored feedback; nothing is cached.

use std::collections::HashMap;

use entity::{
    feedbacks::{Column as FeedbackColumn, Entity as FeedbacksEntity},
    levels::{Column as LevelColumn, Entity as LevelsEntity},
    questions::{Column as QuestionColumn, Entity as QuestionsEntity},
    sea_orm_active_enums::SkillType,
    users::{Column as UserColumn, Entity as UsersEntity},
};
use error::{Context, Result};
use evaluation::{
    aggregate_receiver,
    aggregate_session,
    permissions::{Permission, ResultAction},
    LevelProfile,
    MentorIndex,
    RequestContext,
};
use permissions_macro::with_permission;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use super::{respond, sessions::load_session, users::load_user, ApiResult};
use crate::{
    dto::results::{ReceiverReportResponse, ReceiverSummaryResponse, SessionResultsResponse},
    middleware::permissions::require_self_or_admin,
    AppState,
};

async fn question_skills<C: ConnectionTrait>(db: &C, company_id: Uuid) -> Result<HashMap<Uuid, SkillType>> {
    Ok(QuestionsEntity::find()
        .filter(QuestionColumn::CompanyId.eq(company_id))
        .all(db)
        .await
        .context("Failed to load questions")?
        .into_iter()
        .map(|q| (q.id, q.skill_type))
        .collect())
}

/// Result page of one receiver
///
/// Administrators may read anyone's results; other users only their own.
#[with_permission(any = Permission::Results(ResultAction::ReadAll), Permission::Results(ResultAction::ReadOwn))]
pub async fn receiver_report_handler(
    state: &AppState,
    ctx: RequestContext,
    session_id: Uuid,
    receiver_id: Uuid,
) -> ApiResult<ReceiverReportResponse> {
    require_self_or_admin(&ctx, receiver_id)?;
    let company_id = ctx.company_id()?;
    load_session(&state.db, company_id, session_id).await?;
    let receiver = load_user(&state.db, company_id, receiver_id).await?;

    let feedbacks = FeedbacksEntity::find()
        .filter(FeedbackColumn::SessionId.eq(session_id))
        .filter(FeedbackColumn::ReceiverId.eq(receiver_id))
        .all(&state.db)
        .await
        .context("Failed to load feedbacks")?;
    let skills = question_skills(&state.db, company_id).await?;
    let mentors = MentorIndex::from_users([&receiver]);

    let level = match receiver.level_id {
        Some(level_id) => LevelsEntity::find_by_id(level_id).one(&state.db).await?,
        None => None,
    };
    let profile = level.as_ref().map(LevelProfile::from);

    let report = aggregate_receiver(receiver_id, &feedbacks, &skills, &mentors, profile.as_ref());
    respond(ReceiverReportResponse {
        session_id,
        receiver_name: receiver.full_name(),
        level_role: level.map(|l| l.role),
        gap_display: report.gap.and_then(|g| g.display_percent()),
        report,
    })
}

/// Overall and weighted scores of every receiver of a session
#[with_permission(Permission::Results(ResultAction::ReadAll))]
pub async fn session_results_handler(
    state: &AppState,
    ctx: RequestContext,
    session_id: Uuid,
) -> ApiResult<SessionResultsResponse> {
    let company_id = ctx.company_id()?;
    load_session(&state.db, company_id, session_id).await?;

    let feedbacks = FeedbacksEntity::find()
        .filter(FeedbackColumn::SessionId.eq(session_id))
        .all(&state.db)
        .await
        .context("Failed to load feedbacks")?;
    let skills = question_skills(&state.db, company_id).await?;
    let users = UsersEntity::find()
        .filter(UserColumn::CompanyId.eq(company_id))
        .all(&state.db)
        .await?;
    let levels: HashMap<Uuid, LevelProfile> = LevelsEntity::find()
        .filter(LevelColumn::CompanyId.eq(company_id))
        .all(&state.db)
        .await?
        .iter()
        .map(|level| (level.id, LevelProfile::from(level)))
        .collect();

    let mentors = MentorIndex::from_users(&users);
    let receiver_levels: HashMap<Uuid, LevelProfile> = users
        .iter()
        .filter_map(|user| {
            user.level_id
                .and_then(|id| levels.get(&id))
                .map(|profile| (user.id, *profile))
        })
        .collect();
    let names: HashMap<Uuid, String> = users.iter().map(|u| (u.id, u.full_name())).collect();

    let receivers = aggregate_session(&feedbacks, &skills, &mentors, &receiver_levels)
        .into_iter()
        .map(|summary| {
            ReceiverSummaryResponse {
                receiver_name: names.get(&summary.receiver_id).cloned(),
                gap_display: summary.gap.and_then(|g| g.display_percent()),
                summary,
            }
        })
        .collect();

    respond(SessionResultsResponse::new(session_id, receivers))
}
