//! # Feedback Handlers
//!
//! Administrators browse every request of a session; senders see and answer
//! their own answer sheet. Answers are pushed to live subscribers.

use std::collections::HashMap;

use chrono::Utc;
use entity::{
    feedbacks::{self, Column as FeedbackColumn, Entity as FeedbacksEntity},
    questions::{Column as QuestionColumn, Entity as QuestionsEntity},
    users::{Column as UserColumn, Entity as UsersEntity},
};
use error::{AppError, Context, PaginatedResponse, Result};
use evaluation::{
    permissions::{FeedbackAction, Permission},
    session::ensure_accepting_responses,
    sort_by_skill,
    Answer,
    RequestContext,
};
use permissions_macro::with_permission;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{paginate, respond, sessions::load_session, ApiResult};
use crate::{
    dto::{
        feedbacks::{
            AssignedFeedbackResponse,
            EventStreamQuery,
            FeedbackFilter,
            FeedbackResponse,
            RespondFeedbackRequest,
        },
        ListQuery,
    },
    events::{EventFilter, FeedbackEvent},
    AppState,
};

/// Every feedback request of a session
#[with_permission(Permission::Feedbacks(FeedbackAction::ReadAll))]
pub async fn list_session_feedbacks_handler(
    state: &AppState,
    ctx: RequestContext,
    session_id: Uuid,
    query: ListQuery,
    filter: FeedbackFilter,
) -> ApiResult<PaginatedResponse<FeedbackResponse>> {
    query.validate()?;
    load_session(&state.db, ctx.company_id()?, session_id).await?;

    let mut select = FeedbacksEntity::find().filter(FeedbackColumn::SessionId.eq(session_id));
    if let Some(sender_id) = filter.sender_id {
        select = select.filter(FeedbackColumn::SenderId.eq(sender_id));
    }
    if let Some(receiver_id) = filter.receiver_id {
        select = select.filter(FeedbackColumn::ReceiverId.eq(receiver_id));
    }
    match filter.answered {
        Some(true) => select = select.filter(FeedbackColumn::Value.is_not_null()),
        Some(false) => select = select.filter(FeedbackColumn::Value.is_null()),
        None => {},
    }
    if let Some(rule_number) = filter.rule_number {
        select = select.filter(FeedbackColumn::RuleNumber.eq(rule_number));
    }

    let select = select
        .order_by_asc(FeedbackColumn::CreatedAt)
        .order_by_asc(FeedbackColumn::Id);
    respond(paginate(&state.db, select, &query, FeedbackResponse::from).await?)
}

/// The caller's own answer sheet for a session, in skill order
#[with_permission(Permission::Feedbacks(FeedbackAction::ReadOwn))]
pub async fn list_my_feedbacks_handler(
    state: &AppState,
    ctx: RequestContext,
    session_id: Uuid,
) -> ApiResult<Vec<AssignedFeedbackResponse>> {
    let sender_id = ctx.user()?.id;
    load_session(&state.db, ctx.company_id()?, session_id).await?;

    let rows = FeedbacksEntity::find()
        .filter(FeedbackColumn::SessionId.eq(session_id))
        .filter(FeedbackColumn::SenderId.eq(sender_id))
        .order_by_asc(FeedbackColumn::CreatedAt)
        .all(&state.db)
        .await
        .context("Failed to load feedbacks")?;

    let question_ids: Vec<Uuid> = rows.iter().map(|f| f.question_id).collect();
    let questions: HashMap<_, _> = QuestionsEntity::find()
        .filter(QuestionColumn::Id.is_in(question_ids))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|q| (q.id, q))
        .collect();

    let receiver_ids: Vec<Uuid> = rows.iter().map(|f| f.receiver_id).collect();
    let receivers: HashMap<_, _> = UsersEntity::find()
        .filter(UserColumn::Id.is_in(receiver_ids))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|u| (u.id, u.full_name()))
        .collect();

    let mut sheet = Vec::with_capacity(rows.len());
    for feedback in rows {
        let Some(question) = questions.get(&feedback.question_id)
        else {
            continue;
        };
        sheet.push(AssignedFeedbackResponse {
            id:                   feedback.id,
            receiver_id:          feedback.receiver_id,
            receiver_name:        receivers.get(&feedback.receiver_id).cloned(),
            question_id:          question.id,
            question_description: question.description.clone(),
            skill_type:           question.skill_type,
            answer:               Answer::from_value(feedback.value)?,
            comment:              feedback.comment,
            updated_at:           feedback.updated_at,
        });
    }
    sort_by_skill(&mut sheet, |f| f.skill_type);

    respond(sheet)
}

/// Answer a feedback request
///
/// Only the sender may answer, and only while the session is in progress.
/// The value is validated before any database access.
#[with_permission(Permission::Feedbacks(FeedbackAction::Respond))]
pub async fn respond_feedback_handler(
    state: &AppState,
    ctx: RequestContext,
    feedback_id: Uuid,
    req: RespondFeedbackRequest,
) -> ApiResult<FeedbackResponse> {
    req.validate()?;
    Answer::from_value(req.value)?;
    let sender_id = ctx.user()?.id;
    let company_id = ctx.company_id()?;

    let feedback = FeedbacksEntity::find_by_id(feedback_id)
        .one(&state.db)
        .await
        .context("Failed to load feedback")?
        .context(format!("Feedback {} not found", feedback_id))?;
    let session = load_session(&state.db, company_id, feedback.session_id)
        .await
        .map_err(|e| {
            match e {
                AppError::NotFound {
                    ..
                } => AppError::not_found(format!("Feedback {} not found", feedback_id)),
                other => other,
            }
        })?;
    if feedback.sender_id != sender_id {
        return Err(AppError::forbidden("Only the sender can answer this feedback"));
    }
    ensure_accepting_responses(&session)?;

    let mut active: feedbacks::ActiveModel = feedback.into();
    active.value = Set(req.value);
    active.comment = Set(req.comment.filter(|c| !c.trim().is_empty()));
    active.updated_at = Set(Utc::now());
    let updated = active
        .update(&state.db)
        .await
        .context("Failed to save answer")?;

    info!(
        request_id = %ctx.request_id,
        feedback_id = %feedback_id,
        session_id = %updated.session_id,
        "Feedback answered"
    );
    state.events.publish(FeedbackEvent::answered(&updated));
    respond(updated.into())
}

/// Resolve the event filter of a live feedback subscription
///
/// Regular users only receive events about their own answers.
#[with_permission(any = Permission::Feedbacks(FeedbackAction::ReadAll), Permission::Feedbacks(FeedbackAction::ReadOwn))]
pub async fn feedback_events_handler(
    state: &AppState,
    ctx: RequestContext,
    session_id: Uuid,
    query: EventStreamQuery,
) -> Result<EventFilter> {
    load_session(&state.db, ctx.company_id()?, session_id).await?;

    let sender_id = if ctx.is_admin() {
        query.sender_id
    }
    else {
        let own = ctx.user()?.id;
        if query.sender_id.is_some_and(|id| id != own) {
            return Err(AppError::forbidden("You can only follow your own feedback"));
        }
        Some(own)
    };

    info!(
        request_id = %ctx.request_id,
        session_id = %session_id,
        subscribers = state.events.subscriber_count() + 1,
        "Feedback event stream opened"
    );
    Ok(EventFilter {
        session_id,
        sender_id,
    })
}
