//! # Question Handlers
//!
//! Question lists follow the canonical skill order (Soft, Execution, Strategy).

use chrono::Utc;
use entity::questions::{self, Column as QuestionColumn, Entity as QuestionsEntity};
use error::{Context, PaginatedResponse, Result};
use evaluation::{
    permissions::{DirectoryAction, Permission},
    sort_by_skill,
    RequestContext,
};
use permissions_macro::with_permission;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{respond, ApiResult};
use crate::{
    dto::{
        questions::{CreateQuestionRequest, QuestionFilter, QuestionResponse, UpdateQuestionRequest},
        ListQuery,
    },
    utils::like_pattern,
    AppState,
};

pub(crate) async fn load_question<C: ConnectionTrait>(
    db: &C,
    company_id: Uuid,
    question_id: Uuid,
) -> Result<questions::Model> {
    QuestionsEntity::find_by_id(question_id)
        .filter(QuestionColumn::CompanyId.eq(company_id))
        .one(db)
        .await
        .context("Failed to load question")?
        .context(format!("Question {} not found", question_id))
}

#[with_permission(Permission::Directory(DirectoryAction::Manage))]
pub async fn create_question_handler(
    state: &AppState,
    ctx: RequestContext,
    req: CreateQuestionRequest,
) -> ApiResult<QuestionResponse> {
    req.validate()?;
    let company_id = ctx.company_id()?;

    let now = Utc::now();
    let question = questions::ActiveModel {
        id:          Set(Uuid::new_v4()),
        description: Set(req.description.trim().to_string()),
        skill_type:  Set(req.skill_type),
        company_id:  Set(company_id),
        created_at:  Set(now),
        updated_at:  Set(now),
    }
    .insert(&state.db)
    .await
    .context("Failed to create question")?;

    info!(request_id = %ctx.request_id, question_id = %question.id, skill_type = %question.skill_type, "Question created");
    respond(question.into())
}

#[with_permission(Permission::Directory(DirectoryAction::Read))]
pub async fn get_question_handler(
    state: &AppState,
    ctx: RequestContext,
    question_id: Uuid,
) -> ApiResult<QuestionResponse> {
    respond(load_question(&state.db, ctx.company_id()?, question_id).await?.into())
}

/// Questions sorted by skill, then description
///
/// Sorting happens after the page is cut from the description order, so a
/// page is internally skill-ordered.
#[with_permission(Permission::Directory(DirectoryAction::Read))]
pub async fn list_questions_handler(
    state: &AppState,
    ctx: RequestContext,
    query: ListQuery,
    filter: QuestionFilter,
) -> ApiResult<PaginatedResponse<QuestionResponse>> {
    query.validate()?;
    let mut select = QuestionsEntity::find().filter(QuestionColumn::CompanyId.eq(ctx.company_id()?));
    if let Some(search) = query.search() {
        select = select.filter(QuestionColumn::Description.like(like_pattern(search)));
    }
    if let Some(skill_type) = filter.skill_type {
        select = select.filter(QuestionColumn::SkillType.eq(skill_type));
    }
    let select = select.order_by_asc(QuestionColumn::Description);

    let mut page = super::paginate(&state.db, select, &query, QuestionResponse::from).await?;
    sort_by_skill(&mut page.items, |q| q.skill_type);
    respond(page)
}

#[with_permission(Permission::Directory(DirectoryAction::Manage))]
pub async fn update_question_handler(
    state: &AppState,
    ctx: RequestContext,
    question_id: Uuid,
    req: UpdateQuestionRequest,
) -> ApiResult<QuestionResponse> {
    req.validate()?;
    let question = load_question(&state.db, ctx.company_id()?, question_id).await?;
    let mut active: questions::ActiveModel = question.into();

    if let Some(description) = req.description {
        active.description = Set(description.trim().to_string());
    }
    if let Some(skill_type) = req.skill_type {
        active.skill_type = Set(skill_type);
    }
    active.updated_at = Set(Utc::now());

    let updated = active
        .update(&state.db)
        .await
        .context("Failed to update question")?;

    info!(request_id = %ctx.request_id, question_id = %question_id, "Question updated");
    respond(updated.into())
}

/// Delete a question together with its feedback and initiatives
#[with_permission(Permission::Directory(DirectoryAction::Manage))]
pub async fn delete_question_handler(state: &AppState, ctx: RequestContext, question_id: Uuid) -> ApiResult<Uuid> {
    load_question(&state.db, ctx.company_id()?, question_id).await?;
    QuestionsEntity::delete_by_id(question_id)
        .exec(&state.db)
        .await
        .context("Failed to delete question")?;

    info!(request_id = %ctx.request_id, question_id = %question_id, "Question deleted");
    respond(question_id)
}
