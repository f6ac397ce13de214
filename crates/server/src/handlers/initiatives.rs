//! # Initiative Handlers
//!
//! Users record improvement initiatives for themselves; administrators can
//! manage anyone's.

use chrono::Utc;
use entity::initiatives::{self, Column as InitiativeColumn, Entity as InitiativesEntity};
use error::{AppError, Context, PaginatedResponse, Result};
use evaluation::{
    permissions::{InitiativeAction, Permission},
    RequestContext,
};
use permissions_macro::with_permission;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{paginate, questions::load_question, respond, sessions::load_session, users::load_user, ApiResult};
use crate::{
    dto::{
        initiatives::{CreateInitiativeRequest, InitiativeFilter, InitiativeResponse, UpdateInitiativeRequest},
        ListQuery,
    },
    middleware::permissions::require_self_or_admin,
    utils::like_pattern,
    AppState,
};

/// Load an initiative whose session belongs to `company_id`.
async fn load_initiative<C: ConnectionTrait>(
    db: &C,
    company_id: Uuid,
    initiative_id: Uuid,
) -> Result<initiatives::Model> {
    let not_found = || AppError::not_found(format!("Initiative {} not found", initiative_id));
    let initiative = InitiativesEntity::find_by_id(initiative_id)
        .one(db)
        .await
        .context("Failed to load initiative")?
        .ok_or_else(not_found)?;
    load_session(db, company_id, initiative.session_id)
        .await
        .map_err(|e| {
            match e {
                AppError::NotFound {
                    ..
                } => not_found(),
                other => other,
            }
        })?;
    Ok(initiative)
}

/// Record an initiative on a question of a session
#[with_permission(any = Permission::Initiatives(InitiativeAction::Manage), Permission::Initiatives(InitiativeAction::CreateOwn))]
pub async fn create_initiative_handler(
    state: &AppState,
    ctx: RequestContext,
    session_id: Uuid,
    req: CreateInitiativeRequest,
) -> ApiResult<InitiativeResponse> {
    req.validate()?;
    let user_id = req.user_id.unwrap_or(ctx.user()?.id);
    require_self_or_admin(&ctx, user_id)?;

    let company_id = ctx.company_id()?;
    load_session(&state.db, company_id, session_id).await?;
    load_question(&state.db, company_id, req.question_id).await?;
    load_user(&state.db, company_id, user_id).await?;

    let now = Utc::now();
    let initiative = initiatives::ActiveModel {
        id:              Set(Uuid::new_v4()),
        description:     Set(req.description.trim().to_string()),
        session_id:      Set(session_id),
        question_id:     Set(req.question_id),
        user_id:         Set(user_id),
        initiative_type: Set(req.initiative_type.trim().to_string()),
        created_at:      Set(now),
        updated_at:      Set(now),
    }
    .insert(&state.db)
    .await
    .context("Failed to create initiative")?;

    info!(
        request_id = %ctx.request_id,
        initiative_id = %initiative.id,
        session_id = %session_id,
        user_id = %user_id,
        "Initiative created"
    );
    respond(initiative.into())
}

#[with_permission(any = Permission::Initiatives(InitiativeAction::ReadAll), Permission::Initiatives(InitiativeAction::ReadOwn))]
pub async fn get_initiative_handler(
    state: &AppState,
    ctx: RequestContext,
    initiative_id: Uuid,
) -> ApiResult<InitiativeResponse> {
    let initiative = load_initiative(&state.db, ctx.company_id()?, initiative_id).await?;
    require_self_or_admin(&ctx, initiative.user_id)?;
    respond(initiative.into())
}

/// Initiatives of a session; regular users only see their own
#[with_permission(any = Permission::Initiatives(InitiativeAction::ReadAll), Permission::Initiatives(InitiativeAction::ReadOwn))]
pub async fn list_initiatives_handler(
    state: &AppState,
    ctx: RequestContext,
    session_id: Uuid,
    query: ListQuery,
    filter: InitiativeFilter,
) -> ApiResult<PaginatedResponse<InitiativeResponse>> {
    query.validate()?;
    load_session(&state.db, ctx.company_id()?, session_id).await?;

    let user_id = if ctx.is_admin() {
        filter.user_id
    }
    else {
        let own = ctx.user()?.id;
        if filter.user_id.is_some_and(|id| id != own) {
            return Err(AppError::forbidden("Only administrators can access other users' data"));
        }
        Some(own)
    };

    let mut select = InitiativesEntity::find().filter(InitiativeColumn::SessionId.eq(session_id));
    if let Some(user_id) = user_id {
        select = select.filter(InitiativeColumn::UserId.eq(user_id));
    }
    if let Some(question_id) = filter.question_id {
        select = select.filter(InitiativeColumn::QuestionId.eq(question_id));
    }
    if let Some(search) = query.search() {
        select = select.filter(InitiativeColumn::Description.like(like_pattern(search)));
    }
    let select = select.order_by_desc(InitiativeColumn::CreatedAt);
    respond(paginate(&state.db, select, &query, InitiativeResponse::from).await?)
}

#[with_permission(any = Permission::Initiatives(InitiativeAction::Manage), Permission::Initiatives(InitiativeAction::CreateOwn))]
pub async fn update_initiative_handler(
    state: &AppState,
    ctx: RequestContext,
    initiative_id: Uuid,
    req: UpdateInitiativeRequest,
) -> ApiResult<InitiativeResponse> {
    req.validate()?;
    let initiative = load_initiative(&state.db, ctx.company_id()?, initiative_id).await?;
    require_self_or_admin(&ctx, initiative.user_id)?;

    let mut active: initiatives::ActiveModel = initiative.into();
    if let Some(description) = req.description {
        active.description = Set(description.trim().to_string());
    }
    if let Some(initiative_type) = req.initiative_type {
        active.initiative_type = Set(initiative_type.trim().to_string());
    }
    active.updated_at = Set(Utc::now());

    let updated = active
        .update(&state.db)
        .await
        .context("Failed to update initiative")?;

    info!(request_id = %ctx.request_id, initiative_id = %initiative_id, "Initiative updated");
    respond(updated.into())
}

#[with_permission(any = Permission::Initiatives(InitiativeAction::Manage), Permission::Initiatives(InitiativeAction::CreateOwn))]
pub async fn delete_initiative_handler(state: &AppState, ctx: RequestContext, initiative_id: Uuid) -> ApiResult<Uuid> {
    let initiative = load_initiative(&state.db, ctx.company_id()?, initiative_id).await?;
    require_self_or_admin(&ctx, initiative.user_id)?;

    InitiativesEntity::delete_by_id(initiative_id)
        .exec(&state.db)
        .await
        .context("Failed to delete initiative")?;

    info!(request_id = %ctx.request_id, initiative_id = %initiative_id, "Initiative deleted");
    respond(initiative_id)
}
