//! # Level Handlers
//!
//! Weights are validated with the request body, before any query runs.

use chrono::Utc;
use entity::levels::{self, Column as LevelColumn, Entity as LevelsEntity};
use error::{Context, PaginatedResponse, Result};
use evaluation::{
    permissions::{DirectoryAction, Permission},
    RequestContext,
};
use permissions_macro::with_permission;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{paginate, respond, ApiResult};
use crate::{
    dto::{
        levels::{CreateLevelRequest, LevelResponse, UpdateLevelRequest},
        ListQuery,
    },
    utils::like_pattern,
    AppState,
};

pub(crate) async fn load_level<C: ConnectionTrait>(db: &C, company_id: Uuid, level_id: Uuid) -> Result<levels::Model> {
    LevelsEntity::find_by_id(level_id)
        .filter(LevelColumn::CompanyId.eq(company_id))
        .one(db)
        .await
        .context("Failed to load level")?
        .context(format!("Level {} not found", level_id))
}

#[with_permission(Permission::Directory(DirectoryAction::Manage))]
pub async fn create_level_handler(state: &AppState, ctx: RequestContext, req: CreateLevelRequest) -> ApiResult<LevelResponse> {
    req.validate()?;
    let company_id = ctx.company_id()?;

    let now = Utc::now();
    let level = levels::ActiveModel {
        id:               Set(Uuid::new_v4()),
        role:             Set(req.role.trim().to_string()),
        step:             Set(req.step),
        execution_weight: Set(req.execution_weight),
        soft_weight:      Set(req.soft_weight),
        strategy_weight:  Set(req.strategy_weight),
        standard:         Set(req.standard),
        company_id:       Set(company_id),
        created_at:       Set(now),
        updated_at:       Set(now),
    }
    .insert(&state.db)
    .await
    .context("Failed to create level")?;

    info!(request_id = %ctx.request_id, level_id = %level.id, "Level created");
    respond(level.into())
}

#[with_permission(Permission::Directory(DirectoryAction::Read))]
pub async fn get_level_handler(state: &AppState, ctx: RequestContext, level_id: Uuid) -> ApiResult<LevelResponse> {
    respond(load_level(&state.db, ctx.company_id()?, level_id).await?.into())
}

/// Levels ordered by role, then step
#[with_permission(Permission::Directory(DirectoryAction::Read))]
pub async fn list_levels_handler(
    state: &AppState,
    ctx: RequestContext,
    query: ListQuery,
) -> ApiResult<PaginatedResponse<LevelResponse>> {
    query.validate()?;
    let mut select = LevelsEntity::find().filter(LevelColumn::CompanyId.eq(ctx.company_id()?));
    if let Some(search) = query.search() {
        select = select.filter(LevelColumn::Role.like(like_pattern(search)));
    }
    let select = select
        .order_by_asc(LevelColumn::Role)
        .order_by_asc(LevelColumn::Step);
    respond(paginate(&state.db, select, &query, LevelResponse::from).await?)
}

#[with_permission(Permission::Directory(DirectoryAction::Manage))]
pub async fn update_level_handler(
    state: &AppState,
    ctx: RequestContext,
    level_id: Uuid,
    req: UpdateLevelRequest,
) -> ApiResult<LevelResponse> {
    req.validate()?;
    let level = load_level(&state.db, ctx.company_id()?, level_id).await?;
    let weights = req.weights();
    let mut active: levels::ActiveModel = level.into();

    if let Some(role) = req.role {
        active.role = Set(role.trim().to_string());
    }
    if let Some(step) = req.step {
        active.step = Set(step);
    }
    if let Some(weights) = weights {
        active.execution_weight = Set(weights.execution);
        active.soft_weight = Set(weights.soft);
        active.strategy_weight = Set(weights.strategy);
    }
    if let Some(standard) = req.standard {
        active.standard = Set(standard);
    }
    active.updated_at = Set(Utc::now());

    let updated = active
        .update(&state.db)
        .await
        .context("Failed to update level")?;

    info!(request_id = %ctx.request_id, level_id = %level_id, "Level updated");
    respond(updated.into())
}

/// Delete a level; users on it are left without a level
#[with_permission(Permission::Directory(DirectoryAction::Manage))]
pub async fn delete_level_handler(state: &AppState, ctx: RequestContext, level_id: Uuid) -> ApiResult<Uuid> {
    load_level(&state.db, ctx.company_id()?, level_id).await?;
    LevelsEntity::delete_by_id(level_id)
        .exec(&state.db)
        .await
        .context("Failed to delete level")?;

    info!(request_id = %ctx.request_id, level_id = %level_id, "Level deleted");
    respond(level_id)
}
