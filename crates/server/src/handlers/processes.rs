//! # Process Handlers

use chrono::Utc;
use entity::processes::{self, Column as ProcessColumn, Entity as ProcessesEntity};
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

use super::{paginate, questions::load_question, respond, ApiResult};
use crate::{
    dto::{
        processes::{CreateProcessRequest, ProcessResponse, UpdateProcessRequest},
        ListQuery,
    },
    utils::like_pattern,
    AppState,
};

async fn load_process<C: ConnectionTrait>(db: &C, company_id: Uuid, process_id: Uuid) -> Result<processes::Model> {
    ProcessesEntity::find_by_id(process_id)
        .filter(ProcessColumn::CompanyId.eq(company_id))
        .one(db)
        .await
        .context("Failed to load process")?
        .context(format!("Process {} not found", process_id))
}

#[with_permission(Permission::Directory(DirectoryAction::Manage))]
pub async fn create_process_handler(
    state: &AppState,
    ctx: RequestContext,
    req: CreateProcessRequest,
) -> ApiResult<ProcessResponse> {
    req.validate()?;
    let company_id = ctx.company_id()?;
    if let Some(question_id) = req.linked_question_id {
        load_question(&state.db, company_id, question_id).await?;
    }

    let now = Utc::now();
    let process = processes::ActiveModel {
        id:                 Set(Uuid::new_v4()),
        name:               Set(req.name.trim().to_string()),
        linked_question_id: Set(req.linked_question_id),
        company_id:         Set(company_id),
        created_at:         Set(now),
        updated_at:         Set(now),
    }
    .insert(&state.db)
    .await
    .context("Failed to create process")?;

    info!(request_id = %ctx.request_id, process_id = %process.id, "Process created");
    respond(process.into())
}

#[with_permission(Permission::Directory(DirectoryAction::Read))]
pub async fn get_process_handler(state: &AppState, ctx: RequestContext, process_id: Uuid) -> ApiResult<ProcessResponse> {
    respond(load_process(&state.db, ctx.company_id()?, process_id).await?.into())
}

#[with_permission(Permission::Directory(DirectoryAction::Read))]
pub async fn list_processes_handler(
    state: &AppState,
    ctx: RequestContext,
    query: ListQuery,
) -> ApiResult<PaginatedResponse<ProcessResponse>> {
    query.validate()?;
    let mut select = ProcessesEntity::find().filter(ProcessColumn::CompanyId.eq(ctx.company_id()?));
    if let Some(search) = query.search() {
        select = select.filter(ProcessColumn::Name.like(like_pattern(search)));
    }
    let select = select.order_by_asc(ProcessColumn::Name);
    respond(paginate(&state.db, select, &query, ProcessResponse::from).await?)
}

#[with_permission(Permission::Directory(DirectoryAction::Manage))]
pub async fn update_process_handler(
    state: &AppState,
    ctx: RequestContext,
    process_id: Uuid,
    req: UpdateProcessRequest,
) -> ApiResult<ProcessResponse> {
    req.validate()?;
    let company_id = ctx.company_id()?;
    let process = load_process(&state.db, company_id, process_id).await?;
    let mut active: processes::ActiveModel = process.into();

    if let Some(name) = req.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(linked_question_id) = req.linked_question_id {
        if let Some(question_id) = linked_question_id {
            load_question(&state.db, company_id, question_id).await?;
        }
        active.linked_question_id = Set(linked_question_id);
    }
    active.updated_at = Set(Utc::now());

    let updated = active
        .update(&state.db)
        .await
        .context("Failed to update process")?;

    info!(request_id = %ctx.request_id, process_id = %process_id, "Process updated");
    respond(updated.into())
}

#[with_permission(Permission::Directory(DirectoryAction::Manage))]
pub async fn delete_process_handler(state: &AppState, ctx: RequestContext, process_id: Uuid) -> ApiResult<Uuid> {
    load_process(&state.db, ctx.company_id()?, process_id).await?;
    ProcessesEntity::delete_by_id(process_id)
        .exec(&state.db)
        .await
        .context("Failed to delete process")?;

    info!(request_id = %ctx.request_id, process_id = %process_id, "Process deleted");
    respond(process_id)
}
