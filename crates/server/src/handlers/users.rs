//! # User Handlers
//!
//! HTTP request handlers for user CRUD and process assignment.

use chrono::Utc;
use entity::{
    clusters::{Column as ClusterColumn, Entity as ClustersEntity},
    processes::{Column as ProcessColumn, Entity as ProcessesEntity},
    sea_orm_active_enums::UserStatus,
    teams::{Column as TeamColumn, Entity as TeamsEntity},
    user_processes::{self, Column as UserProcessColumn, Entity as UserProcessesEntity},
    users::{self, Column as UserColumn, Entity as UsersEntity},
};
use error::{AppError, Context, PaginatedResponse, Result};
use evaluation::{
    permissions::{DirectoryAction, Permission},
    RequestContext,
};
use permissions_macro::with_permission;
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    Condition,
    ConnectionTrait,
    EntityTrait,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
    Set,
    TransactionTrait,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{levels::load_level, paginate, respond, ApiResult};
use crate::{
    dto::{
        processes::ProcessResponse,
        users::{CreateUserRequest, UpdateUserRequest, UserFilter, UserResponse},
        ListQuery,
        ReplaceIdsRequest,
    },
    utils::like_pattern,
    AppState,
};

/// Load a user of `company_id`, hiding users of other companies.
pub(crate) async fn load_user<C: ConnectionTrait>(db: &C, company_id: Uuid, user_id: Uuid) -> Result<users::Model> {
    UsersEntity::find_by_id(user_id)
        .filter(UserColumn::CompanyId.eq(company_id))
        .one(db)
        .await
        .context("Failed to load user")?
        .context(format!("User {} not found", user_id))
}

/// Check that every id belongs to a user of `company_id`.
pub(crate) async fn ensure_users_exist<C: ConnectionTrait>(db: &C, company_id: Uuid, user_ids: &[Uuid]) -> Result<()> {
    if user_ids.is_empty() {
        return Ok(());
    }
    let found = UsersEntity::find()
        .filter(UserColumn::CompanyId.eq(company_id))
        .filter(UserColumn::Id.is_in(user_ids.iter().copied()))
        .count(db)
        .await?;
    let mut unique = user_ids.to_vec();
    unique.sort_unstable();
    unique.dedup();
    if found != unique.len() as u64 {
        return Err(AppError::not_found("One or more users not found"));
    }
    Ok(())
}

fn ensure_not_own_mentor(user_id: Uuid, mentor_id: Uuid) -> Result<()> {
    if user_id == mentor_id {
        return Err(AppError::validation("A user cannot be their own mentor"));
    }
    Ok(())
}

/// A mentor must be a user of the same company; others are reported as not found.
async fn load_mentor<C: ConnectionTrait>(db: &C, company_id: Uuid, mentor_id: Uuid) -> Result<users::Model> {
    load_user(db, company_id, mentor_id).await.map_err(|e| {
        match e {
            AppError::NotFound {
                ..
            } => AppError::not_found(format!("Mentor {} not found", mentor_id)),
            other => other,
        }
    })
}

async fn ensure_email_available<C: ConnectionTrait>(db: &C, email: &str, except: Option<Uuid>) -> Result<()> {
    let mut query = UsersEntity::find().filter(UserColumn::Email.eq(email));
    if let Some(id) = except {
        query = query.filter(UserColumn::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(AppError::conflict(format!("A user with email {} already exists", email)));
    }
    Ok(())
}

/// Create a user in the caller's company
#[with_permission(Permission::Directory(DirectoryAction::Manage))]
pub async fn create_user_handler(state: &AppState, ctx: RequestContext, req: CreateUserRequest) -> ApiResult<UserResponse> {
    req.validate()?;
    let company_id = ctx.company_id()?;
    let email = req.email.trim().to_lowercase();

    ensure_email_available(&state.db, &email, None).await?;
    if let Some(level_id) = req.level_id {
        load_level(&state.db, company_id, level_id).await?;
    }
    if let Some(mentor_id) = req.mentor_id {
        load_mentor(&state.db, company_id, mentor_id).await?;
    }

    let now = Utc::now();
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(req.name.trim().to_string()),
        surname: Set(req.surname.trim().to_string()),
        email: Set(email),
        company_id: Set(Some(company_id)),
        level_id: Set(req.level_id),
        mentor_id: Set(req.mentor_id),
        is_admin: Set(req.is_admin),
        status: Set(UserStatus::Active),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await
    .context("Failed to create user")?;

    info!(request_id = %ctx.request_id, user_id = %user.id, "User created");
    respond(user.into())
}

/// The caller's own profile
pub async fn get_me_handler(state: &AppState, ctx: RequestContext) -> ApiResult<UserResponse> {
    let user_id = ctx.user()?.id;
    let user = UsersEntity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .context("User not found")?;
    respond(user.into())
}

#[with_permission(Permission::Directory(DirectoryAction::Read))]
pub async fn get_user_handler(state: &AppState, ctx: RequestContext, user_id: Uuid) -> ApiResult<UserResponse> {
    let user = load_user(&state.db, ctx.company_id()?, user_id).await?;
    respond(user.into())
}

/// List users of the caller's company, searchable by name, surname and email
#[with_permission(Permission::Directory(DirectoryAction::Read))]
pub async fn list_users_handler(
    state: &AppState,
    ctx: RequestContext,
    query: ListQuery,
    filter: UserFilter,
) -> ApiResult<PaginatedResponse<UserResponse>> {
    query.validate()?;
    let mut select = UsersEntity::find().filter(UserColumn::CompanyId.eq(ctx.company_id()?));

    if let Some(search) = query.search() {
        let pattern = like_pattern(search);
        select = select.filter(
            Condition::any()
                .add(UserColumn::Name.like(&pattern))
                .add(UserColumn::Surname.like(&pattern))
                .add(UserColumn::Email.like(&pattern)),
        );
    }
    if let Some(status) = filter.status {
        select = select.filter(UserColumn::Status.eq(status));
    }
    if let Some(level_id) = filter.level_id {
        select = select.filter(UserColumn::LevelId.eq(level_id));
    }
    if let Some(mentor_id) = filter.mentor_id {
        select = select.filter(UserColumn::MentorId.eq(mentor_id));
    }

    let select = select
        .order_by_asc(UserColumn::Surname)
        .order_by_asc(UserColumn::Name);
    respond(paginate(&state.db, select, &query, UserResponse::from).await?)
}

#[with_permission(Permission::Directory(DirectoryAction::Manage))]
pub async fn update_user_handler(
    state: &AppState,
    ctx: RequestContext,
    user_id: Uuid,
    req: UpdateUserRequest,
) -> ApiResult<UserResponse> {
    req.validate()?;
    if let Some(Some(mentor_id)) = req.mentor_id {
        ensure_not_own_mentor(user_id, mentor_id)?;
    }
    let company_id = ctx.company_id()?;
    let user = load_user(&state.db, company_id, user_id).await?;
    let mut active: users::ActiveModel = user.into();

    if let Some(name) = req.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(surname) = req.surname {
        active.surname = Set(surname.trim().to_string());
    }
    if let Some(email) = req.email {
        let email = email.trim().to_lowercase();
        ensure_email_available(&state.db, &email, Some(user_id)).await?;
        active.email = Set(email);
    }
    if let Some(level_id) = req.level_id {
        if let Some(level_id) = level_id {
            load_level(&state.db, company_id, level_id).await?;
        }
        active.level_id = Set(level_id);
    }
    if let Some(mentor_id) = req.mentor_id {
        if let Some(mentor_id) = mentor_id {
            load_mentor(&state.db, company_id, mentor_id).await?;
        }
        active.mentor_id = Set(mentor_id);
    }
    if let Some(is_admin) = req.is_admin {
        active.is_admin = Set(is_admin);
    }
    if let Some(status) = req.status {
        active.status = Set(status);
    }
    active.updated_at = Set(Utc::now());

    let updated = active
        .update(&state.db)
        .await
        .context("Failed to update user")?;

    info!(request_id = %ctx.request_id, user_id = %user_id, "User updated");
    respond(updated.into())
}

/// Delete a user; team and cluster leaders must be replaced first
#[with_permission(Permission::Directory(DirectoryAction::Manage))]
pub async fn delete_user_handler(state: &AppState, ctx: RequestContext, user_id: Uuid) -> ApiResult<Uuid> {
    let company_id = ctx.company_id()?;
    let user = load_user(&state.db, company_id, user_id).await?;
    if ctx.user()?.id == user_id {
        return Err(AppError::conflict("You cannot delete your own account"));
    }

    let led_teams = TeamsEntity::find()
        .filter(TeamColumn::LeaderId.eq(user_id))
        .count(&state.db)
        .await?;
    let led_clusters = ClustersEntity::find()
        .filter(ClusterColumn::LeaderId.eq(user_id))
        .count(&state.db)
        .await?;
    if led_teams + led_clusters > 0 {
        return Err(AppError::conflict(format!(
            "{} leads {} team(s) and {} cluster(s); assign a new leader first",
            user.full_name(),
            led_teams,
            led_clusters
        )));
    }

    UsersEntity::delete_by_id(user_id)
        .exec(&state.db)
        .await
        .context("Failed to delete user")?;

    info!(request_id = %ctx.request_id, user_id = %user_id, "User deleted");
    respond(user_id)
}

/// Processes a user takes part in
#[with_permission(Permission::Directory(DirectoryAction::Read))]
pub async fn list_user_processes_handler(
    state: &AppState,
    ctx: RequestContext,
    user_id: Uuid,
) -> ApiResult<Vec<ProcessResponse>> {
    let company_id = ctx.company_id()?;
    load_user(&state.db, company_id, user_id).await?;

    let process_ids: Vec<Uuid> = UserProcessesEntity::find()
        .filter(UserProcessColumn::UserId.eq(user_id))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|link| link.process_id)
        .collect();

    let processes = ProcessesEntity::find()
        .filter(ProcessColumn::Id.is_in(process_ids))
        .order_by_asc(ProcessColumn::Name)
        .all(&state.db)
        .await?;

    respond(processes.into_iter().map(ProcessResponse::from).collect())
}

/// Replace the processes a user takes part in
#[with_permission(Permission::Directory(DirectoryAction::Manage))]
pub async fn replace_user_processes_handler(
    state: &AppState,
    ctx: RequestContext,
    user_id: Uuid,
    req: ReplaceIdsRequest,
) -> ApiResult<Vec<Uuid>> {
    req.validate()?;
    let company_id = ctx.company_id()?;
    load_user(&state.db, company_id, user_id).await?;

    let mut process_ids = req.ids;
    process_ids.sort_unstable();
    process_ids.dedup();

    let found = ProcessesEntity::find()
        .filter(ProcessColumn::CompanyId.eq(company_id))
        .filter(ProcessColumn::Id.is_in(process_ids.iter().copied()))
        .count(&state.db)
        .await?;
    if found != process_ids.len() as u64 {
        return Err(AppError::not_found("One or more processes not found"));
    }

    let txn = state.db.begin().await?;
    UserProcessesEntity::delete_many()
        .filter(UserProcessColumn::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    if !process_ids.is_empty() {
        let now = Utc::now();
        UserProcessesEntity::insert_many(process_ids.iter().map(|&process_id| {
            user_processes::ActiveModel {
                user_id: Set(user_id),
                process_id: Set(process_id),
                created_at: Set(now),
            }
        }))
        .exec_without_returning(&txn)
        .await?;
    }
    txn.commit().await.context("Failed to assign processes")?;

    info!(request_id = %ctx.request_id, user_id = %user_id, count = process_ids.len(), "User processes replaced");
    respond(process_ids)
}
