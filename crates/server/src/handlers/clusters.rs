//! # Cluster Handlers

use chrono::Utc;
use entity::{
    clusters::{self, Column as ClusterColumn, Entity as ClustersEntity},
    team_clusters::{Column as TeamClusterColumn, Entity as TeamClustersEntity},
};
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

use super::{paginate, respond, users::load_user, ApiResult};
use crate::{
    dto::{
        clusters::{ClusterResponse, CreateClusterRequest, UpdateClusterRequest},
        ListQuery,
    },
    utils::like_pattern,
    AppState,
};

pub(crate) async fn load_cluster<C: ConnectionTrait>(
    db: &C,
    company_id: Uuid,
    cluster_id: Uuid,
) -> Result<clusters::Model> {
    ClustersEntity::find_by_id(cluster_id)
        .filter(ClusterColumn::CompanyId.eq(company_id))
        .one(db)
        .await
        .context("Failed to load cluster")?
        .context(format!("Cluster {} not found", cluster_id))
}

async fn cluster_teams<C: ConnectionTrait>(db: &C, cluster_id: Uuid) -> Result<Vec<Uuid>> {
    Ok(TeamClustersEntity::find()
        .filter(TeamClusterColumn::ClusterId.eq(cluster_id))
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.team_id)
        .collect())
}

#[with_permission(Permission::Directory(DirectoryAction::Manage))]
pub async fn create_cluster_handler(
    state: &AppState,
    ctx: RequestContext,
    req: CreateClusterRequest,
) -> ApiResult<ClusterResponse> {
    req.validate()?;
    let company_id = ctx.company_id()?;
    load_user(&state.db, company_id, req.leader_id).await?;

    let now = Utc::now();
    let cluster = clusters::ActiveModel {
        id:         Set(Uuid::new_v4()),
        name:       Set(req.name.trim().to_string()),
        leader_id:  Set(req.leader_id),
        level:      Set(req.level),
        company_id: Set(company_id),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await
    .context("Failed to create cluster")?;

    info!(request_id = %ctx.request_id, cluster_id = %cluster.id, "Cluster created");
    respond(ClusterResponse::new(cluster, Some(Vec::new())))
}

/// A cluster with the ids of its teams
#[with_permission(Permission::Directory(DirectoryAction::Read))]
pub async fn get_cluster_handler(state: &AppState, ctx: RequestContext, cluster_id: Uuid) -> ApiResult<ClusterResponse> {
    let cluster = load_cluster(&state.db, ctx.company_id()?, cluster_id).await?;
    let teams = cluster_teams(&state.db, cluster_id).await?;
    respond(ClusterResponse::new(cluster, Some(teams)))
}

#[with_permission(Permission::Directory(DirectoryAction::Read))]
pub async fn list_clusters_handler(
    state: &AppState,
    ctx: RequestContext,
    query: ListQuery,
) -> ApiResult<PaginatedResponse<ClusterResponse>> {
    query.validate()?;
    let mut select = ClustersEntity::find().filter(ClusterColumn::CompanyId.eq(ctx.company_id()?));
    if let Some(search) = query.search() {
        select = select.filter(ClusterColumn::Name.like(like_pattern(search)));
    }
    let select = select
        .order_by_asc(ClusterColumn::Level)
        .order_by_asc(ClusterColumn::Name);
    respond(paginate(&state.db, select, &query, |c| ClusterResponse::new(c, None)).await?)
}

#[with_permission(Permission::Directory(DirectoryAction::Manage))]
pub async fn update_cluster_handler(
    state: &AppState,
    ctx: RequestContext,
    cluster_id: Uuid,
    req: UpdateClusterRequest,
) -> ApiResult<ClusterResponse> {
    req.validate()?;
    let company_id = ctx.company_id()?;
    let cluster = load_cluster(&state.db, company_id, cluster_id).await?;
    let mut active: clusters::ActiveModel = cluster.into();

    if let Some(name) = req.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(leader_id) = req.leader_id {
        load_user(&state.db, company_id, leader_id).await?;
        active.leader_id = Set(leader_id);
    }
    if let Some(level) = req.level {
        active.level = Set(level);
    }
    active.updated_at = Set(Utc::now());

    let updated = active
        .update(&state.db)
        .await
        .context("Failed to update cluster")?;

    info!(request_id = %ctx.request_id, cluster_id = %cluster_id, "Cluster updated");
    respond(ClusterResponse::new(updated, None))
}

/// Delete a cluster; its teams are detached, not deleted
#[with_permission(Permission::Directory(DirectoryAction::Manage))]
pub async fn delete_cluster_handler(state: &AppState, ctx: RequestContext, cluster_id: Uuid) -> ApiResult<Uuid> {
    load_cluster(&state.db, ctx.company_id()?, cluster_id).await?;
    ClustersEntity::delete_by_id(cluster_id)
        .exec(&state.db)
        .await
        .context("Failed to delete cluster")?;

    info!(request_id = %ctx.request_id, cluster_id = %cluster_id, "Cluster deleted");
    respond(cluster_id)
}
