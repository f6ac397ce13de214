//! # Team Handlers
//!
//! HTTP request handlers for team CRUD, membership and cluster assignment.

use chrono::Utc;
use entity::{
    team_clusters::{self, Column as TeamClusterColumn, Entity as TeamClustersEntity},
    teams::{self, Column as TeamColumn, Entity as TeamsEntity},
    user_teams::{self, Column as UserTeamColumn, Entity as UserTeamsEntity},
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
    ConnectionTrait,
    EntityTrait,
    QueryFilter,
    QueryOrder,
    Set,
    TransactionTrait,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{clusters::load_cluster, paginate, respond, users::ensure_users_exist, users::load_user, ApiResult};
use crate::{
    dto::{
        teams::{AddTeamMemberRequest, AssignClusterRequest, CreateTeamRequest, TeamResponse, UpdateTeamRequest},
        ListQuery,
    },
    utils::like_pattern,
    AppState,
};

pub(crate) async fn load_team<C: ConnectionTrait>(db: &C, company_id: Uuid, team_id: Uuid) -> Result<teams::Model> {
    TeamsEntity::find_by_id(team_id)
        .filter(TeamColumn::CompanyId.eq(company_id))
        .one(db)
        .await
        .context("Failed to load team")?
        .context(format!("Team {} not found", team_id))
}

async fn team_cluster<C: ConnectionTrait>(db: &C, team_id: Uuid) -> Result<Option<Uuid>> {
    Ok(TeamClustersEntity::find()
        .filter(TeamClusterColumn::TeamId.eq(team_id))
        .one(db)
        .await?
        .map(|link| link.cluster_id))
}

async fn team_members<C: ConnectionTrait>(db: &C, team_id: Uuid) -> Result<Vec<Uuid>> {
    Ok(UserTeamsEntity::find()
        .filter(UserTeamColumn::TeamId.eq(team_id))
        .order_by_asc(UserTeamColumn::CreatedAt)
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.user_id)
        .collect())
}

/// Leader first, then the other members without repeats.
fn membership(leader_id: Uuid, member_ids: &[Uuid]) -> Vec<Uuid> {
    let mut members = vec![leader_id];
    for &id in member_ids {
        if !members.contains(&id) {
            members.push(id);
        }
    }
    members
}

/// Create a team with its leader membership and optional cluster link
///
/// All rows are written in one transaction.
#[with_permission(Permission::Directory(DirectoryAction::Manage))]
pub async fn create_team_handler(state: &AppState, ctx: RequestContext, req: CreateTeamRequest) -> ApiResult<TeamResponse> {
    req.validate()?;
    let company_id = ctx.company_id()?;

    let members = membership(req.leader_id, &req.member_ids);
    ensure_users_exist(&state.db, company_id, &members).await?;
    if let Some(cluster_id) = req.cluster_id {
        load_cluster(&state.db, company_id, cluster_id).await?;
    }

    let now = Utc::now();
    let txn = state.db.begin().await?;

    let team = teams::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(req.name.trim().to_string()),
        leader_id: Set(req.leader_id),
        company_id: Set(company_id),
        is_project: Set(req.is_project),
        is_cluster_leader: Set(req.is_cluster_leader),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await
    .context("Failed to create team")?;

    if let Some(cluster_id) = req.cluster_id {
        team_clusters::ActiveModel {
            team_id: Set(team.id),
            cluster_id: Set(cluster_id),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .context("Failed to link team to cluster")?;
    }

    UserTeamsEntity::insert_many(members.iter().map(|&user_id| {
        user_teams::ActiveModel {
            user_id: Set(user_id),
            team_id: Set(team.id),
            created_at: Set(now),
        }
    }))
    .exec_without_returning(&txn)
    .await
    .context("Failed to add team members")?;

    txn.commit().await?;

    info!(
        request_id = %ctx.request_id,
        team_id = %team.id,
        members = members.len(),
        "Team created"
    );
    respond(TeamResponse::new(team, req.cluster_id, Some(members)))
}

#[with_permission(Permission::Directory(DirectoryAction::Read))]
pub async fn get_team_handler(state: &AppState, ctx: RequestContext, team_id: Uuid) -> ApiResult<TeamResponse> {
    let team = load_team(&state.db, ctx.company_id()?, team_id).await?;
    let cluster_id = team_cluster(&state.db, team_id).await?;
    let members = team_members(&state.db, team_id).await?;
    respond(TeamResponse::new(team, cluster_id, Some(members)))
}

#[with_permission(Permission::Directory(DirectoryAction::Read))]
pub async fn list_teams_handler(
    state: &AppState,
    ctx: RequestContext,
    query: ListQuery,
) -> ApiResult<PaginatedResponse<TeamResponse>> {
    query.validate()?;
    let mut select = TeamsEntity::find().filter(TeamColumn::CompanyId.eq(ctx.company_id()?));
    if let Some(search) = query.search() {
        select = select.filter(TeamColumn::Name.like(like_pattern(search)));
    }
    let select = select.order_by_asc(TeamColumn::Name);
    let mut page = paginate(&state.db, select, &query, |team| TeamResponse::new(team, None, None)).await?;

    let team_ids: Vec<Uuid> = page.items.iter().map(|t| t.id).collect();
    let links = TeamClustersEntity::find()
        .filter(TeamClusterColumn::TeamId.is_in(team_ids))
        .all(&state.db)
        .await?;
    for team in &mut page.items {
        team.cluster_id = links
            .iter()
            .find(|link| link.team_id == team.id)
            .map(|link| link.cluster_id);
    }

    respond(page)
}

#[with_permission(Permission::Directory(DirectoryAction::Manage))]
pub async fn update_team_handler(
    state: &AppState,
    ctx: RequestContext,
    team_id: Uuid,
    req: UpdateTeamRequest,
) -> ApiResult<TeamResponse> {
    req.validate()?;
    let company_id = ctx.company_id()?;
    let team = load_team(&state.db, company_id, team_id).await?;
    let mut active: teams::ActiveModel = team.into();

    if let Some(name) = req.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(is_project) = req.is_project {
        active.is_project = Set(is_project);
    }
    if let Some(is_cluster_leader) = req.is_cluster_leader {
        active.is_cluster_leader = Set(is_cluster_leader);
    }
    active.updated_at = Set(Utc::now());

    let txn = state.db.begin().await?;
    if let Some(leader_id) = req.leader_id {
        load_user(&txn, company_id, leader_id).await?;
        active.leader_id = Set(leader_id);
        let is_member = UserTeamsEntity::find_by_id((leader_id, team_id))
            .one(&txn)
            .await?
            .is_some();
        if !is_member {
            user_teams::ActiveModel {
                user_id:    Set(leader_id),
                team_id:    Set(team_id),
                created_at: Set(Utc::now()),
            }
            .insert(&txn)
            .await?;
        }
    }
    let updated = active.update(&txn).await.context("Failed to update team")?;
    txn.commit().await?;

    info!(request_id = %ctx.request_id, team_id = %team_id, "Team updated");
    let cluster_id = team_cluster(&state.db, team_id).await?;
    respond(TeamResponse::new(updated, cluster_id, None))
}

#[with_permission(Permission::Directory(DirectoryAction::Manage))]
pub async fn delete_team_handler(state: &AppState, ctx: RequestContext, team_id: Uuid) -> ApiResult<Uuid> {
    load_team(&state.db, ctx.company_id()?, team_id).await?;
    TeamsEntity::delete_by_id(team_id)
        .exec(&state.db)
        .await
        .context("Failed to delete team")?;

    info!(request_id = %ctx.request_id, team_id = %team_id, "Team deleted");
    respond(team_id)
}

#[with_permission(Permission::Directory(DirectoryAction::Manage))]
pub async fn add_team_member_handler(
    state: &AppState,
    ctx: RequestContext,
    team_id: Uuid,
    req: AddTeamMemberRequest,
) -> ApiResult<Vec<Uuid>> {
    let company_id = ctx.company_id()?;
    load_team(&state.db, company_id, team_id).await?;
    load_user(&state.db, company_id, req.user_id).await?;

    let existing = UserTeamsEntity::find_by_id((req.user_id, team_id))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::conflict("User is already a member of this team"));
    }

    user_teams::ActiveModel {
        user_id:    Set(req.user_id),
        team_id:    Set(team_id),
        created_at: Set(Utc::now()),
    }
    .insert(&state.db)
    .await
    .context("Failed to add team member")?;

    info!(request_id = %ctx.request_id, team_id = %team_id, user_id = %req.user_id, "Team member added");
    respond(team_members(&state.db, team_id).await?)
}

/// Remove a member; the leader stays until replaced
#[with_permission(Permission::Directory(DirectoryAction::Manage))]
pub async fn remove_team_member_handler(
    state: &AppState,
    ctx: RequestContext,
    team_id: Uuid,
    user_id: Uuid,
) -> ApiResult<Vec<Uuid>> {
    let team = load_team(&state.db, ctx.company_id()?, team_id).await?;
    if team.leader_id == user_id {
        return Err(AppError::conflict("The team leader cannot be removed from the team"));
    }

    let result = UserTeamsEntity::delete_by_id((user_id, team_id))
        .exec(&state.db)
        .await
        .context("Failed to remove team member")?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("User is not a member of this team"));
    }

    info!(request_id = %ctx.request_id, team_id = %team_id, user_id = %user_id, "Team member removed");
    respond(team_members(&state.db, team_id).await?)
}

/// Move a team to another cluster, or detach it
#[with_permission(Permission::Directory(DirectoryAction::Manage))]
pub async fn assign_cluster_handler(
    state: &AppState,
    ctx: RequestContext,
    team_id: Uuid,
    req: AssignClusterRequest,
) -> ApiResult<TeamResponse> {
    let company_id = ctx.company_id()?;
    let team = load_team(&state.db, company_id, team_id).await?;
    let Some(cluster_id) = req.cluster_id
    else {
        return Err(AppError::validation("cluster_id is required; use null to detach the team"));
    };
    if let Some(cluster_id) = cluster_id {
        load_cluster(&state.db, company_id, cluster_id).await?;
    }

    let txn = state.db.begin().await?;
    TeamClustersEntity::delete_many()
        .filter(TeamClusterColumn::TeamId.eq(team_id))
        .exec(&txn)
        .await?;
    if let Some(cluster_id) = cluster_id {
        team_clusters::ActiveModel {
            team_id:    Set(team_id),
            cluster_id: Set(cluster_id),
            created_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await?;
    }
    txn.commit().await.context("Failed to assign cluster")?;

    info!(request_id = %ctx.request_id, team_id = %team_id, cluster_id = ?cluster_id, "Team cluster assigned");
    respond(TeamResponse::new(team, cluster_id, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_puts_leader_first() {
        let (leader, a, b) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(membership(leader, &[a, leader, b, a]), vec![leader, a, b]);
    }
}
