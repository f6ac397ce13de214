//! # Session Handlers
//!
//! Session CRUD, cluster and rule associations, rule-driven feedback
//! generation, duplicate handling and the lifecycle transitions.

use chrono::Utc;
use entity::{
    clusters::{Column as ClusterColumn, Entity as ClustersEntity},
    feedbacks::{Column as FeedbackColumn, Entity as FeedbacksEntity},
    rules::{Column as RuleColumn, Entity as RulesEntity},
    sea_orm_active_enums::SessionStatus,
    session_clusters::{self, Column as SessionClusterColumn, Entity as SessionClustersEntity},
    session_rules::{self, Column as SessionRuleColumn, Entity as SessionRulesEntity},
    sessions::{self, Column as SessionColumn, Entity as SessionsEntity},
};
use error::{AppError, Context, PaginatedResponse, Result};
use evaluation::{
    conclude_session,
    detect_duplicates,
    generate_rule,
    permissions::{Permission, SessionAction},
    remove_duplicates,
    session::ensure_associations_editable,
    start_session,
    RequestContext,
    RuleNumber,
    RuleOutcome,
    SessionLifecycle,
    DUPLICATE_POLICY,
};
use permissions_macro::with_permission;
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    Condition,
    ConnectionTrait,
    DatabaseTransaction,
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

use super::{paginate, respond, ApiResult};
use crate::{
    dto::{
        sessions::{
            CreateSessionRequest,
            DuplicatesResponse,
            RemoveDuplicatesResponse,
            SessionFilter,
            SessionResponse,
            UpdateSessionRequest,
        },
        ListQuery,
        ReplaceIdsRequest,
    },
    events::{FeedbackEvent, FeedbackEventKind},
    utils::like_pattern,
    AppState,
};

/// Load a session of `company_id`, hiding sessions of other companies.
pub(crate) async fn load_session<C: ConnectionTrait>(
    db: &C,
    company_id: Uuid,
    session_id: Uuid,
) -> Result<sessions::Model> {
    SessionsEntity::find_by_id(session_id)
        .filter(SessionColumn::CompanyId.eq(company_id))
        .one(db)
        .await
        .context("Failed to load session")?
        .context(format!("Session {} not found", session_id))
}

fn unique(mut ids: Vec<Uuid>) -> Vec<Uuid> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

async fn ensure_clusters_exist<C: ConnectionTrait>(db: &C, company_id: Uuid, cluster_ids: &[Uuid]) -> Result<()> {
    let found = ClustersEntity::find()
        .filter(ClusterColumn::CompanyId.eq(company_id))
        .filter(ClusterColumn::Id.is_in(cluster_ids.iter().copied()))
        .count(db)
        .await?;
    if found != cluster_ids.len() as u64 {
        return Err(AppError::not_found("One or more clusters not found"));
    }
    Ok(())
}

async fn ensure_rules_exist<C: ConnectionTrait>(db: &C, company_id: Uuid, rule_ids: &[Uuid]) -> Result<()> {
    let found = RulesEntity::find()
        .filter(
            Condition::any()
                .add(RuleColumn::CompanyId.eq(company_id))
                .add(RuleColumn::CompanyId.is_null()),
        )
        .filter(RuleColumn::Id.is_in(rule_ids.iter().copied()))
        .count(db)
        .await?;
    if found != rule_ids.len() as u64 {
        return Err(AppError::not_found("One or more rules not found"));
    }
    Ok(())
}

async fn session_associations<C: ConnectionTrait>(db: &C, session_id: Uuid) -> Result<(Vec<Uuid>, Vec<Uuid>)> {
    let clusters = SessionClustersEntity::find()
        .filter(SessionClusterColumn::SessionId.eq(session_id))
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.cluster_id)
        .collect();
    let rules = SessionRulesEntity::find()
        .filter(SessionRuleColumn::SessionId.eq(session_id))
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.rule_id)
        .collect();
    Ok((clusters, rules))
}

async fn write_clusters(txn: &DatabaseTransaction, session_id: Uuid, cluster_ids: &[Uuid]) -> Result<()> {
    SessionClustersEntity::delete_many()
        .filter(SessionClusterColumn::SessionId.eq(session_id))
        .exec(txn)
        .await?;
    if !cluster_ids.is_empty() {
        SessionClustersEntity::insert_many(cluster_ids.iter().map(|&cluster_id| {
            session_clusters::ActiveModel {
                session_id: Set(session_id),
                cluster_id: Set(cluster_id),
            }
        }))
        .exec_without_returning(txn)
        .await?;
    }
    Ok(())
}

async fn write_rules(txn: &DatabaseTransaction, session_id: Uuid, rule_ids: &[Uuid]) -> Result<()> {
    SessionRulesEntity::delete_many()
        .filter(SessionRuleColumn::SessionId.eq(session_id))
        .exec(txn)
        .await?;
    if !rule_ids.is_empty() {
        SessionRulesEntity::insert_many(rule_ids.iter().map(|&rule_id| {
            session_rules::ActiveModel {
                session_id: Set(session_id),
                rule_id:    Set(rule_id),
            }
        }))
        .exec_without_returning(txn)
        .await?;
    }
    Ok(())
}

/// Create a session in preparation with its clusters and rules
///
/// The session and its associations are written in one transaction.
#[with_permission(Permission::Sessions(SessionAction::Manage))]
pub async fn create_session_handler(
    state: &AppState,
    ctx: RequestContext,
    req: CreateSessionRequest,
) -> ApiResult<SessionResponse> {
    req.validate()?;
    let company_id = ctx.company_id()?;
    let cluster_ids = unique(req.cluster_ids);
    let rule_ids = unique(req.rule_ids);
    ensure_clusters_exist(&state.db, company_id, &cluster_ids).await?;
    ensure_rules_exist(&state.db, company_id, &rule_ids).await?;

    let now = Utc::now();
    let txn = state.db.begin().await?;
    let session = sessions::ActiveModel {
        id:         Set(Uuid::new_v4()),
        name:       Set(req.name.trim().to_string()),
        start_time: Set(None),
        end_time:   Set(None),
        status:     Set(SessionStatus::Preparing),
        company_id: Set(company_id),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await
    .context("Failed to create session")?;
    write_clusters(&txn, session.id, &cluster_ids).await?;
    write_rules(&txn, session.id, &rule_ids).await?;
    txn.commit().await?;

    info!(
        request_id = %ctx.request_id,
        session_id = %session.id,
        clusters = cluster_ids.len(),
        rules = rule_ids.len(),
        "Session created"
    );
    respond(SessionResponse::new(session).with_associations(cluster_ids, rule_ids))
}

/// A session with its cluster and rule ids
#[with_permission(Permission::Sessions(SessionAction::Read))]
pub async fn get_session_handler(state: &AppState, ctx: RequestContext, session_id: Uuid) -> ApiResult<SessionResponse> {
    let session = load_session(&state.db, ctx.company_id()?, session_id).await?;
    let (clusters, rules) = session_associations(&state.db, session_id).await?;
    respond(SessionResponse::new(session).with_associations(clusters, rules))
}

/// Sessions of the caller's company, newest first
#[with_permission(Permission::Sessions(SessionAction::Read))]
pub async fn list_sessions_handler(
    state: &AppState,
    ctx: RequestContext,
    query: ListQuery,
    filter: SessionFilter,
) -> ApiResult<PaginatedResponse<SessionResponse>> {
    query.validate()?;
    let mut select = SessionsEntity::find().filter(SessionColumn::CompanyId.eq(ctx.company_id()?));
    if let Some(search) = query.search() {
        select = select.filter(SessionColumn::Name.like(like_pattern(search)));
    }
    if let Some(status) = filter.status {
        select = select.filter(SessionColumn::Status.eq(status));
    }
    let select = select.order_by_desc(SessionColumn::CreatedAt);
    respond(paginate(&state.db, select, &query, SessionResponse::new).await?)
}

#[with_permission(Permission::Sessions(SessionAction::Manage))]
pub async fn update_session_handler(
    state: &AppState,
    ctx: RequestContext,
    session_id: Uuid,
    req: UpdateSessionRequest,
) -> ApiResult<SessionResponse> {
    req.validate()?;
    let session = load_session(&state.db, ctx.company_id()?, session_id).await?;
    let mut active: sessions::ActiveModel = session.into();
    if let Some(name) = req.name {
        active.name = Set(name.trim().to_string());
    }
    active.updated_at = Set(Utc::now());

    let updated = active
        .update(&state.db)
        .await
        .context("Failed to update session")?;

    info!(request_id = %ctx.request_id, session_id = %session_id, "Session updated");
    respond(SessionResponse::new(updated))
}

/// Delete a session and all its feedback; sessions in progress are kept
#[with_permission(Permission::Sessions(SessionAction::Manage))]
pub async fn delete_session_handler(state: &AppState, ctx: RequestContext, session_id: Uuid) -> ApiResult<Uuid> {
    let session = load_session(&state.db, ctx.company_id()?, session_id).await?;
    if session.status.is_active() {
        return Err(AppError::conflict(format!(
            "Session '{}' is in progress and cannot be deleted",
            session.name
        )));
    }

    SessionsEntity::delete_by_id(session_id)
        .exec(&state.db)
        .await
        .context("Failed to delete session")?;

    info!(request_id = %ctx.request_id, session_id = %session_id, "Session deleted");
    respond(session_id)
}

/// Replace the clusters of a session in preparation
#[with_permission(Permission::Sessions(SessionAction::Manage))]
pub async fn replace_session_clusters_handler(
    state: &AppState,
    ctx: RequestContext,
    session_id: Uuid,
    req: ReplaceIdsRequest,
) -> ApiResult<SessionResponse> {
    req.validate()?;
    let company_id = ctx.company_id()?;
    let session = load_session(&state.db, company_id, session_id).await?;
    ensure_associations_editable(&session)?;

    let cluster_ids = unique(req.ids);
    ensure_clusters_exist(&state.db, company_id, &cluster_ids).await?;

    let txn = state.db.begin().await?;
    write_clusters(&txn, session_id, &cluster_ids).await?;
    txn.commit().await.context("Failed to assign clusters")?;

    info!(request_id = %ctx.request_id, session_id = %session_id, clusters = cluster_ids.len(), "Session clusters replaced");
    let (clusters, rules) = session_associations(&state.db, session_id).await?;
    respond(SessionResponse::new(session).with_associations(clusters, rules))
}

/// Replace the rules of a session in preparation
#[with_permission(Permission::Sessions(SessionAction::Manage))]
pub async fn replace_session_rules_handler(
    state: &AppState,
    ctx: RequestContext,
    session_id: Uuid,
    req: ReplaceIdsRequest,
) -> ApiResult<SessionResponse> {
    req.validate()?;
    let company_id = ctx.company_id()?;
    let session = load_session(&state.db, company_id, session_id).await?;
    ensure_associations_editable(&session)?;

    let rule_ids = unique(req.ids);
    ensure_rules_exist(&state.db, company_id, &rule_ids).await?;

    let txn = state.db.begin().await?;
    write_rules(&txn, session_id, &rule_ids).await?;
    txn.commit().await.context("Failed to assign rules")?;

    info!(request_id = %ctx.request_id, session_id = %session_id, rules = rule_ids.len(), "Session rules replaced");
    let (clusters, rules) = session_associations(&state.db, session_id).await?;
    respond(SessionResponse::new(session).with_associations(clusters, rules))
}

/// Generate the feedback requests of one rule
///
/// The rule number is validated before the session is touched.
#[with_permission(Permission::Sessions(SessionAction::Generate))]
pub async fn generate_rule_handler(
    state: &AppState,
    ctx: RequestContext,
    session_id: Uuid,
    rule_number: i32,
) -> ApiResult<RuleOutcome> {
    let rule = RuleNumber::try_from(rule_number)?;
    load_session(&state.db, ctx.company_id()?, session_id).await?;

    let outcome = generate_rule(&state.store(), session_id, rule)
        .await
        .map_err(|e| {
            logging::warn_with_request!(target: "rules", ctx.request_id, rule = %rule, error = %e, "Rule generation failed");
            e
        })?;

    state
        .events
        .publish(FeedbackEvent::session_wide(FeedbackEventKind::Generated, session_id));
    respond(outcome)
}

/// Move a session from preparation to in progress
#[with_permission(Permission::Sessions(SessionAction::Start))]
pub async fn start_session_handler(state: &AppState, ctx: RequestContext, session_id: Uuid) -> ApiResult<SessionResponse> {
    load_session(&state.db, ctx.company_id()?, session_id).await?;
    let session = start_session(&state.store(), session_id).await?;
    info!(request_id = %ctx.request_id, session_id = %session_id, "Session start requested");
    respond(SessionResponse::new(session))
}

/// Close a session in progress; its results become final
#[with_permission(Permission::Sessions(SessionAction::Conclude))]
pub async fn conclude_session_handler(
    state: &AppState,
    ctx: RequestContext,
    session_id: Uuid,
) -> ApiResult<SessionResponse> {
    load_session(&state.db, ctx.company_id()?, session_id).await?;
    let session = conclude_session(&state.store(), session_id).await?;
    info!(request_id = %ctx.request_id, session_id = %session_id, "Session conclusion requested");
    respond(SessionResponse::new(session))
}

/// Duplicate feedback requests of a session
#[with_permission(Permission::Sessions(SessionAction::Manage))]
pub async fn list_duplicates_handler(
    state: &AppState,
    ctx: RequestContext,
    session_id: Uuid,
) -> ApiResult<DuplicatesResponse> {
    load_session(&state.db, ctx.company_id()?, session_id).await?;
    let feedbacks = FeedbacksEntity::find()
        .filter(FeedbackColumn::SessionId.eq(session_id))
        .order_by_asc(FeedbackColumn::CreatedAt)
        .order_by_asc(FeedbackColumn::Id)
        .all(&state.db)
        .await
        .context("Failed to load feedbacks")?;

    let report = detect_duplicates(&feedbacks, DUPLICATE_POLICY);
    respond(DuplicatesResponse {
        session_id,
        total_feedbacks: feedbacks.len(),
        report,
    })
}

/// Delete duplicate requests, keeping one per sender, receiver and question
#[with_permission(Permission::Sessions(SessionAction::Generate))]
pub async fn remove_duplicates_handler(
    state: &AppState,
    ctx: RequestContext,
    session_id: Uuid,
) -> ApiResult<RemoveDuplicatesResponse> {
    load_session(&state.db, ctx.company_id()?, session_id).await?;
    let removed = remove_duplicates(&state.store(), session_id).await?;

    if removed > 0 {
        state
            .events
            .publish(FeedbackEvent::session_wide(FeedbackEventKind::DuplicatesRemoved, session_id));
    }
    respond(RemoveDuplicatesResponse {
        session_id,
        removed,
    })
}
