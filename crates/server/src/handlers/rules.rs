//! # Rule Handlers
//!
//! Company rules plus the shared templates (rules without a company). Templates
//! are read-only.

use chrono::Utc;
use entity::rules::{self, Column as RuleColumn, Entity as RulesEntity};
use error::{AppError, Context, PaginatedResponse, Result};
use evaluation::{
    permissions::{DirectoryAction, Permission, SessionAction},
    RequestContext,
    RuleNumber,
};
use permissions_macro::with_permission;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{paginate, respond, ApiResult};
use crate::{
    dto::{
        rules::{CreateRuleRequest, RuleResponse, UpdateRuleRequest},
        ListQuery,
    },
    utils::like_pattern,
    AppState,
};

/// Rules visible to a company: its own and the templates.
fn visible_to(company_id: Uuid) -> Condition {
    Condition::any()
        .add(RuleColumn::CompanyId.eq(company_id))
        .add(RuleColumn::CompanyId.is_null())
}

pub(crate) async fn load_rule<C: ConnectionTrait>(db: &C, company_id: Uuid, rule_id: Uuid) -> Result<rules::Model> {
    RulesEntity::find_by_id(rule_id)
        .filter(visible_to(company_id))
        .one(db)
        .await
        .context("Failed to load rule")?
        .context(format!("Rule {} not found", rule_id))
}

async fn load_own_rule<C: ConnectionTrait>(db: &C, company_id: Uuid, rule_id: Uuid) -> Result<rules::Model> {
    let rule = load_rule(db, company_id, rule_id).await?;
    if rule.is_template || rule.company_id.is_none() {
        return Err(AppError::forbidden("Rule templates cannot be modified"));
    }
    Ok(rule)
}

#[with_permission(Permission::Directory(DirectoryAction::Manage))]
pub async fn create_rule_handler(state: &AppState, ctx: RequestContext, req: CreateRuleRequest) -> ApiResult<RuleResponse> {
    req.validate()?;
    let number = RuleNumber::try_from(req.number)?;
    let company_id = ctx.company_id()?;

    let now = Utc::now();
    let rule = rules::ActiveModel {
        id:          Set(Uuid::new_v4()),
        name:        Set(req.name.trim().to_string()),
        description: Set(req.description),
        content_sql: Set(req.content_sql),
        number:      Set(number.get()),
        is_template: Set(false),
        company_id:  Set(Some(company_id)),
        created_at:  Set(now),
        updated_at:  Set(now),
    }
    .insert(&state.db)
    .await
    .context("Failed to create rule")?;

    info!(request_id = %ctx.request_id, rule_id = %rule.id, number = rule.number, "Rule created");
    respond(rule.into())
}

#[with_permission(Permission::Sessions(SessionAction::Read))]
pub async fn get_rule_handler(state: &AppState, ctx: RequestContext, rule_id: Uuid) -> ApiResult<RuleResponse> {
    respond(load_rule(&state.db, ctx.company_id()?, rule_id).await?.into())
}

/// Company rules and templates, ordered by number
#[with_permission(Permission::Sessions(SessionAction::Read))]
pub async fn list_rules_handler(
    state: &AppState,
    ctx: RequestContext,
    query: ListQuery,
) -> ApiResult<PaginatedResponse<RuleResponse>> {
    query.validate()?;
    let mut select = RulesEntity::find().filter(visible_to(ctx.company_id()?));
    if let Some(search) = query.search() {
        select = select.filter(RuleColumn::Name.like(like_pattern(search)));
    }
    let select = select
        .order_by_asc(RuleColumn::Number)
        .order_by_desc(RuleColumn::IsTemplate)
        .order_by_asc(RuleColumn::Name);
    respond(paginate(&state.db, select, &query, RuleResponse::from).await?)
}

#[with_permission(Permission::Directory(DirectoryAction::Manage))]
pub async fn update_rule_handler(
    state: &AppState,
    ctx: RequestContext,
    rule_id: Uuid,
    req: UpdateRuleRequest,
) -> ApiResult<RuleResponse> {
    req.validate()?;
    let number = req.number.map(RuleNumber::try_from).transpose()?;
    let rule = load_own_rule(&state.db, ctx.company_id()?, rule_id).await?;
    let mut active: rules::ActiveModel = rule.into();

    if let Some(name) = req.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = req.description {
        active.description = Set(description);
    }
    if let Some(content_sql) = req.content_sql {
        active.content_sql = Set(content_sql);
    }
    if let Some(number) = number {
        active.number = Set(number.get());
    }
    active.updated_at = Set(Utc::now());

    let updated = active
        .update(&state.db)
        .await
        .context("Failed to update rule")?;

    info!(request_id = %ctx.request_id, rule_id = %rule_id, "Rule updated");
    respond(updated.into())
}

#[with_permission(Permission::Directory(DirectoryAction::Manage))]
pub async fn delete_rule_handler(state: &AppState, ctx: RequestContext, rule_id: Uuid) -> ApiResult<Uuid> {
    load_own_rule(&state.db, ctx.company_id()?, rule_id).await?;
    RulesEntity::delete_by_id(rule_id)
        .exec(&state.db)
        .await
        .context("Failed to delete rule")?;

    info!(request_id = %ctx.request_id, rule_id = %rule_id, "Rule deleted");
    respond(rule_id)
}
