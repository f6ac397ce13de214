//! # Request Handlers
//!
//! Endpoint logic, one module per resource. Every handler takes the shared
//! [`AppState`](crate::AppState) and the caller's
//! [`RequestContext`](evaluation::RequestContext); permission checks are
//! injected by `#[with_permission]`. Queries are scoped to the caller's company.

use axum::Json;
use error::{ApiResponse, PaginatedResponse, Result};
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, Select};

use crate::dto::ListQuery;

pub mod clusters;
pub mod feedbacks;
pub mod initiatives;
pub mod levels;
pub mod processes;
pub mod questions;
pub mod results;
pub mod rules;
pub mod sessions;
pub mod teams;
pub mod users;

/// Success envelope returned by every JSON endpoint
pub type ApiResult<T> = Result<Json<ApiResponse<T>>>;

/// Wrap `data` in the success envelope.
#[inline]
pub fn respond<T>(data: T) -> ApiResult<T> { Ok(Json(ApiResponse::ok(data))) }

/// Fetch one page of `select` and map its rows.
pub async fn paginate<C, E, T, F>(db: &C, select: Select<E>, query: &ListQuery, map: F) -> Result<PaginatedResponse<T>>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: Send + Sync,
    F: FnMut(E::Model) -> T,
{
    let page = query.page();
    let per_page = query.per_page();
    let paginator = select.paginate(db, per_page);
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(page - 1).await?;

    Ok(PaginatedResponse::new(
        rows.into_iter().map(map).collect(),
        page,
        per_page,
        total,
    ))
}
