//! Tenant resolution
//!
//! GET /api/tenant/resolve — map a request origin onto a tenant.
//! Production storefronts resolve by custom domain; development and
//! preview deployments fall back to an explicit slug, then to the
//! configured default.

use axum::extract::{Query, State};
use serde::Deserialize;
use shared::error::AppError;
use shared::models::tenant::Tenant;
use shared::ApiResponse;

use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub domain: Option<String>,
    pub slug: Option<String>,
}

pub async fn resolve_tenant(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Result<ApiResponse<Tenant>, ServiceError> {
    if let Some(domain) = query.domain.as_deref().filter(|d| !d.is_empty()) {
        if let Some(tenant) = db::tenants::find_by_domain(&state.pool, domain).await? {
            return Ok(ApiResponse::success(tenant));
        }
        tracing::debug!(domain, "No tenant for domain, trying slug fallback");
    }

    let slug = query
        .slug
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(&state.default_tenant_slug);

    let tenant = db::tenants::find_by_slug(&state.pool, slug)
        .await?
        .ok_or_else(AppError::tenant_not_found)?;

    Ok(ApiResponse::success(tenant))
}
