//! Admin tenant CRUD

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use shared::error::AppError;
use shared::models::tenant::{Tenant, TenantCreate, TenantUpdate};
use shared::util::now_millis;
use shared::ApiResponse;

use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

pub async fn list_tenants(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<ApiResponse<Vec<Tenant>>, ServiceError> {
    let tenants = db::tenants::list(&state.pool, query.include_inactive).await?;
    Ok(ApiResponse::success(tenants))
}

pub async fn get_tenant(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
) -> Result<ApiResponse<Tenant>, ServiceError> {
    let tenant = db::tenants::find_by_id(&state.pool, &tenant_id)
        .await?
        .ok_or_else(AppError::tenant_not_found)?;
    Ok(ApiResponse::success(tenant))
}

pub async fn create_tenant(
    State(state): State<AppState>,
    Json(data): Json<TenantCreate>,
) -> Result<ApiResponse<Tenant>, ServiceError> {
    if data.slug.trim().is_empty() || data.name.trim().is_empty() || data.domain.trim().is_empty() {
        return Err(AppError::validation("slug, name and domain are required").into());
    }

    let tenant = db::tenants::create(&state.pool, &db::new_id(), &data, now_millis()).await?;
    tracing::info!(tenant_id = %tenant.id, slug = %tenant.slug, "Tenant created");
    Ok(ApiResponse::success(tenant))
}

pub async fn update_tenant(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    Json(data): Json<TenantUpdate>,
) -> Result<ApiResponse<Tenant>, ServiceError> {
    let tenant = db::tenants::update(&state.pool, &tenant_id, &data, now_millis())
        .await?
        .ok_or_else(AppError::tenant_not_found)?;
    tracing::info!(tenant_id = %tenant.id, "Tenant updated");
    Ok(ApiResponse::success(tenant))
}

pub async fn deactivate_tenant(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
) -> Result<ApiResponse<()>, ServiceError> {
    let deactivated = db::tenants::deactivate(&state.pool, &tenant_id, now_millis()).await?;
    if !deactivated {
        return Err(AppError::tenant_not_found().into());
    }
    tracing::info!(tenant_id = %tenant_id, "Tenant deactivated");
    Ok(ApiResponse::ok())
}
