//! Per-tenant product visibility
//!
//! POST /api/admin/products/visibility — the only writer of
//! `product_visibility` rows; catalog sync never creates them.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::visibility::ProductVisibility;
use shared::ApiResponse;

use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SetVisibilityRequest {
    pub product_id: String,
    pub tenant_id: String,
    pub is_visible: bool,
}

pub async fn set_visibility(
    State(state): State<AppState>,
    Json(req): Json<SetVisibilityRequest>,
) -> Result<ApiResponse<ProductVisibility>, ServiceError> {
    if db::catalog::find_product(&state.pool, &req.product_id)
        .await?
        .is_none()
    {
        return Err(AppError::new(ErrorCode::ProductNotFound).into());
    }
    if db::tenants::find_by_id(&state.pool, &req.tenant_id)
        .await?
        .is_none()
    {
        return Err(AppError::tenant_not_found().into());
    }

    db::catalog::set_visibility(&state.pool, &req.product_id, &req.tenant_id, req.is_visible)
        .await?;

    tracing::info!(
        product_id = %req.product_id,
        tenant_id = %req.tenant_id,
        is_visible = req.is_visible,
        "Product visibility set"
    );

    Ok(ApiResponse::success(ProductVisibility {
        product_id: req.product_id,
        tenant_id: req.tenant_id,
        is_visible: req.is_visible,
    }))
}
