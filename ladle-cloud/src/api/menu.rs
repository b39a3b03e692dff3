//! Storefront menu surface
//!
//! GET /api/menu — products visible to one tenant
//! GET /api/products/{id}/options — available option values for a product
//! GET /api/delivery-zones — active zones, so checkout can show coverage

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::product::{CatalogOption, CatalogProduct};
use shared::models::zone::DeliveryZone;
use shared::ApiResponse;

use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    pub slug: Option<String>,
}

pub async fn get_menu(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> Result<ApiResponse<Vec<CatalogProduct>>, ServiceError> {
    let slug = query
        .slug
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(&state.default_tenant_slug);

    let tenant = db::tenants::find_by_slug(&state.pool, slug)
        .await?
        .ok_or_else(AppError::tenant_not_found)?;

    let products = db::catalog::list_visible_products(&state.pool, &tenant.id).await?;
    Ok(ApiResponse::success(products))
}

pub async fn get_delivery_zones(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> Result<ApiResponse<Vec<DeliveryZone>>, ServiceError> {
    let slug = query
        .slug
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(&state.default_tenant_slug);

    let tenant = db::tenants::find_by_slug(&state.pool, slug)
        .await?
        .ok_or_else(AppError::tenant_not_found)?;

    let zones = db::zones::list_for_tenant(&state.pool, &tenant.id).await?;
    Ok(ApiResponse::success(zones))
}

pub async fn get_product_options(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<ApiResponse<Vec<CatalogOption>>, ServiceError> {
    if db::catalog::find_product(&state.pool, &product_id)
        .await?
        .is_none()
    {
        return Err(AppError::new(ErrorCode::ProductNotFound).into());
    }

    let options = db::catalog::list_options_for_product(&state.pool, &product_id).await?;
    Ok(ApiResponse::success(options))
}
