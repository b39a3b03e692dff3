//! Order endpoints
//!
//! POST /api/orders — checkout; tenant context via `x-tenant-slug`
//! GET /api/orders/track/{token} — unauthenticated tracking lookup

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use shared::error::{AppError, ErrorCode};
use shared::models::order::{CreateOrderRequest, Order};
use shared::ApiResponse;

use crate::db;
use crate::error::ServiceError;
use crate::orders::{self, OrderReceipt};
use crate::state::AppState;

pub async fn create_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateOrderRequest>,
) -> Result<ApiResponse<OrderReceipt>, ServiceError> {
    let slug = headers
        .get("x-tenant-slug")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::invalid_request("Missing x-tenant-slug header"))?;

    let receipt = orders::create_order(&state, slug, req).await?;
    Ok(ApiResponse::success(receipt))
}

pub async fn track_order(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<ApiResponse<Order>, ServiceError> {
    let order = db::orders::find_by_tracking_token(&state.pool, &token)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    Ok(ApiResponse::success(order))
}
