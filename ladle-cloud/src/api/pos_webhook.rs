//! POS webhook handler
//!
//! POST /webhooks/pos — availability and order-status events pushed by
//! the POS. The raw body is HMAC-verified before any parsing; an
//! unconfigured secret fails closed.
//!
//! Supported events:
//! - `dish.availability_update`
//! - `option_value.availability_update` (batched)
//! - `order.status.update`

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use shared::error::{AppError, ErrorCode};
use shared::models::order::map_pos_status;
use shared::util::now_millis;
use shared::ApiResponse;

use crate::db;
use crate::error::ServiceError;
use crate::pos;
use crate::pos::types::{
    DishAvailabilityData, OptionAvailabilityData, OrderStatusData, PosWebhookEnvelope,
};
use crate::state::AppState;

pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<ApiResponse<serde_json::Value>, ServiceError> {
    let Some(secret) = state.pos_webhook_secret.as_deref() else {
        tracing::error!("POS_WEBHOOK_SECRET not configured");
        return Err(AppError::configuration("POS_WEBHOOK_SECRET not configured").into());
    };

    let signature = headers
        .get("x-pos-signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if let Err(e) = pos::verify_webhook_signature(&body, signature, secret) {
        tracing::warn!(error = e, "POS webhook signature verification failed");
        return Err(AppError::invalid_signature().into());
    }

    let envelope: PosWebhookEnvelope = serde_json::from_slice(&body)
        .map_err(|e| AppError::invalid_request(format!("Malformed webhook payload: {e}")))?;

    tracing::info!(
        event = %envelope.event_name,
        restaurant_id = envelope.restaurant_id,
        "Received POS webhook"
    );

    match envelope.event_name.as_str() {
        "dish.availability_update" => handle_dish_availability(&state, envelope).await,
        "option_value.availability_update" => handle_option_availability(&state, envelope).await,
        "order.status.update" => handle_order_status(&state, envelope).await,
        other => {
            tracing::warn!(event = other, "Unknown POS event type");
            Ok(ApiResponse::success_with_message(
                "Event type not supported",
                serde_json::Value::Null,
            ))
        }
    }
}

async fn handle_dish_availability(
    state: &AppState,
    envelope: PosWebhookEnvelope,
) -> Result<ApiResponse<serde_json::Value>, ServiceError> {
    let tenant = db::tenants::find_by_pos_restaurant_id(&state.pool, envelope.restaurant_id)
        .await?
        .ok_or_else(AppError::tenant_not_found)?;

    let data: DishAvailabilityData = serde_json::from_value(envelope.data)
        .map_err(|e| AppError::invalid_request(format!("Malformed dish payload: {e}")))?;

    let is_available = !data.outofstock;
    let updated = db::catalog::set_product_availability(
        &state.pool,
        &data.id_dish.to_string(),
        is_available,
        now_millis(),
    )
    .await?;

    if !updated {
        tracing::warn!(dish_id = data.id_dish, "Availability update for unknown product");
        return Err(AppError::new(ErrorCode::ProductNotFound).into());
    }

    tracing::info!(dish_id = data.id_dish, is_available, "Product availability updated");
    Ok(ApiResponse::success_with_message(
        "Product availability updated",
        serde_json::json!({
            "tenant_slug": tenant.slug,
            "dish_id": data.id_dish,
            "is_available": is_available,
        }),
    ))
}

/// The POS batches option updates; each entry succeeds or fails on its
/// own and the response reports per-entry outcomes.
async fn handle_option_availability(
    state: &AppState,
    envelope: PosWebhookEnvelope,
) -> Result<ApiResponse<serde_json::Value>, ServiceError> {
    let tenant = db::tenants::find_by_pos_restaurant_id(&state.pool, envelope.restaurant_id)
        .await?
        .ok_or_else(AppError::tenant_not_found)?;

    let data: OptionAvailabilityData = serde_json::from_value(envelope.data)
        .map_err(|e| AppError::invalid_request(format!("Malformed option payload: {e}")))?;

    let mut updates = Vec::new();
    for entry in &data.options_values_availabilities {
        let is_available = !entry.outofstock;
        let result = db::catalog::set_option_availability(
            &state.pool,
            &entry.id_dish_option_value.to_string(),
            is_available,
        )
        .await;
        updates.push(entry_outcome(entry.id_dish_option_value, is_available, result));
    }

    tracing::info!(
        count = updates.len(),
        tenant = %tenant.slug,
        "Option availability batch processed"
    );
    Ok(ApiResponse::success_with_message(
        "Option availability updated",
        serde_json::json!({
            "tenant_slug": tenant.slug,
            "updates": updates,
        }),
    ))
}

/// Fold one batch entry's store result into its reported outcome.
/// A store error fails the entry, never the rest of the batch.
fn entry_outcome(
    option_id: i64,
    is_available: bool,
    result: Result<bool, sqlx::Error>,
) -> serde_json::Value {
    let success = match result {
        Ok(true) => true,
        Ok(false) => {
            tracing::warn!(option_id, "Availability update for unknown option");
            false
        }
        Err(e) => {
            tracing::error!(option_id, error = %e, "Option availability update failed");
            false
        }
    };
    serde_json::json!({
        "option_id": option_id,
        "success": success,
        "is_available": is_available,
    })
}

async fn handle_order_status(
    state: &AppState,
    envelope: PosWebhookEnvelope,
) -> Result<ApiResponse<serde_json::Value>, ServiceError> {
    let data: OrderStatusData = serde_json::from_value(envelope.data)
        .map_err(|e| AppError::invalid_request(format!("Malformed order payload: {e}")))?;

    let status = map_pos_status(&data.status);

    let order_id = db::orders::update_status_by_pos_order_id(
        &state.pool,
        &data.id_order.to_string(),
        &status,
        now_millis(),
    )
    .await?
    .ok_or_else(|| {
        tracing::warn!(pos_order_id = data.id_order, "Status update for unknown order");
        AppError::new(ErrorCode::OrderNotFound)
    })?;

    tracing::info!(order_id = %order_id, status = %status, "Order status updated from POS");
    Ok(ApiResponse::success_with_message(
        "Order status updated",
        serde_json::json!({
            "order_id": order_id,
            "status": status,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_batch_entry_failure_is_reported_not_fatal() {
        let ok = entry_outcome(7, true, Ok(true));
        assert_eq!(ok["success"], true);
        assert_eq!(ok["option_id"], 7);

        let unknown = entry_outcome(8, false, Ok(false));
        assert_eq!(unknown["success"], false);

        // a store error is a per-entry failure, not an early return
        let errored = entry_outcome(9, true, Err(sqlx::Error::PoolTimedOut));
        assert_eq!(errored["success"], false);
        assert_eq!(errored["is_available"], true);
    }
}
