//! Stripe webhook handler
//!
//! POST /webhooks/stripe — payment lifecycle events (raw body for
//! signature verification). Events are idempotency-filtered through
//! `processed_webhook_events` before any state change.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use shared::util::now_millis;

use crate::state::AppState;
use crate::{db, email, stripe};

/// Handle incoming Stripe webhook events
///
/// Must receive raw body (not JSON) for HMAC signature verification.
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let Some(webhook_secret) = state.stripe_webhook_secret.as_deref() else {
        tracing::error!("STRIPE_WEBHOOK_SECRET not configured");
        return StatusCode::INTERNAL_SERVER_ERROR;
    };

    // 1. Get Stripe-Signature header
    let sig_header = match headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
    {
        Some(s) => s,
        None => {
            tracing::warn!("Missing Stripe-Signature header");
            return StatusCode::BAD_REQUEST;
        }
    };

    // 2. Verify signature
    if let Err(e) = stripe::verify_webhook_signature(&body, sig_header, webhook_secret) {
        tracing::warn!(error = e, "Webhook signature verification failed");
        return StatusCode::BAD_REQUEST;
    }

    // 3. Parse JSON event
    let event: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(%e, "Failed to parse webhook JSON");
            return StatusCode::BAD_REQUEST;
        }
    };

    let event_type = event["type"].as_str().unwrap_or("");
    tracing::info!(event_type = event_type, "Received Stripe webhook");

    // 4. Idempotency: INSERT first, check rows_affected (eliminates TOCTOU race)
    let event_id = match event["id"].as_str() {
        Some(id) => id,
        None => {
            tracing::warn!("Webhook event missing id");
            return StatusCode::BAD_REQUEST;
        }
    };

    match db::webhook_events::record(&state.pool, event_id, event_type, now_millis()).await {
        Ok(false) => {
            tracing::info!(event_id = event_id, "Duplicate webhook event, skipping");
            return StatusCode::OK;
        }
        Err(e) => {
            tracing::error!(%e, "DB error recording webhook event");
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
        Ok(true) => {} // New event, proceed
    }

    // 5. Handle event types
    match event_type {
        "payment_intent.succeeded" => handle_payment_succeeded(&state, &event).await,
        "payment_intent.payment_failed" => handle_payment_failed(&state, &event).await,
        "charge.refunded" => handle_charge_refunded(&state, &event).await,
        _ => {
            tracing::debug!(event_type = event_type, "Unhandled webhook event type");
            StatusCode::OK
        }
    }
}

/// Correlate a payment event with its order: payments row by
/// payment-intent id first, `metadata.order_id` as fallback.
async fn correlate_order(
    state: &AppState,
    intent_id: &str,
    obj: &serde_json::Value,
    payment_status: &str,
) -> Result<Option<String>, sqlx::Error> {
    let now = now_millis();
    if let Some(order_id) = db::payments::update_status_by_provider_payment_id(
        &state.pool,
        intent_id,
        payment_status,
        now,
    )
    .await?
    {
        return Ok(Some(order_id));
    }

    Ok(obj
        .get("metadata")
        .and_then(|m| m["order_id"].as_str())
        .map(String::from))
}

/// payment_intent.succeeded → payment succeeded, order paid + confirmed
async fn handle_payment_succeeded(state: &AppState, event: &serde_json::Value) -> StatusCode {
    let obj = match event.get("data").and_then(|d| d.get("object")) {
        Some(o) => o,
        None => return StatusCode::OK,
    };
    let intent_id = obj["id"].as_str().unwrap_or("");

    let order_id = match correlate_order(state, intent_id, obj, "succeeded").await {
        Ok(Some(id)) => id,
        Ok(None) => {
            tracing::warn!(intent_id, "Payment succeeded for unknown order");
            return StatusCode::OK;
        }
        Err(e) => {
            tracing::error!(%e, "DB error correlating payment");
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    };

    let now = now_millis();
    if let Err(e) =
        db::orders::set_payment_outcome(&state.pool, &order_id, "paid", Some("confirmed"), now)
            .await
    {
        tracing::error!(%e, order_id = %order_id, "Failed to mark order paid");
        return StatusCode::INTERNAL_SERVER_ERROR;
    }

    tracing::info!(order_id = %order_id, intent_id, "Order paid and confirmed");

    if let Ok(Some(order)) = db::orders::find_by_id(&state.pool, &order_id).await {
        let _ = email::send_order_confirmed(
            &state.ses,
            &state.ses_from_email,
            &order.customer_email,
            order.order_number,
            order.total_cents,
            &state.currency,
        )
        .await;
    }

    StatusCode::OK
}

/// payment_intent.payment_failed → payment failed; order status is left
/// untouched so the customer can retry
async fn handle_payment_failed(state: &AppState, event: &serde_json::Value) -> StatusCode {
    let obj = match event.get("data").and_then(|d| d.get("object")) {
        Some(o) => o,
        None => return StatusCode::OK,
    };
    let intent_id = obj["id"].as_str().unwrap_or("");

    let order_id = match correlate_order(state, intent_id, obj, "failed").await {
        Ok(Some(id)) => id,
        Ok(None) => {
            tracing::warn!(intent_id, "Payment failed for unknown order");
            return StatusCode::OK;
        }
        Err(e) => {
            tracing::error!(%e, "DB error correlating payment");
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    };

    if let Err(e) =
        db::orders::set_payment_outcome(&state.pool, &order_id, "failed", None, now_millis()).await
    {
        tracing::error!(%e, order_id = %order_id, "Failed to mark payment failed");
        return StatusCode::INTERNAL_SERVER_ERROR;
    }

    tracing::info!(order_id = %order_id, intent_id, "Payment failed recorded");
    StatusCode::OK
}

/// charge.refunded → payment refunded, order cancelled
async fn handle_charge_refunded(state: &AppState, event: &serde_json::Value) -> StatusCode {
    let obj = match event.get("data").and_then(|d| d.get("object")) {
        Some(o) => o,
        None => return StatusCode::OK,
    };

    let intent_id = match obj["payment_intent"].as_str() {
        Some(s) => s,
        None => {
            tracing::warn!("charge.refunded without payment_intent");
            return StatusCode::OK;
        }
    };

    let order_id = match correlate_order(state, intent_id, obj, "refunded").await {
        Ok(Some(id)) => id,
        Ok(None) => {
            tracing::warn!(intent_id, "Refund for unknown order");
            return StatusCode::OK;
        }
        Err(e) => {
            tracing::error!(%e, "DB error correlating refund");
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    };

    if let Err(e) = db::orders::set_payment_outcome(
        &state.pool,
        &order_id,
        "refunded",
        Some("cancelled"),
        now_millis(),
    )
    .await
    {
        tracing::error!(%e, order_id = %order_id, "Failed to mark order refunded");
        return StatusCode::INTERNAL_SERVER_ERROR;
    }

    tracing::info!(order_id = %order_id, intent_id, "Order refunded and cancelled");

    if let Ok(Some(order)) = db::orders::find_by_id(&state.pool, &order_id).await {
        let _ = email::send_order_refunded(
            &state.ses,
            &state.ses_from_email,
            &order.customer_email,
            order.order_number,
        )
        .await;
    }

    StatusCode::OK
}
