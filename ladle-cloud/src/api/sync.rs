//! Cron-triggered catalog sync
//!
//! GET /cron/sync-catalog — gated by a Bearer CRON_SECRET so the
//! endpoint can be driven by an external scheduler.

use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use shared::error::{AppError, ErrorCode};
use shared::ApiResponse;

use crate::pos::sync::{sync_catalog, SyncReport};
use crate::state::AppState;

pub async fn run_catalog_sync(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<ApiResponse<serde_json::Value>, AppError> {
    let Some(secret) = state.cron_secret.as_deref() else {
        tracing::error!("CRON_SECRET not configured");
        return Err(AppError::configuration("CRON_SECRET not configured"));
    };

    let authorized = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| token == secret);
    if !authorized {
        tracing::warn!("Cron sync rejected: bad or missing bearer token");
        return Err(AppError::unauthorized());
    }

    let started = std::time::Instant::now();
    let report = sync_catalog(&state).await;
    let duration_ms = started.elapsed().as_millis() as u64;

    if !report.success {
        return Err(AppError::with_message(
            ErrorCode::CatalogSyncFailed,
            report.errors.join("; "),
        )
        .with_detail("details", report.errors.clone())
        .with_detail("duration_ms", duration_ms));
    }

    Ok(ApiResponse::success(success_body(&report, duration_ms)))
}

fn success_body(report: &SyncReport, duration_ms: u64) -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "total_products": report.product_count,
        "total_options": report.option_count,
        "duration_ms": duration_ms,
        "details": report.details,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_response_carries_per_step_details() {
        let report = SyncReport {
            success: true,
            product_count: 12,
            option_count: 34,
            details: vec![
                "12 products upserted".into(),
                "34 option values upserted".into(),
            ],
            errors: Vec::new(),
        };
        let body = success_body(&report, 250);
        assert_eq!(body["total_products"], 12);
        assert_eq!(body["total_options"], 34);
        assert_eq!(body["duration_ms"], 250);
        assert_eq!(body["details"].as_array().unwrap().len(), 2);
    }
}
