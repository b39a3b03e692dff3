use axum::extract::State;
use shared::ApiResponse;

use crate::state::AppState;

/// Liveness + DB reachability check
pub async fn health_check(State(state): State<AppState>) -> ApiResponse<serde_json::Value> {
    let db_ok = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();
    ApiResponse::success(serde_json::json!({
        "status": if db_ok { "ok" } else { "degraded" },
        "database": db_ok,
    }))
}
