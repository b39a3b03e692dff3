//! Admin surface
//!
//! Bearer-token gated CRUD over tenants and product visibility. An
//! unconfigured ADMIN_TOKEN fails closed: the whole surface answers
//! with a configuration error.

pub mod tenants;
pub mod visibility;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use shared::error::AppError;

use crate::state::AppState;

pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let Some(token) = state.admin_token.as_deref() else {
        tracing::error!("ADMIN_TOKEN not configured, admin surface disabled");
        return AppError::configuration("ADMIN_TOKEN not configured").into_response();
    };

    let authorized = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|t| t == token);

    if !authorized {
        tracing::warn!(path = %req.uri().path(), "Admin request rejected");
        return AppError::unauthorized().into_response();
    }

    next.run(req).await
}
