//! API routes for ladle-cloud

pub mod admin;
pub mod health;
pub mod menu;
pub mod orders;
pub mod pos_webhook;
pub mod stripe_webhook;
pub mod sync;
pub mod tenant;

use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Storefront-facing routes (no auth; tenant context via query/header)
    let storefront = Router::new()
        .route("/api/tenant/resolve", get(tenant::resolve_tenant))
        .route("/api/menu", get(menu::get_menu))
        .route("/api/delivery-zones", get(menu::get_delivery_zones))
        .route(
            "/api/products/{product_id}/options",
            get(menu::get_product_options),
        )
        .route("/api/orders", post(orders::create_order))
        .route("/api/orders/track/{token}", get(orders::track_order));

    // Webhooks (signature-verified, raw body)
    let webhooks = Router::new()
        .route("/webhooks/pos", post(pos_webhook::handle_webhook))
        .route("/webhooks/stripe", post(stripe_webhook::handle_webhook));

    // Cron entry point (Bearer CRON_SECRET)
    let cron = Router::new().route("/cron/sync-catalog", get(sync::run_catalog_sync));

    // Admin surface (Bearer ADMIN_TOKEN)
    let admin = Router::new()
        .route(
            "/api/admin/tenants",
            get(admin::tenants::list_tenants).post(admin::tenants::create_tenant),
        )
        .route(
            "/api/admin/tenants/{tenant_id}",
            get(admin::tenants::get_tenant)
                .patch(admin::tenants::update_tenant)
                .delete(admin::tenants::deactivate_tenant),
        )
        .route(
            "/api/admin/products/visibility",
            post(admin::visibility::set_visibility),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin::admin_auth_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(storefront)
        .merge(webhooks)
        .merge(cron)
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        // The storefront frontend is served from tenant domains
        .layer(CorsLayer::permissive())
        .with_state(state)
}
