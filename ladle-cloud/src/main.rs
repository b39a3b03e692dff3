//! ladle-cloud — multi-tenant storefront backend
//!
//! Long-running service that:
//! - Resolves branded storefront tenants (domain/slug)
//! - Mirrors the POS catalog into a local cache and serves menus
//! - Prices and persists orders, relays them to the POS
//! - Reconciles POS and payment webhooks back onto local state
//! - Exposes a token-gated admin surface (tenants, visibility)

mod api;
mod config;
mod db;
mod email;
mod error;
mod orders;
mod pos;
mod state;
mod stripe;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ladle_cloud=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting ladle-cloud (env: {})", config.environment);

    // Initialize application state
    let state = AppState::new(&config).await?;

    // Optional in-process catalog sync, for deployments without an
    // external cron hitting /cron/sync-catalog
    if config.catalog_sync_interval_secs > 0 {
        let sync_state = state.clone();
        let interval_secs = config.catalog_sync_interval_secs;
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(std::time::Duration::from_secs(interval_secs));
            loop {
                interval.tick().await;
                let report = pos::sync::sync_catalog(&sync_state).await;
                if !report.success {
                    tracing::error!(errors = ?report.errors, "Scheduled catalog sync failed");
                }
            }
        });
        tracing::info!(interval_secs, "In-process catalog sync scheduled");
    }

    let app = api::create_router(state);

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("ladle-cloud HTTP listening on {http_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
