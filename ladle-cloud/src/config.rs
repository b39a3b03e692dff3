//! Storefront server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Server configuration, loaded from environment variables.
///
/// Secrets are `Option`s on purpose: outside `development` they must be
/// set at startup, but a handler that depends on one still checks at
/// use time and fails closed for that operation only.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// POS API base URL (catalog + order relay)
    pub pos_api_base_url: Option<String>,
    /// POS API key
    pub pos_api_key: Option<String>,
    /// Shared secret for POS webhook HMAC signatures
    pub pos_webhook_secret: Option<String>,
    /// Global catalog identifier pulled by catalog sync
    pub pos_global_catalog_id: Option<String>,
    /// POS product id used to carry the delivery fee as an order line
    pub pos_delivery_fee_product_id: Option<i64>,
    /// Stripe secret key
    pub stripe_secret_key: Option<String>,
    /// Stripe webhook signing secret
    pub stripe_webhook_secret: Option<String>,
    /// Bearer token gating the cron sync endpoint
    pub cron_secret: Option<String>,
    /// Bearer token gating the admin surface
    pub admin_token: Option<String>,
    /// Tenant slug used when no domain matches (local/dev routing)
    pub default_tenant_slug: String,
    /// ISO currency code for payment intents
    pub currency: String,
    /// SES sender email address
    pub ses_from_email: String,
    /// In-process catalog sync interval in seconds (0 = external cron only)
    pub catalog_sync_interval_secs: u64,
}

impl Config {
    /// Require a secret env var: must be set and non-empty outside development.
    fn require_secret(name: &str, environment: &str) -> Result<Option<String>, BoxError> {
        match std::env::var(name).ok().filter(|s| !s.is_empty()) {
            Some(v) => Ok(Some(v)),
            None if environment == "development" => Ok(None),
            None => Err(format!("{name} must be set in {environment} environment").into()),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            pos_api_base_url: std::env::var("POS_API_BASE_URL")
                .ok()
                .filter(|s| !s.is_empty()),
            pos_api_key: Self::require_secret("POS_API_KEY", &environment)?,
            pos_webhook_secret: Self::require_secret("POS_WEBHOOK_SECRET", &environment)?,
            pos_global_catalog_id: std::env::var("POS_GLOBAL_CATALOG_ID")
                .ok()
                .filter(|s| !s.is_empty()),
            pos_delivery_fee_product_id: std::env::var("POS_DELIVERY_FEE_PRODUCT_ID")
                .ok()
                .and_then(|v| v.parse().ok()),
            stripe_secret_key: Self::require_secret("STRIPE_SECRET_KEY", &environment)?,
            stripe_webhook_secret: Self::require_secret("STRIPE_WEBHOOK_SECRET", &environment)?,
            cron_secret: Self::require_secret("CRON_SECRET", &environment)?,
            admin_token: Self::require_secret("ADMIN_TOKEN", &environment)?,
            default_tenant_slug: std::env::var("DEFAULT_TENANT_SLUG")
                .unwrap_or_else(|_| "tacobee".into()),
            currency: std::env::var("CURRENCY").unwrap_or_else(|_| "eur".into()),
            ses_from_email: std::env::var("SES_FROM_EMAIL")
                .unwrap_or_else(|_| "noreply@ladle.app".into()),
            catalog_sync_interval_secs: std::env::var("CATALOG_SYNC_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            environment,
        })
    }
}
