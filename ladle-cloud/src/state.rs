//! Application state for ladle-cloud

use aws_sdk_sesv2::Client as SesClient;
use sqlx::PgPool;

use crate::config::Config;
use crate::pos::PosClient;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// POS API client (catalog pull + order relay)
    pub pos: PosClient,
    /// AWS SES client for sending emails
    pub ses: SesClient,
    /// Shared secret for POS webhook HMAC signatures
    pub pos_webhook_secret: Option<String>,
    /// Global catalog identifier pulled by catalog sync
    pub pos_global_catalog_id: Option<String>,
    /// POS product id carrying the delivery fee as an order line
    pub pos_delivery_fee_product_id: Option<i64>,
    /// Stripe secret key
    pub stripe_secret_key: Option<String>,
    /// Stripe webhook signing secret
    pub stripe_webhook_secret: Option<String>,
    /// Bearer token gating the cron sync endpoint
    pub cron_secret: Option<String>,
    /// Bearer token gating the admin surface
    pub admin_token: Option<String>,
    /// Tenant slug used when no domain matches
    pub default_tenant_slug: String,
    /// ISO currency code for payment intents
    pub currency: String,
    /// SES sender email address
    pub ses_from_email: String,
}

impl AppState {
    /// Create a new AppState
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let ses = if let Ok(ses_region) = std::env::var("SES_REGION") {
            let ses_config = aws_config
                .to_builder()
                .region(aws_config::Region::new(ses_region))
                .build();
            SesClient::new(&ses_config)
        } else {
            SesClient::new(&aws_config)
        };

        let pos = PosClient::new(
            config.pos_api_base_url.clone(),
            config.pos_api_key.clone(),
        );

        Ok(Self {
            pool,
            pos,
            ses,
            pos_webhook_secret: config.pos_webhook_secret.clone(),
            pos_global_catalog_id: config.pos_global_catalog_id.clone(),
            pos_delivery_fee_product_id: config.pos_delivery_fee_product_id,
            stripe_secret_key: config.stripe_secret_key.clone(),
            stripe_webhook_secret: config.stripe_webhook_secret.clone(),
            cron_secret: config.cron_secret.clone(),
            admin_token: config.admin_token.clone(),
            default_tenant_slug: config.default_tenant_slug.clone(),
            currency: config.currency.clone(),
            ses_from_email: config.ses_from_email.clone(),
        })
    }
}
