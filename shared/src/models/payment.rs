//! Payment model
//!
//! Created alongside an order when the payment method requires online
//! capture; lifetime-bound to its order and mutated only by
//! payment-webhook handling.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    /// Payment processor identifier, e.g. "stripe"
    pub provider: String,
    /// Processor-side payment id (payment-intent id)
    pub provider_payment_id: String,
    pub amount_cents: i64,
    /// "pending" | "succeeded" | "failed" | "refunded"
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}
