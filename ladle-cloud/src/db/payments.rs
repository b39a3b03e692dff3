use shared::models::payment::Payment;
use sqlx::PgPool;

/// Record a fresh `pending` payment row, returning it for logging
pub async fn insert(
    pool: &PgPool,
    id: &str,
    order_id: &str,
    provider: &str,
    provider_payment_id: &str,
    amount_cents: i64,
    now: i64,
) -> Result<Payment, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO payments
             (id, order_id, provider, provider_payment_id, amount_cents, status,
              created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, 'pending', $6, $6)
         RETURNING *",
    )
    .bind(id)
    .bind(order_id)
    .bind(provider)
    .bind(provider_payment_id)
    .bind(amount_cents)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Apply a processor-side status change, correlating by the processor's
/// payment id. Returns the owning order id when a row matched.
pub async fn update_status_by_provider_payment_id(
    pool: &PgPool,
    provider_payment_id: &str,
    status: &str,
    now: i64,
) -> Result<Option<String>, sqlx::Error> {
    let row: Option<(String,)> = sqlx::query_as(
        "UPDATE payments SET status = $2, updated_at = $3
         WHERE provider_payment_id = $1
         RETURNING order_id",
    )
    .bind(provider_payment_id)
    .bind(status)
    .bind(now)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|(order_id,)| order_id))
}
