use sqlx::PgPool;

/// Record a webhook event id; returns false when already processed.
/// INSERT-first so retries and replays are filtered atomically.
pub async fn record(
    pool: &PgPool,
    event_id: &str,
    event_type: &str,
    now: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO processed_webhook_events (event_id, event_type, processed_at)
         VALUES ($1, $2, $3)
         ON CONFLICT (event_id) DO NOTHING",
    )
    .bind(event_id)
    .bind(event_type)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
