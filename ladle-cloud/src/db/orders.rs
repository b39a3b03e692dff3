use shared::models::order::{Order, OrderItem};
use sqlx::types::Json;
use sqlx::PgPool;

/// Row to insert for a freshly priced order
pub struct NewOrder<'a> {
    pub tenant_id: &'a str,
    pub customer_name: &'a str,
    pub customer_email: &'a str,
    pub customer_phone: &'a str,
    pub order_type: &'a str,
    pub delivery_address: Option<Json<&'a shared::models::order::DeliveryAddress>>,
    pub delivery_zone_id: Option<&'a str>,
    pub items: &'a [OrderItem],
    pub subtotal_cents: i64,
    pub delivery_fee_cents: i64,
    pub total_cents: i64,
    pub payment_status: &'a str,
    pub payment_method: &'a str,
    pub customer_notes: Option<&'a str>,
    pub tracking_token: &'a str,
}

/// Insert a pending order; the sequence assigns the order number
pub async fn insert(
    pool: &PgPool,
    id: &str,
    order: &NewOrder<'_>,
    now: i64,
) -> Result<i64, sqlx::Error> {
    let (order_number,): (i64,) = sqlx::query_as(
        "INSERT INTO orders
             (id, tenant_id, customer_name, customer_email, customer_phone, order_type,
              delivery_address, delivery_zone_id, items, subtotal_cents, delivery_fee_cents,
              discount_cents, total_cents, status, payment_status, payment_method,
              customer_notes, tracking_token, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 0, $12,
                 'pending', $13, $14, $15, $16, $17, $17)
         RETURNING order_number",
    )
    .bind(id)
    .bind(order.tenant_id)
    .bind(order.customer_name)
    .bind(order.customer_email)
    .bind(order.customer_phone)
    .bind(order.order_type)
    .bind(&order.delivery_address)
    .bind(order.delivery_zone_id)
    .bind(Json(order.items))
    .bind(order.subtotal_cents)
    .bind(order.delivery_fee_cents)
    .bind(order.total_cents)
    .bind(order.payment_status)
    .bind(order.payment_method)
    .bind(order.customer_notes)
    .bind(order.tracking_token)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(order_number)
}

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Unauthenticated tracking lookup by unguessable token
pub async fn find_by_tracking_token(
    pool: &PgPool,
    token: &str,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE tracking_token = $1")
        .bind(token)
        .fetch_optional(pool)
        .await
}

/// Record the POS-side order id after a successful relay
pub async fn set_pos_order_id(
    pool: &PgPool,
    order_id: &str,
    pos_order_id: &str,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE orders SET pos_order_id = $2, updated_at = $3 WHERE id = $1")
        .bind(order_id)
        .bind(pos_order_id)
        .bind(now)
        .execute(pool)
        .await?;
    Ok(())
}

/// Apply a POS status update, correlating by the relayed order id.
/// Returns the local order id when a row matched.
pub async fn update_status_by_pos_order_id(
    pool: &PgPool,
    pos_order_id: &str,
    status: &str,
    now: i64,
) -> Result<Option<String>, sqlx::Error> {
    let row: Option<(String,)> = sqlx::query_as(
        "UPDATE orders SET status = $2, updated_at = $3 WHERE pos_order_id = $1 RETURNING id",
    )
    .bind(pos_order_id)
    .bind(status)
    .bind(now)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|(id,)| id))
}

/// Apply a payment outcome; `status` additionally moves the order when
/// the payment event implies it (paid -> confirmed, refund -> cancelled)
pub async fn set_payment_outcome(
    pool: &PgPool,
    order_id: &str,
    payment_status: &str,
    status: Option<&str>,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE orders SET
             payment_status = $2,
             status = COALESCE($3, status),
             updated_at = $4
         WHERE id = $1",
    )
    .bind(order_id)
    .bind(payment_status)
    .bind(status)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}
