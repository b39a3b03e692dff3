use shared::models::zone::DeliveryZone;
use sqlx::PgPool;

/// First active zone covering the zipcode wins; insertion order breaks
/// ties between overlapping zones.
pub async fn find_zone_for_zipcode(
    pool: &PgPool,
    tenant_id: &str,
    zipcode: &str,
) -> Result<Option<DeliveryZone>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM delivery_zones
         WHERE tenant_id = $1 AND is_active = TRUE AND $2 = ANY(zipcodes)
         ORDER BY id LIMIT 1",
    )
    .bind(tenant_id)
    .bind(zipcode)
    .fetch_optional(pool)
    .await
}

/// Active zones for the tenant, in match-priority order
pub async fn list_for_tenant(
    pool: &PgPool,
    tenant_id: &str,
) -> Result<Vec<DeliveryZone>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM delivery_zones WHERE tenant_id = $1 AND is_active = TRUE ORDER BY id",
    )
    .bind(tenant_id)
    .fetch_all(pool)
    .await
}
