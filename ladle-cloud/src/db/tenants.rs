use shared::models::tenant::{Tenant, TenantCreate, TenantUpdate};
use sqlx::types::Json;
use sqlx::PgPool;

pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Tenant>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM tenants WHERE slug = $1 AND is_active = TRUE")
        .bind(slug)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_domain(pool: &PgPool, domain: &str) -> Result<Option<Tenant>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM tenants WHERE domain = $1 AND is_active = TRUE")
        .bind(domain)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Tenant>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM tenants WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Correlate a POS webhook envelope with a tenant
pub async fn find_by_pos_restaurant_id(
    pool: &PgPool,
    pos_restaurant_id: i64,
) -> Result<Option<Tenant>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM tenants
         WHERE pos_restaurant_id = $1 AND is_active = TRUE
         ORDER BY sort_order LIMIT 1",
    )
    .bind(pos_restaurant_id)
    .fetch_optional(pool)
    .await
}

pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<Tenant>, sqlx::Error> {
    if include_inactive {
        sqlx::query_as("SELECT * FROM tenants ORDER BY sort_order, slug")
            .fetch_all(pool)
            .await
    } else {
        sqlx::query_as(
            "SELECT * FROM tenants WHERE is_active = TRUE ORDER BY sort_order, slug",
        )
        .fetch_all(pool)
        .await
    }
}

pub async fn create(
    pool: &PgPool,
    id: &str,
    data: &TenantCreate,
    now: i64,
) -> Result<Tenant, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO tenants
             (id, slug, name, domain, tenant_type, pos_restaurant_id, pos_catalog_id,
              pos_virtual_brand_name, branding, settings, sort_order, is_active,
              created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, TRUE, $12, $12)
         RETURNING *",
    )
    .bind(id)
    .bind(&data.slug)
    .bind(&data.name)
    .bind(&data.domain)
    .bind(data.tenant_type.as_db())
    .bind(data.pos_restaurant_id)
    .bind(&data.pos_catalog_id)
    .bind(&data.pos_virtual_brand_name)
    .bind(Json(&data.branding))
    .bind(Json(&data.settings))
    .bind(data.sort_order)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Partial update: absent fields keep their current value
pub async fn update(
    pool: &PgPool,
    id: &str,
    data: &TenantUpdate,
    now: i64,
) -> Result<Option<Tenant>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE tenants SET
             name = COALESCE($2, name),
             domain = COALESCE($3, domain),
             pos_restaurant_id = COALESCE($4, pos_restaurant_id),
             pos_catalog_id = COALESCE($5, pos_catalog_id),
             pos_virtual_brand_name = COALESCE($6, pos_virtual_brand_name),
             branding = COALESCE($7, branding),
             settings = COALESCE($8, settings),
             sort_order = COALESCE($9, sort_order),
             is_active = COALESCE($10, is_active),
             updated_at = $11
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.domain)
    .bind(data.pos_restaurant_id)
    .bind(&data.pos_catalog_id)
    .bind(&data.pos_virtual_brand_name)
    .bind(data.branding.as_ref().map(Json))
    .bind(data.settings.as_ref().map(Json))
    .bind(data.sort_order)
    .bind(data.is_active)
    .bind(now)
    .fetch_optional(pool)
    .await
}

/// Soft delete: the tenant stops resolving but its orders stay intact
pub async fn deactivate(pool: &PgPool, id: &str, now: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE tenants SET is_active = FALSE, updated_at = $2 WHERE id = $1")
        .bind(id)
        .bind(now)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
