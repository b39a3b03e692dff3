use shared::models::product::{CatalogOption, CatalogProduct, NewCatalogOption, NewCatalogProduct};
use sqlx::PgPool;

// Every sync-owned column appears in both the VALUES list and the
// conflict SET list; a column missing from the SET list keeps its
// first-sync value forever.
const UPSERT_PRODUCT_SQL: &str = "INSERT INTO catalog_products
         (id, pos_id, pos_type, name, description, image_url, price_cents, tax_rate,
          is_available, is_active, category_ids, sort_order, synced_at)
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
     ON CONFLICT (pos_id) DO UPDATE SET
         pos_type = EXCLUDED.pos_type,
         name = EXCLUDED.name,
         description = EXCLUDED.description,
         image_url = EXCLUDED.image_url,
         price_cents = EXCLUDED.price_cents,
         tax_rate = EXCLUDED.tax_rate,
         is_available = EXCLUDED.is_available,
         is_active = EXCLUDED.is_active,
         category_ids = EXCLUDED.category_ids,
         sort_order = EXCLUDED.sort_order,
         synced_at = EXCLUDED.synced_at
     RETURNING id";

const UPSERT_OPTION_SQL: &str = "INSERT INTO catalog_options
         (id, pos_id, name, price_cents, is_available, option_group_name,
          option_type, sort_order)
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
     ON CONFLICT (pos_id) DO UPDATE SET
         name = EXCLUDED.name,
         price_cents = EXCLUDED.price_cents,
         is_available = EXCLUDED.is_available,
         option_group_name = EXCLUDED.option_group_name,
         option_type = EXCLUDED.option_type,
         sort_order = EXCLUDED.sort_order
     RETURNING id";

/// Upsert a synced product by `pos_id`, returning the internal id
pub async fn upsert_product(
    pool: &PgPool,
    id: &str,
    product: &NewCatalogProduct,
    now: i64,
) -> Result<String, sqlx::Error> {
    let (internal_id,): (String,) = sqlx::query_as(UPSERT_PRODUCT_SQL)
        .bind(id)
        .bind(&product.pos_id)
        .bind(&product.pos_type)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.image_url)
        .bind(product.price_cents)
        .bind(product.tax_rate)
        .bind(product.is_available)
        .bind(product.is_active)
        .bind(&product.category_ids)
        .bind(product.sort_order)
        .bind(now)
        .fetch_one(pool)
        .await?;
    Ok(internal_id)
}

/// Upsert a synced option value by `pos_id`; parent product is resolved
/// afterwards by [`link_options`]
pub async fn upsert_option(
    pool: &PgPool,
    id: &str,
    option: &NewCatalogOption,
) -> Result<String, sqlx::Error> {
    let (internal_id,): (String,) = sqlx::query_as(UPSERT_OPTION_SQL)
    .bind(id)
    .bind(&option.pos_id)
    .bind(&option.name)
    .bind(option.price_cents)
    .bind(option.is_available)
    .bind(&option.option_group_name)
    .bind(&option.option_type)
    .bind(option.sort_order)
    .fetch_one(pool)
    .await?;
    Ok(internal_id)
}

/// Link pass: attach already-upserted option values to their product
pub async fn link_options(
    pool: &PgPool,
    product_id: &str,
    option_pos_ids: &[String],
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE catalog_options SET product_id = $1 WHERE pos_id = ANY($2)")
        .bind(product_id)
        .bind(option_pos_ids)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Flip product availability by POS id; false when no such product
pub async fn set_product_availability(
    pool: &PgPool,
    pos_id: &str,
    is_available: bool,
    now: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE catalog_products SET is_available = $2, synced_at = $3 WHERE pos_id = $1",
    )
    .bind(pos_id)
    .bind(is_available)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Flip option availability by POS id; false when no such option
pub async fn set_option_availability(
    pool: &PgPool,
    pos_id: &str,
    is_available: bool,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE catalog_options SET is_available = $2 WHERE pos_id = $1")
        .bind(pos_id)
        .bind(is_available)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Products exposed to one tenant: active, with an explicit visible row
pub async fn list_visible_products(
    pool: &PgPool,
    tenant_id: &str,
) -> Result<Vec<CatalogProduct>, sqlx::Error> {
    sqlx::query_as(
        "SELECT p.* FROM catalog_products p
         JOIN product_visibility v ON v.product_id = p.id
         WHERE v.tenant_id = $1 AND v.is_visible = TRUE AND p.is_active = TRUE
         ORDER BY p.sort_order, p.name",
    )
    .bind(tenant_id)
    .fetch_all(pool)
    .await
}

pub async fn find_product(
    pool: &PgPool,
    product_id: &str,
) -> Result<Option<CatalogProduct>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM catalog_products WHERE id = $1")
        .bind(product_id)
        .fetch_optional(pool)
        .await
}

/// Available option values for a product, grouped for display
pub async fn list_options_for_product(
    pool: &PgPool,
    product_id: &str,
) -> Result<Vec<CatalogOption>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM catalog_options
         WHERE product_id = $1 AND is_available = TRUE
         ORDER BY option_group_name, sort_order, name",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await
}

/// Set (or create) a tenant's visibility row for a product
pub async fn set_visibility(
    pool: &PgPool,
    product_id: &str,
    tenant_id: &str,
    is_visible: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO product_visibility (product_id, tenant_id, is_visible)
         VALUES ($1, $2, $3)
         ON CONFLICT (product_id, tenant_id) DO UPDATE SET is_visible = EXCLUDED.is_visible",
    )
    .bind(product_id)
    .bind(tenant_id)
    .bind(is_visible)
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_upsert_refreshes_every_synced_column() {
        for col in [
            "pos_type",
            "name",
            "description",
            "image_url",
            "price_cents",
            "tax_rate",
            "is_available",
            "is_active",
            "category_ids",
            "sort_order",
            "synced_at",
        ] {
            assert!(
                UPSERT_PRODUCT_SQL.contains(&format!("{col} = EXCLUDED.{col}")),
                "{col} would freeze at its first synced value"
            );
        }
    }

    #[test]
    fn option_upsert_refreshes_every_synced_column() {
        for col in [
            "name",
            "price_cents",
            "is_available",
            "option_group_name",
            "option_type",
            "sort_order",
        ] {
            assert!(
                UPSERT_OPTION_SQL.contains(&format!("{col} = EXCLUDED.{col}")),
                "{col} would freeze at its first synced value"
            );
        }
    }
}
