//! Catalog sync
//!
//! Pulls the global POS catalog and refreshes the local cache:
//!
//! 1. fetch the full catalog (products, option groups, option values)
//! 2. normalize products and upsert them by `pos_id`
//! 3. normalize option values and upsert them by `pos_id`
//! 4. link pass: attach option values to their products
//!
//! Visibility rows are deliberately never touched here; exposing a
//! product to a tenant is an explicit admin action.

use std::collections::HashMap;

use serde::Serialize;
use shared::models::product::{NewCatalogOption, NewCatalogProduct};
use shared::util::now_millis;

use crate::db;
use crate::state::AppState;

use super::types::{RawCatalog, RawCatalogItem, RawOptionGroup, RawOptionValue};

/// Outcome of one sync run
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub success: bool,
    pub product_count: usize,
    pub option_count: usize,
    /// Per-step summaries of a completed run
    pub details: Vec<String>,
    pub errors: Vec<String>,
}

impl SyncReport {
    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            product_count: 0,
            option_count: 0,
            details: Vec::new(),
            errors: vec![error.into()],
        }
    }
}

/// Strip the alphabetic id prefix the catalog API adds ("ZD1794498" -> "1794498")
pub fn strip_pos_prefix(raw: &str) -> String {
    raw.trim_start_matches(|c: char| c.is_ascii_alphabetic())
        .to_string()
}

/// Canonical POS id of a catalog entry: prefixed `id` first, `internal_id` as fallback
fn pos_id_of(id: &Option<String>, internal_id: &Option<String>) -> Option<String> {
    id.as_deref()
        .map(strip_pos_prefix)
        .filter(|s| !s.is_empty())
        .or_else(|| internal_id.clone())
}

/// Normalize one catalog item; `None` when it carries no usable id or name
pub fn normalize_product(item: &RawCatalogItem) -> Option<NewCatalogProduct> {
    let pos_id = pos_id_of(&item.id, &item.internal_id)?;
    let name = item.name.clone().filter(|n| !n.is_empty())?;
    let available = !item.disabled && !item.disable;

    Some(NewCatalogProduct {
        pos_id,
        pos_type: if item.item_type.as_deref() == Some("menu") {
            "menu".into()
        } else {
            "dish".into()
        },
        name,
        description: item.description.clone().filter(|d| !d.is_empty()),
        image_url: item.image.clone().filter(|i| !i.is_empty()),
        price_cents: item.price.unwrap_or(0),
        // basis points -> percentage, VAT default when absent
        tax_rate: item.tax.unwrap_or(1000) as f64 / 100.0,
        is_available: available,
        is_active: available,
        category_ids: item.tag_ids.clone(),
        sort_order: item.sort_order.unwrap_or(0),
        option_pos_ids: item
            .option_value_ids
            .iter()
            .map(|id| strip_pos_prefix(id))
            .collect(),
    })
}

/// Group-id -> (name, type) lookup for option-value normalization
pub fn build_group_map(groups: &[RawOptionGroup]) -> HashMap<String, (String, String)> {
    groups
        .iter()
        .filter_map(|g| {
            let key = g.id.clone().or_else(|| g.internal_id.clone())?;
            Some((
                key,
                (
                    g.name.clone().unwrap_or_else(|| "Options".into()),
                    g.group_type.clone().unwrap_or_else(|| "simple".into()),
                ),
            ))
        })
        .collect()
}

/// Normalize one option value; unknown groups fall back to a generic group
pub fn normalize_option(
    value: &RawOptionValue,
    groups: &HashMap<String, (String, String)>,
) -> Option<NewCatalogOption> {
    let pos_id = pos_id_of(&value.id, &value.internal_id)?;
    let name = value.name.clone().filter(|n| !n.is_empty())?;

    let (group_name, group_type) = value
        .option_id
        .as_ref()
        .and_then(|id| groups.get(id).cloned())
        .unwrap_or_else(|| ("Options".into(), "simple".into()));

    Some(NewCatalogOption {
        pos_id,
        name,
        price_cents: value.price.unwrap_or(0),
        is_available: !value.disabled && !value.outofstock,
        option_group_name: group_name,
        option_type: group_type,
        sort_order: value.sort_order.unwrap_or(0),
    })
}

/// Run a full catalog sync. Any failing step aborts the run; the cache
/// keeps its previous content (upserts are per-row, never deletes).
pub async fn sync_catalog(state: &AppState) -> SyncReport {
    let Some(catalog_id) = state.pos_global_catalog_id.as_deref() else {
        tracing::error!("POS_GLOBAL_CATALOG_ID not configured");
        return SyncReport::failed("POS_GLOBAL_CATALOG_ID not configured");
    };

    tracing::info!(catalog_id, "Starting global catalog sync");

    let catalog: RawCatalog = match state.pos.get_full_catalog(catalog_id).await {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "Catalog fetch failed");
            return SyncReport::failed(e.to_string());
        }
    };

    if catalog.items.is_empty() {
        tracing::error!("Catalog payload carried no products");
        return SyncReport::failed("Catalog payload carried no products");
    }

    let now = now_millis();
    let mut details: Vec<String> = Vec::new();

    // Products first; remember pos_id -> internal id for the link pass
    let mut product_ids: HashMap<String, String> = HashMap::new();
    let mut products: Vec<NewCatalogProduct> = Vec::new();
    for item in &catalog.items {
        if let Some(product) = normalize_product(item) {
            products.push(product);
        }
    }

    for product in &products {
        match db::catalog::upsert_product(&state.pool, &db::new_id(), product, now).await {
            Ok(internal_id) => {
                product_ids.insert(product.pos_id.clone(), internal_id);
            }
            Err(e) => {
                tracing::error!(pos_id = %product.pos_id, error = %e, "Product upsert failed");
                return SyncReport::failed(format!(
                    "Product upsert failed for {}: {e}",
                    product.pos_id
                ));
            }
        }
    }
    tracing::info!(count = products.len(), "Synced products");
    details.push(format!("{} products upserted", products.len()));

    // Option values
    let groups = build_group_map(&catalog.options);
    let mut option_count = 0usize;
    for value in &catalog.option_values {
        let Some(option) = normalize_option(value, &groups) else {
            continue;
        };
        if let Err(e) = db::catalog::upsert_option(&state.pool, &db::new_id(), &option).await {
            tracing::error!(pos_id = %option.pos_id, error = %e, "Option upsert failed");
            return SyncReport::failed(format!("Option upsert failed for {}: {e}", option.pos_id));
        }
        option_count += 1;
    }
    tracing::info!(count = option_count, "Synced option values");
    details.push(format!("{option_count} option values upserted"));

    // Link pass: products declare which option values belong to them
    let mut linked = 0usize;
    for product in &products {
        if product.option_pos_ids.is_empty() {
            continue;
        }
        let Some(internal_id) = product_ids.get(&product.pos_id) else {
            continue;
        };
        if let Err(e) =
            db::catalog::link_options(&state.pool, internal_id, &product.option_pos_ids).await
        {
            tracing::error!(pos_id = %product.pos_id, error = %e, "Option link failed");
            return SyncReport::failed(format!("Option link failed for {}: {e}", product.pos_id));
        }
        linked += 1;
    }
    details.push(format!("{linked} products linked to option values"));

    tracing::info!(
        products = products.len(),
        options = option_count,
        "Catalog sync complete"
    );

    SyncReport {
        success: true,
        product_count: products.len(),
        option_count,
        details,
        errors: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_stripping_is_generic() {
        assert_eq!(strip_pos_prefix("ZD1794498"), "1794498");
        assert_eq!(strip_pos_prefix("ZOV42"), "42");
        assert_eq!(strip_pos_prefix("1794498"), "1794498");
    }

    #[test]
    fn product_normalization_converts_tax_and_availability() {
        let item: RawCatalogItem = serde_json::from_str(
            r#"{
                "id": "ZD1794498",
                "type": "dish",
                "name": "Tacos XL",
                "price": 950,
                "tva": 1000,
                "disabled": false,
                "tag_ids": ["12"],
                "o": 3,
                "option_value_ids": ["ZOV7", "ZOV8"]
            }"#,
        )
        .unwrap();

        let product = normalize_product(&item).unwrap();
        assert_eq!(product.pos_id, "1794498");
        assert_eq!(product.tax_rate, 10.0);
        assert!(product.is_available);
        assert_eq!(product.sort_order, 3);
        assert_eq!(product.option_pos_ids, vec!["7", "8"]);
    }

    #[test]
    fn disabled_product_is_unavailable() {
        let item: RawCatalogItem =
            serde_json::from_str(r#"{"id": "ZD1", "name": "Old dish", "disabled": true}"#).unwrap();
        let product = normalize_product(&item).unwrap();
        assert!(!product.is_available);
        assert!(!product.is_active);
    }

    #[test]
    fn product_defaults_apply_when_fields_absent() {
        let item: RawCatalogItem =
            serde_json::from_str(r#"{"id": "ZD1", "name": "Plain"}"#).unwrap();
        let product = normalize_product(&item).unwrap();
        assert_eq!(product.price_cents, 0);
        assert_eq!(product.tax_rate, 10.0);
        assert_eq!(product.pos_type, "dish");
        assert!(product.category_ids.is_empty());
    }

    #[test]
    fn item_without_id_or_name_is_skipped() {
        let item: RawCatalogItem = serde_json::from_str(r#"{"name": "Ghost"}"#).unwrap();
        assert!(normalize_product(&item).is_none());
        let item: RawCatalogItem = serde_json::from_str(r#"{"id": "ZD1"}"#).unwrap();
        assert!(normalize_product(&item).is_none());
    }

    #[test]
    fn option_resolves_its_group_with_fallback() {
        let groups: Vec<RawOptionGroup> = serde_json::from_str(
            r#"[{"id": "5", "name": "Sauces", "type": "multiple"}]"#,
        )
        .unwrap();
        let map = build_group_map(&groups);

        let value: RawOptionValue = serde_json::from_str(
            r#"{"id": "ZOV7", "name": "Algérienne", "price": 0, "option_id": "5"}"#,
        )
        .unwrap();
        let option = normalize_option(&value, &map).unwrap();
        assert_eq!(option.pos_id, "7");
        assert_eq!(option.option_group_name, "Sauces");
        assert_eq!(option.option_type, "multiple");

        // unknown group falls back
        let value: RawOptionValue =
            serde_json::from_str(r#"{"id": "ZOV8", "name": "Extra", "option_id": "99"}"#).unwrap();
        let option = normalize_option(&value, &map).unwrap();
        assert_eq!(option.option_group_name, "Options");
        assert_eq!(option.option_type, "simple");
    }

    #[test]
    fn out_of_stock_option_is_unavailable() {
        let value: RawOptionValue =
            serde_json::from_str(r#"{"id": "ZOV8", "name": "Extra", "outofstock": true}"#).unwrap();
        let option = normalize_option(&value, &HashMap::new()).unwrap();
        assert!(!option.is_available);
    }

    #[test]
    fn normalization_is_deterministic() {
        let item: RawCatalogItem =
            serde_json::from_str(r#"{"id": "ZD1", "name": "Tacos", "price": 950}"#).unwrap();
        assert_eq!(normalize_product(&item), normalize_product(&item));
    }
}
