//! Catalog product and option models
//!
//! The catalog cache is global (not tenant-scoped); per-tenant exposure
//! is layered on top via `product_visibility`. Rows are created and
//! refreshed only by catalog sync, keyed on the unique `pos_id`;
//! availability is mutated by webhook reconciliation.

use serde::{Deserialize, Serialize};

/// Cached catalog product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CatalogProduct {
    pub id: String,
    /// POS identifier, unique; upserts key on it
    pub pos_id: String,
    /// "dish" | "menu"
    pub pos_type: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price_cents: i64,
    /// Percentage, e.g. 10.0 for 10% (POS sends basis points)
    pub tax_rate: f64,
    pub is_available: bool,
    pub is_active: bool,
    pub category_ids: Vec<String>,
    pub sort_order: i32,
    pub synced_at: i64,
}

/// Normalized product as produced by catalog sync, upserted by `pos_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCatalogProduct {
    pub pos_id: String,
    pub pos_type: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price_cents: i64,
    pub tax_rate: f64,
    pub is_available: bool,
    pub is_active: bool,
    pub category_ids: Vec<String>,
    pub sort_order: i32,
    /// POS option-value ids this product declares; resolved in the
    /// post-upsert link pass
    pub option_pos_ids: Vec<String>,
}

/// Cached catalog option value
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CatalogOption {
    pub id: String,
    /// Parent product; null until the sync link pass resolves it
    pub product_id: Option<String>,
    /// POS identifier, unique
    pub pos_id: String,
    pub name: String,
    pub price_cents: i64,
    pub is_available: bool,
    /// Display name of the option group this value belongs to
    pub option_group_name: String,
    /// Group type as reported by the POS ("simple", "multiple", ...)
    pub option_type: String,
    pub sort_order: i32,
}

/// Normalized option value as produced by catalog sync
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCatalogOption {
    pub pos_id: String,
    pub name: String,
    pub price_cents: i64,
    pub is_available: bool,
    pub option_group_name: String,
    pub option_type: String,
    pub sort_order: i32,
}
