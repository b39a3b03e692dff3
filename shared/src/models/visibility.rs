//! Per-tenant product visibility override
//!
//! Composite key `(product_id, tenant_id)`. Rows are only ever created
//! by an explicit admin action — catalog sync must never imply them.
//! Absence of a row means the product is not shown for that tenant.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductVisibility {
    pub product_id: String,
    pub tenant_id: String,
    pub is_visible: bool,
}
