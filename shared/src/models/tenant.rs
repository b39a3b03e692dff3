//! Tenant model
//!
//! One branded storefront (restaurant or content-only landing) sharing
//! the platform. Resolved by domain in production, by slug in
//! development. Soft-deleted by flipping `is_active`.

use serde::{Deserialize, Serialize};

/// Tenant kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TenantType {
    #[default]
    Restaurant,
    Landing,
}

impl TenantType {
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Restaurant => "restaurant",
            Self::Landing => "landing",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "restaurant" => Some(Self::Restaurant),
            "landing" => Some(Self::Landing),
            _ => None,
        }
    }
}

/// Per-tenant branding shown by the storefront shell
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TenantBranding {
    #[serde(default)]
    pub logo_url: String,
    #[serde(default)]
    pub primary_color: String,
    #[serde(default)]
    pub secondary_color: String,
    #[serde(default)]
    pub font_family: String,
}

/// Typed tenant settings with an explicit escape hatch
///
/// Recognized keys are enumerated fields; anything else lands in
/// `extra` so new frontend settings can ship without a schema change.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TenantSettings {
    /// Accept online card payments
    #[serde(default)]
    pub online_payment_enabled: bool,
    /// Accept cash on delivery/pickup
    #[serde(default = "default_true")]
    pub cash_payment_enabled: bool,
    /// Free-form opening-hours text shown on the storefront
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<String>,
    /// Forward-compatible extension point; unrecognized keys collect here
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_true() -> bool {
    true
}

/// Tenant entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Tenant {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub domain: String,
    /// "restaurant" | "landing"
    pub tenant_type: String,
    /// POS restaurant identifier (webhook envelope correlation)
    pub pos_restaurant_id: i64,
    /// POS catalog identifier, when the tenant carries its own catalog
    pub pos_catalog_id: Option<String>,
    /// Virtual brand name under which orders are relayed to the POS;
    /// relay is skipped when absent
    pub pos_virtual_brand_name: Option<String>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub branding: TenantBranding,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub settings: TenantSettings,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create tenant payload (admin)
#[derive(Debug, Clone, Deserialize)]
pub struct TenantCreate {
    pub slug: String,
    pub name: String,
    pub domain: String,
    pub tenant_type: TenantType,
    pub pos_restaurant_id: i64,
    pub pos_catalog_id: Option<String>,
    pub pos_virtual_brand_name: Option<String>,
    #[serde(default)]
    pub branding: TenantBranding,
    #[serde(default)]
    pub settings: TenantSettings,
    #[serde(default)]
    pub sort_order: i32,
}

/// Update tenant payload (admin); absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TenantUpdate {
    pub name: Option<String>,
    pub domain: Option<String>,
    pub pos_restaurant_id: Option<i64>,
    pub pos_catalog_id: Option<String>,
    pub pos_virtual_brand_name: Option<String>,
    pub branding: Option<TenantBranding>,
    pub settings: Option<TenantSettings>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_unknown_keys_collect_in_extra() {
        let json = r#"{
            "online_payment_enabled": true,
            "loyalty_banner": "two for one tuesdays"
        }"#;
        let settings: TenantSettings = serde_json::from_str(json).unwrap();
        assert!(settings.online_payment_enabled);
        assert!(settings.cash_payment_enabled);
        assert_eq!(
            settings.extra.get("loyalty_banner").unwrap(),
            "two for one tuesdays"
        );
    }

    #[test]
    fn tenant_type_db_roundtrip() {
        assert_eq!(TenantType::parse("restaurant"), Some(TenantType::Restaurant));
        assert_eq!(TenantType::parse("landing"), Some(TenantType::Landing));
        assert_eq!(TenantType::parse("popup"), None);
        assert_eq!(TenantType::Restaurant.as_db(), "restaurant");
    }
}
