//! Database access layer
//!
//! One module per table, plain `sqlx::query`/`query_as` with positional
//! binds. Row types live in `shared::models` so the storefront and the
//! server speak the same shapes.

pub mod catalog;
pub mod orders;
pub mod payments;
pub mod tenants;
pub mod webhook_events;
pub mod zones;

/// Generate a fresh entity id
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
