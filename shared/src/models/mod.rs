//! Domain models
//!
//! Records mirror the relational schema; enums carry `as_db`/`parse`
//! helpers because status columns are stored as plain text.

pub mod order;
pub mod payment;
pub mod product;
pub mod tenant;
pub mod visibility;
pub mod zone;

pub use order::{
    CreateOrderRequest, DeliveryAddress, Order, OrderItem, OrderItemOption, OrderStatus,
    OrderType, PaymentMethod, PaymentStatus,
};
pub use payment::Payment;
pub use product::{CatalogOption, CatalogProduct, NewCatalogOption, NewCatalogProduct};
pub use tenant::{Tenant, TenantBranding, TenantCreate, TenantSettings, TenantType, TenantUpdate};
pub use visibility::ProductVisibility;
pub use zone::{DeliveryQuote, DeliveryZone};
