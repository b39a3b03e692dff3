//! Shared domain types for the Ladle storefront platform
//!
//! Everything the server and tooling need to agree on:
//! - [`models`]: tenant, catalog, delivery zone, order and payment records
//! - [`cart`]: the pure cart/pricing engine
//! - [`error`]: unified error codes and the API response envelope
//!
//! Enable the `db` feature to derive `sqlx::FromRow` on the models.

pub mod cart;
pub mod error;
pub mod models;
pub mod util;

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
