//! Unified error system for the Ladle platform
//!
//! - [`ErrorCode`]: standardized error codes for all error types
//! - [`AppError`]: rich error type with codes, messages and details
//! - [`ApiResponse`]: unified API response envelope
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication / signature errors
//! - 3xxx: Tenant errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Catalog errors
//! - 9xxx: System errors

mod codes;
mod types;

pub use codes::ErrorCode;
pub use types::{ApiResponse, AppError, AppResult};
