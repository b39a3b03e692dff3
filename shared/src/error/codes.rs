//! Error codes shared across the platform
//!
//! Codes are plain `u16` values for efficient serialization and for
//! stable contracts with the storefront frontend.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Auth / Signature ====================
    /// Caller is not authenticated
    NotAuthenticated = 1001,
    /// Webhook or cron signature/token did not verify
    InvalidSignature = 1002,

    // ==================== 3xxx: Tenant ====================
    /// Tenant not found or inactive
    TenantNotFound = 3001,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Submitted cart has no items
    EmptyCart = 4002,
    /// No active delivery zone covers the address
    DeliveryZoneUnavailable = 4003,
    /// Cart subtotal below the zone's minimum order amount
    MinimumOrderNotReached = 4004,

    // ==================== 5xxx: Payment ====================
    /// Payment-intent creation with the processor failed
    PaymentSetupFailed = 5001,

    // ==================== 6xxx: Catalog ====================
    /// Catalog product not found
    ProductNotFound = 6001,
    /// Catalog sync failed
    CatalogSyncFailed = 6002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Required configuration (secret/env) missing at operation time
    ConfigurationError = 9003,
}

impl ErrorCode {
    /// Numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Default human-readable message
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::InvalidRequest => "Invalid request",
            Self::NotAuthenticated => "Authentication required",
            Self::InvalidSignature => "Invalid signature",
            Self::TenantNotFound => "Tenant not found",
            Self::OrderNotFound => "Order not found",
            Self::EmptyCart => "Cart is empty",
            Self::DeliveryZoneUnavailable => "Delivery zone not available for this address",
            Self::MinimumOrderNotReached => "Minimum order amount not reached",
            Self::PaymentSetupFailed => "Payment setup failed",
            Self::ProductNotFound => "Product not found",
            Self::CatalogSyncFailed => "Catalog sync failed",
            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::ConfigurationError => "Server configuration error",
        }
    }

    /// HTTP status the API boundary maps this code to
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,
            Self::ValidationFailed | Self::InvalidRequest | Self::EmptyCart => {
                StatusCode::BAD_REQUEST
            }
            Self::NotAuthenticated | Self::InvalidSignature => StatusCode::UNAUTHORIZED,
            Self::NotFound
            | Self::TenantNotFound
            | Self::OrderNotFound
            | Self::ProductNotFound => StatusCode::NOT_FOUND,
            Self::DeliveryZoneUnavailable | Self::MinimumOrderNotReached => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::PaymentSetupFailed => StatusCode::BAD_GATEWAY,
            Self::Unknown
            | Self::CatalogSyncFailed
            | Self::InternalError
            | Self::DatabaseError
            | Self::ConfigurationError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// System-level errors get logged at the boundary before conversion
    pub fn is_system(&self) -> bool {
        matches!(
            self,
            Self::InternalError | Self::DatabaseError | Self::ConfigurationError
        )
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> u16 {
        code.code()
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = u16;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Success),
            1 => Ok(Self::Unknown),
            2 => Ok(Self::ValidationFailed),
            3 => Ok(Self::NotFound),
            5 => Ok(Self::InvalidRequest),
            1001 => Ok(Self::NotAuthenticated),
            1002 => Ok(Self::InvalidSignature),
            3001 => Ok(Self::TenantNotFound),
            4001 => Ok(Self::OrderNotFound),
            4002 => Ok(Self::EmptyCart),
            4003 => Ok(Self::DeliveryZoneUnavailable),
            4004 => Ok(Self::MinimumOrderNotReached),
            5001 => Ok(Self::PaymentSetupFailed),
            6001 => Ok(Self::ProductNotFound),
            6002 => Ok(Self::CatalogSyncFailed),
            9001 => Ok(Self::InternalError),
            9002 => Ok(Self::DatabaseError),
            9003 => Ok(Self::ConfigurationError),
            other => Err(other),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_u16() {
        for code in [
            ErrorCode::Success,
            ErrorCode::TenantNotFound,
            ErrorCode::MinimumOrderNotReached,
            ErrorCode::InvalidSignature,
            ErrorCode::ConfigurationError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
        assert!(ErrorCode::try_from(12345).is_err());
    }

    #[test]
    fn business_rejections_are_unprocessable() {
        assert_eq!(
            ErrorCode::MinimumOrderNotReached.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::DeliveryZoneUnavailable.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
