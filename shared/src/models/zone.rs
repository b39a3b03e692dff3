//! Delivery zone model and fee computation
//!
//! A tenant-defined postcode rule set controlling delivery eligibility
//! and fee. At most one active zone should match a given zipcode; the
//! first match wins.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorCode};

/// Delivery zone entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DeliveryZone {
    pub id: String,
    pub tenant_id: String,
    pub zipcodes: Vec<String>,
    pub cities: Vec<String>,
    pub min_order_cents: i64,
    pub delivery_fee_cents: i64,
    pub free_delivery_threshold_cents: i64,
    pub is_active: bool,
}

/// Outcome of pricing a delivery against a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeliveryQuote {
    pub delivery_fee_cents: i64,
}

impl DeliveryZone {
    /// Price a delivery for the given server-computed subtotal.
    ///
    /// Rejects below the zone minimum (with structured shortfall
    /// detail); the fee drops to zero at the free-delivery threshold.
    pub fn quote(&self, subtotal_cents: i64) -> Result<DeliveryQuote, AppError> {
        if subtotal_cents < self.min_order_cents {
            return Err(AppError::new(ErrorCode::MinimumOrderNotReached)
                .with_detail("min_order_cents", self.min_order_cents)
                .with_detail("current_cents", subtotal_cents)
                .with_detail("shortfall_cents", self.min_order_cents - subtotal_cents));
        }

        let delivery_fee_cents = if subtotal_cents >= self.free_delivery_threshold_cents {
            0
        } else {
            self.delivery_fee_cents
        };

        Ok(DeliveryQuote { delivery_fee_cents })
    }

    /// Whether this zone covers the given postal code
    pub fn covers_zipcode(&self, zipcode: &str) -> bool {
        self.is_active && self.zipcodes.iter().any(|z| z == zipcode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone() -> DeliveryZone {
        DeliveryZone {
            id: "z1".into(),
            tenant_id: "t1".into(),
            zipcodes: vec!["75001".into()],
            cities: vec!["Paris".into()],
            min_order_cents: 1500,
            delivery_fee_cents: 300,
            free_delivery_threshold_cents: 3000,
            is_active: true,
        }
    }

    #[test]
    fn fee_applies_between_minimum_and_threshold() {
        let quote = zone().quote(2000).unwrap();
        assert_eq!(quote.delivery_fee_cents, 300);
    }

    #[test]
    fn below_minimum_is_rejected_with_shortfall() {
        let err = zone().quote(1000).unwrap_err();
        assert_eq!(err.code, ErrorCode::MinimumOrderNotReached);
        let details = err.details.unwrap();
        assert_eq!(details.get("shortfall_cents").unwrap(), 500);
        assert_eq!(details.get("min_order_cents").unwrap(), 1500);
    }

    #[test]
    fn free_delivery_at_threshold() {
        assert_eq!(zone().quote(3000).unwrap().delivery_fee_cents, 0);
        assert_eq!(zone().quote(3500).unwrap().delivery_fee_cents, 0);
        // one cent under still pays
        assert_eq!(zone().quote(2999).unwrap().delivery_fee_cents, 300);
    }

    #[test]
    fn exact_minimum_is_accepted() {
        assert!(zone().quote(1500).is_ok());
    }

    #[test]
    fn inactive_zone_covers_nothing() {
        let mut z = zone();
        z.is_active = false;
        assert!(!z.covers_zipcode("75001"));
    }

    #[test]
    fn zipcode_match_is_exact() {
        let z = zone();
        assert!(z.covers_zipcode("75001"));
        assert!(!z.covers_zipcode("75002"));
    }
}
