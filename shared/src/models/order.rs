//! Order model
//!
//! Orders are created once by the order engine in `pending/pending`
//! state, then mutated only by webhook reconciliation (POS status
//! updates, payment events). The embedded `items` snapshot is a
//! denormalized copy of the cart at order time; later catalog price
//! changes must never affect it.

use serde::{Deserialize, Serialize};

/// Fulfillment type chosen by the customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    Delivery,
    Pickup,
    DineIn,
}

impl OrderType {
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Delivery => "delivery",
            Self::Pickup => "pickup",
            Self::DineIn => "dine_in",
        }
    }

    /// POS fulfillment mode for order relay
    pub fn pos_mode(&self) -> &'static str {
        match self {
            Self::Delivery => "delivery",
            Self::Pickup => "takeaway",
            Self::DineIn => "onsite",
        }
    }
}

/// Local order status vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Map the POS status vocabulary onto the local one.
///
/// Unmapped strings pass through raw: new POS statuses degrade to a
/// stored string rather than a hard failure.
pub fn map_pos_status(pos_status: &str) -> String {
    let mapped = match pos_status {
        "pending" => OrderStatus::Pending,
        "confirmed" => OrderStatus::Confirmed,
        "in_preparation" => OrderStatus::Preparing,
        "ready" => OrderStatus::Ready,
        "in_delivery" => OrderStatus::OutForDelivery,
        "delivered" => OrderStatus::Delivered,
        "cancelled" => OrderStatus::Cancelled,
        other => return other.to_string(),
    };
    mapped.as_db().to_string()
}

/// Payment lifecycle on the order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Cash,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Cash => "cash",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

/// How the customer chose to pay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Online card capture through the payment processor
    Card,
    /// Cash on delivery/pickup, no online transaction
    Cash,
}

impl PaymentMethod {
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Cash => "cash",
        }
    }

    /// Whether this method requires an online payment intent
    pub fn requires_online_capture(&self) -> bool {
        matches!(self, Self::Card)
    }
}

/// Selected option on an order line (price snapshot)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemOption {
    pub pos_id: String,
    pub name: String,
    pub price_cents: i64,
}

/// One line of the order's items snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    pub pos_id: String,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
    #[serde(default)]
    pub options: Vec<OrderItemOption>,
}

/// Delivery address as submitted at checkout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    pub street: String,
    pub city: String,
    pub zipcode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,
    pub tenant_id: String,
    pub order_number: i64,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    /// "delivery" | "pickup" | "dine_in"
    pub order_type: String,
    #[cfg_attr(feature = "db", sqlx(json(nullable)))]
    pub delivery_address: Option<DeliveryAddress>,
    pub delivery_zone_id: Option<String>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub items: Vec<OrderItem>,
    pub subtotal_cents: i64,
    pub delivery_fee_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub status: String,
    pub payment_status: String,
    pub payment_method: Option<String>,
    pub pos_order_id: Option<String>,
    pub customer_notes: Option<String>,
    /// Unguessable token for unauthenticated order tracking
    pub tracking_token: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order creation payload (`POST /api/orders`)
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub order_type: OrderType,
    pub items: Vec<OrderItem>,
    pub delivery_address: Option<DeliveryAddress>,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub customer_notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pos_status_map_covers_known_vocabulary() {
        assert_eq!(map_pos_status("pending"), "pending");
        assert_eq!(map_pos_status("in_preparation"), "preparing");
        assert_eq!(map_pos_status("in_delivery"), "out_for_delivery");
        assert_eq!(map_pos_status("delivered"), "delivered");
        assert_eq!(map_pos_status("cancelled"), "cancelled");
    }

    #[test]
    fn unknown_pos_status_passes_through_raw() {
        assert_eq!(map_pos_status("awaiting_rider"), "awaiting_rider");
    }

    #[test]
    fn order_type_pos_mode_mapping() {
        assert_eq!(OrderType::Pickup.pos_mode(), "takeaway");
        assert_eq!(OrderType::Delivery.pos_mode(), "delivery");
        assert_eq!(OrderType::DineIn.pos_mode(), "onsite");
    }

    #[test]
    fn only_card_requires_online_capture() {
        assert!(PaymentMethod::Card.requires_online_capture());
        assert!(!PaymentMethod::Cash.requires_online_capture());
    }

    #[test]
    fn create_order_request_deserializes() {
        let json = r#"{
            "customer_name": "Ada",
            "customer_email": "ada@example.com",
            "customer_phone": "+33600000000",
            "order_type": "delivery",
            "items": [{
                "product_id": "p1",
                "pos_id": "1794498",
                "name": "Tacos XL",
                "unit_price_cents": 950,
                "quantity": 2,
                "options": [{"pos_id": "42", "name": "Extra cheese", "price_cents": 100}]
            }],
            "delivery_address": {"street": "1 rue de Rivoli", "city": "Paris", "zipcode": "75001"},
            "payment_method": "card"
        }"#;
        let req: CreateOrderRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.order_type, OrderType::Delivery);
        assert_eq!(req.items[0].options[0].price_cents, 100);
        assert!(req.customer_notes.is_none());
    }
}
