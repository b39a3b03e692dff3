//! Order engine
//!
//! Single entry point for order creation: recompute pricing from the
//! submitted lines, enforce delivery-zone rules, persist the order,
//! then attempt the two side channels (payment intent, POS relay).
//! Both side channels are non-fatal: a storefront order must never be
//! lost because the processor or the POS is down.

use serde::Serialize;
use shared::cart;
use shared::error::{AppError, ErrorCode};
use shared::models::order::{CreateOrderRequest, OrderType, PaymentStatus};
use shared::models::tenant::Tenant;
use shared::util::{now_millis, tracking_token};
use sqlx::types::Json;

use crate::db;
use crate::error::{ServiceError, ServiceResult};
use crate::pos::types::{
    PosAddress, PosCustomer, PosModifier, PosOrderItem, PosOrderPayload, PosTransaction,
};
use crate::state::AppState;
use crate::stripe;

/// What the storefront needs to finish checkout
#[derive(Debug, Clone, Serialize)]
pub struct OrderReceipt {
    pub order_id: String,
    pub order_number: i64,
    pub tracking_token: String,
    pub total_cents: i64,
    pub status: String,
    pub payment: PaymentInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentInfo {
    pub method: String,
    /// Client-side confirmation secret; absent for cash orders and when
    /// intent creation failed (the order stays payable later)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

/// Create an order for the tenant resolved from the request context
pub async fn create_order(
    state: &AppState,
    tenant_slug: &str,
    req: CreateOrderRequest,
) -> ServiceResult<OrderReceipt> {
    let tenant = db::tenants::find_by_slug(&state.pool, tenant_slug)
        .await?
        .ok_or_else(AppError::tenant_not_found)?;

    validate_request(&tenant, &req)?;

    // Server-side pricing is the only authoritative number
    let subtotal_cents = cart::subtotal(&req.items);

    let mut delivery_fee_cents = 0i64;
    let mut delivery_zone_id: Option<String> = None;

    if req.order_type == OrderType::Delivery {
        let address = req
            .delivery_address
            .as_ref()
            .ok_or_else(|| AppError::validation("Delivery orders require a delivery address"))?;

        let zone = db::zones::find_zone_for_zipcode(&state.pool, &tenant.id, &address.zipcode)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::DeliveryZoneUnavailable))?;

        let quote = zone.quote(subtotal_cents)?;
        delivery_fee_cents = quote.delivery_fee_cents;
        delivery_zone_id = Some(zone.id);
    }

    let total_cents = subtotal_cents + delivery_fee_cents;

    let initial_payment_status = if req.payment_method.requires_online_capture() {
        PaymentStatus::Pending
    } else {
        PaymentStatus::Cash
    };

    let order_id = db::new_id();
    let token = tracking_token();
    let now = now_millis();

    let new_order = db::orders::NewOrder {
        tenant_id: &tenant.id,
        customer_name: &req.customer_name,
        customer_email: &req.customer_email,
        customer_phone: &req.customer_phone,
        order_type: req.order_type.as_db(),
        delivery_address: req.delivery_address.as_ref().map(Json),
        delivery_zone_id: delivery_zone_id.as_deref(),
        items: &req.items,
        subtotal_cents,
        delivery_fee_cents,
        total_cents,
        payment_status: initial_payment_status.as_db(),
        payment_method: req.payment_method.as_db(),
        customer_notes: req.customer_notes.as_deref(),
        tracking_token: &token,
    };
    let order_number = db::orders::insert(&state.pool, &order_id, &new_order, now).await?;

    tracing::info!(
        order_id = %order_id,
        order_number,
        tenant = %tenant.slug,
        total_cents,
        "Order created"
    );

    let client_secret = if req.payment_method.requires_online_capture() {
        setup_payment(state, &tenant, &order_id, order_number, total_cents).await
    } else {
        None
    };

    relay_to_pos(state, &tenant, &req, &order_id, delivery_fee_cents).await;

    Ok(OrderReceipt {
        order_id,
        order_number,
        tracking_token: token,
        total_cents,
        status: "pending".to_string(),
        payment: PaymentInfo {
            method: req.payment_method.as_db().to_string(),
            client_secret,
        },
    })
}

fn validate_request(tenant: &Tenant, req: &CreateOrderRequest) -> Result<(), ServiceError> {
    if req.items.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyCart).into());
    }
    if req.items.iter().any(|i| i.quantity < 1) {
        return Err(AppError::validation("Item quantities must be at least 1").into());
    }
    if req.customer_name.trim().is_empty()
        || req.customer_email.trim().is_empty()
        || req.customer_phone.trim().is_empty()
    {
        return Err(AppError::validation("Customer name, email and phone are required").into());
    }

    let online = req.payment_method.requires_online_capture();
    if online && !tenant.settings.online_payment_enabled {
        return Err(AppError::validation("Online payment is not enabled for this store").into());
    }
    if !online && !tenant.settings.cash_payment_enabled {
        return Err(AppError::validation("Cash payment is not enabled for this store").into());
    }
    Ok(())
}

/// Create the payment intent and its payment row. Failures degrade to
/// an order without a client secret rather than losing the order.
async fn setup_payment(
    state: &AppState,
    tenant: &Tenant,
    order_id: &str,
    order_number: i64,
    total_cents: i64,
) -> Option<String> {
    let Some(secret_key) = state.stripe_secret_key.as_deref() else {
        tracing::error!(order_id, "STRIPE_SECRET_KEY not configured, order left unpaid");
        return None;
    };

    match stripe::create_payment_intent(
        secret_key,
        total_cents,
        &state.currency,
        order_id,
        order_number,
        &tenant.id,
    )
    .await
    {
        Ok(intent) => {
            let now = now_millis();
            match db::payments::insert(
                &state.pool,
                &db::new_id(),
                order_id,
                "stripe",
                &intent.id,
                total_cents,
                now,
            )
            .await
            {
                Ok(payment) => {
                    tracing::info!(order_id, payment_id = %payment.id, "Payment row recorded");
                }
                Err(e) => {
                    tracing::error!(order_id, error = %e, "Failed to record payment row");
                }
            }
            Some(intent.client_secret)
        }
        Err(e) => {
            tracing::error!(
                order_id,
                code = ErrorCode::PaymentSetupFailed.code(),
                error = %e,
                "Payment intent creation failed"
            );
            None
        }
    }
}

/// Relay the order to the POS when the tenant routes through one.
/// Relay failures are logged and swallowed.
async fn relay_to_pos(
    state: &AppState,
    tenant: &Tenant,
    req: &CreateOrderRequest,
    order_id: &str,
    delivery_fee_cents: i64,
) {
    if tenant.pos_virtual_brand_name.is_none() {
        return;
    }
    if !state.pos.is_configured() {
        tracing::warn!(order_id, "POS not configured, order not relayed");
        return;
    }

    let payload = build_pos_payload(
        tenant.pos_restaurant_id,
        req,
        delivery_fee_cents,
        state.pos_delivery_fee_product_id,
    );

    match state.pos.create_order(&payload).await {
        Ok(pos_order_id) => {
            tracing::info!(order_id, pos_order_id = %pos_order_id, "Order relayed to POS");
            if let Err(e) =
                db::orders::set_pos_order_id(&state.pool, order_id, &pos_order_id, now_millis())
                    .await
            {
                tracing::error!(order_id, error = %e, "Failed to record POS order id");
            }
        }
        Err(e) => {
            // TODO: queue for retry once an outbox table exists
            tracing::error!(order_id, error = %e, "POS relay failed");
        }
    }
}

/// Build the POS order payload.
///
/// The POS order format has no quantity field, so each line is expanded
/// into `quantity` repeated items. A configured fee product carries the
/// delivery fee as an extra line; online payments are declared as an
/// already-authorized card transaction. The payload total is recomputed
/// from the emitted lines so a dropped line (unparsable id, fee product
/// not configured) keeps the ticket internally consistent.
pub fn build_pos_payload(
    pos_restaurant_id: i64,
    req: &CreateOrderRequest,
    delivery_fee_cents: i64,
    fee_product_id: Option<i64>,
) -> PosOrderPayload {
    let mut items: Vec<PosOrderItem> = Vec::new();
    for line in &req.items {
        let Some(id) = parse_pos_id(&line.pos_id) else {
            tracing::warn!(pos_id = %line.pos_id, "Unparsable POS product id, line skipped");
            continue;
        };
        let modifiers: Vec<PosModifier> = line
            .options
            .iter()
            .filter_map(|opt| {
                let id_option_value = parse_pos_id(&opt.pos_id)?;
                Some(PosModifier {
                    id_option_value,
                    price: opt.price_cents,
                })
            })
            .collect();

        for _ in 0..line.quantity {
            items.push(PosOrderItem {
                id,
                price: line.unit_price_cents,
                modifiers: modifiers.clone(),
            });
        }
    }

    if delivery_fee_cents > 0 {
        if let Some(fee_id) = fee_product_id {
            items.push(PosOrderItem {
                id: fee_id,
                price: delivery_fee_cents,
                modifiers: Vec::new(),
            });
        }
    }

    let total: i64 = items
        .iter()
        .map(|i| i.price + i.modifiers.iter().map(|m| m.price).sum::<i64>())
        .sum();

    let transactions = if req.payment_method.requires_online_capture() {
        Some(vec![PosTransaction {
            kind: "card",
            amount: total,
        }])
    } else {
        None
    };

    PosOrderPayload {
        id_restaurant: pos_restaurant_id,
        source: "web",
        mode: req.order_type.pos_mode(),
        customer: PosCustomer {
            name: req.customer_name.clone(),
            email: req.customer_email.clone(),
            phone: req.customer_phone.clone(),
        },
        address: req.delivery_address.as_ref().map(|a| PosAddress {
            street: a.street.clone(),
            city: a.city.clone(),
            zipcode: a.zipcode.clone(),
            additional_info: a.additional_info.clone(),
        }),
        items,
        total,
        transactions,
        comment: req.customer_notes.clone(),
    }
}

fn parse_pos_id(raw: &str) -> Option<i64> {
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::order::{DeliveryAddress, OrderItem, OrderItemOption, PaymentMethod};

    fn request(order_type: OrderType, payment_method: PaymentMethod) -> CreateOrderRequest {
        CreateOrderRequest {
            customer_name: "Ada".into(),
            customer_email: "ada@example.com".into(),
            customer_phone: "+33600000000".into(),
            order_type,
            items: vec![
                OrderItem {
                    product_id: "p1".into(),
                    pos_id: "1794498".into(),
                    name: "Tacos XL".into(),
                    unit_price_cents: 950,
                    quantity: 2,
                    options: vec![OrderItemOption {
                        pos_id: "42".into(),
                        name: "Extra cheese".into(),
                        price_cents: 100,
                    }],
                },
                OrderItem {
                    product_id: "p2".into(),
                    pos_id: "1794499".into(),
                    name: "Coca".into(),
                    unit_price_cents: 250,
                    quantity: 1,
                    options: vec![],
                },
            ],
            delivery_address: Some(DeliveryAddress {
                street: "1 rue de Rivoli".into(),
                city: "Paris".into(),
                zipcode: "75001".into(),
                additional_info: None,
            }),
            payment_method,
            customer_notes: Some("sonnez fort".into()),
        }
    }

    #[test]
    fn payload_expands_quantity_into_repeated_items() {
        let req = request(OrderType::Delivery, PaymentMethod::Card);
        let payload = build_pos_payload(42, &req, 0, None);

        // quantity 2 -> two identical lines, plus the single drink
        assert_eq!(payload.items.len(), 3);
        assert_eq!(payload.items[0].id, 1794498);
        assert_eq!(payload.items[1].id, 1794498);
        assert_eq!(payload.items[0].modifiers[0].id_option_value, 42);
        assert_eq!(payload.items[2].id, 1794499);
        assert!(payload.items[2].modifiers.is_empty());
    }

    #[test]
    fn delivery_fee_becomes_a_line_only_when_configured() {
        let req = request(OrderType::Delivery, PaymentMethod::Card);

        let payload = build_pos_payload(42, &req, 300, Some(999));
        let fee_line = payload.items.last().unwrap();
        assert_eq!(fee_line.id, 999);
        assert_eq!(fee_line.price, 300);

        let payload = build_pos_payload(42, &req, 300, None);
        assert!(payload.items.iter().all(|i| i.id != 999));

        // zero fee never adds a line, even when configured
        let payload = build_pos_payload(42, &req, 0, Some(999));
        assert_eq!(payload.items.len(), 3);
    }

    #[test]
    fn payload_total_matches_the_emitted_lines() {
        // two tacos at 950+100 plus one drink at 250, fee line included
        let req = request(OrderType::Delivery, PaymentMethod::Card);
        let payload = build_pos_payload(42, &req, 300, Some(999));
        assert_eq!(payload.total, 2650);

        // fee product unconfigured: the fee never reaches the ticket
        let payload = build_pos_payload(42, &req, 300, None);
        assert_eq!(payload.total, 2350);

        // a dropped line leaves the ticket, not just the item list
        let mut req = request(OrderType::Pickup, PaymentMethod::Cash);
        req.items[0].pos_id = "not-a-number".into();
        let payload = build_pos_payload(42, &req, 0, None);
        assert_eq!(payload.total, 250);
    }

    #[test]
    fn card_orders_declare_a_transaction() {
        let req = request(OrderType::Pickup, PaymentMethod::Card);
        let payload = build_pos_payload(42, &req, 0, None);
        let transactions = payload.transactions.unwrap();
        assert_eq!(transactions[0].kind, "card");
        assert_eq!(transactions[0].amount, payload.total);
        assert_eq!(transactions[0].amount, 2350);

        let req = request(OrderType::Pickup, PaymentMethod::Cash);
        let payload = build_pos_payload(42, &req, 0, None);
        assert!(payload.transactions.is_none());
    }

    #[test]
    fn payload_maps_mode_and_address() {
        let req = request(OrderType::Delivery, PaymentMethod::Card);
        let payload = build_pos_payload(42, &req, 0, None);
        assert_eq!(payload.mode, "delivery");
        assert_eq!(payload.id_restaurant, 42);
        assert_eq!(payload.address.unwrap().zipcode, "75001");
        assert_eq!(payload.comment.as_deref(), Some("sonnez fort"));

        let req = request(OrderType::Pickup, PaymentMethod::Cash);
        let mut req = req;
        req.delivery_address = None;
        let payload = build_pos_payload(42, &req, 0, None);
        assert_eq!(payload.mode, "takeaway");
        assert!(payload.address.is_none());
    }

    #[test]
    fn unparsable_pos_id_skips_the_line() {
        let mut req = request(OrderType::Pickup, PaymentMethod::Cash);
        req.items[0].pos_id = "not-a-number".into();
        let payload = build_pos_payload(42, &req, 0, None);
        // only the drink survives
        assert_eq!(payload.items.len(), 1);
        assert_eq!(payload.items[0].id, 1794499);
    }
}
