//! Cart / pricing engine
//!
//! Pure functions over order lines. The storefront keeps a client-side
//! cart for preview, but the server recomputes every amount from the
//! submitted lines at order-creation time; that recomputation is the
//! only authoritative number for business-rule checks.

use crate::models::order::OrderItem;

/// Total for one line: `(unit price + option surcharges) * quantity`
pub fn line_total(item: &OrderItem) -> i64 {
    let options: i64 = item.options.iter().map(|o| o.price_cents).sum();
    (item.unit_price_cents + options) * item.quantity
}

/// Cart subtotal: sum of line totals
pub fn subtotal(items: &[OrderItem]) -> i64 {
    items.iter().map(line_total).sum()
}

/// Client-held cart with merge-on-add semantics.
///
/// Lines are keyed by product identity *and* option selection: adding
/// the same product with identical options increments the quantity;
/// a different option selection forms a distinct line.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<OrderItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[OrderItem] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn subtotal_cents(&self) -> i64 {
        subtotal(&self.lines)
    }

    /// Add an item, merging quantities into an existing matching line
    pub fn add(&mut self, item: OrderItem) {
        if item.quantity <= 0 {
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| same_line(l, &item)) {
            line.quantity += item.quantity;
        } else {
            self.lines.push(item);
        }
    }

    /// Set a line's quantity; zero or negative removes the line
    pub fn set_quantity(&mut self, product_id: &str, options: &[String], quantity: i64) {
        if quantity <= 0 {
            self.lines
                .retain(|l| !(l.product_id == product_id && option_key(l) == options));
            return;
        }
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id && option_key(l) == options)
        {
            line.quantity = quantity;
        }
    }

    /// Drop every line for the product, regardless of options
    pub fn remove(&mut self, product_id: &str) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

fn same_line(a: &OrderItem, b: &OrderItem) -> bool {
    a.product_id == b.product_id && option_key(a) == option_key(b)
}

/// Option selection identity: sorted option pos_ids
fn option_key(item: &OrderItem) -> Vec<String> {
    let mut key: Vec<String> = item.options.iter().map(|o| o.pos_id.clone()).collect();
    key.sort();
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::OrderItemOption;

    fn item(product_id: &str, price: i64, qty: i64, options: &[(&str, i64)]) -> OrderItem {
        OrderItem {
            product_id: product_id.to_string(),
            pos_id: format!("pos-{product_id}"),
            name: product_id.to_string(),
            unit_price_cents: price,
            quantity: qty,
            options: options
                .iter()
                .map(|(id, price)| OrderItemOption {
                    pos_id: id.to_string(),
                    name: id.to_string(),
                    price_cents: *price,
                })
                .collect(),
        }
    }

    #[test]
    fn line_total_includes_option_surcharges_per_unit() {
        let line = item("p1", 950, 2, &[("cheese", 100), ("sauce", 50)]);
        assert_eq!(line_total(&line), (950 + 150) * 2);
    }

    #[test]
    fn subtotal_sums_lines() {
        let items = vec![item("p1", 1000, 1, &[]), item("p2", 500, 3, &[("x", 10)])];
        assert_eq!(subtotal(&items), 1000 + 510 * 3);
    }

    #[test]
    fn empty_cart_subtotal_is_zero() {
        assert_eq!(subtotal(&[]), 0);
    }

    #[test]
    fn adding_same_product_merges_quantities() {
        let mut cart = Cart::new();
        cart.add(item("p1", 950, 2, &[]));
        cart.add(item("p1", 950, 3, &[]));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
        // same subtotal as adding once with q1+q2
        assert_eq!(cart.subtotal_cents(), subtotal(&[item("p1", 950, 5, &[])]));
    }

    #[test]
    fn different_option_selection_stays_a_distinct_line() {
        let mut cart = Cart::new();
        cart.add(item("p1", 950, 1, &[("cheese", 100)]));
        cart.add(item("p1", 950, 1, &[]));
        assert_eq!(cart.lines().len(), 2);
    }

    #[test]
    fn option_order_does_not_split_lines() {
        let mut cart = Cart::new();
        cart.add(item("p1", 950, 1, &[("a", 10), ("b", 20)]));
        cart.add(item("p1", 950, 1, &[("b", 20), ("a", 10)]));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn zero_quantity_removes_the_line() {
        let mut cart = Cart::new();
        cart.add(item("p1", 950, 2, &[]));
        cart.set_quantity("p1", &[], 0);
        assert!(cart.is_empty());

        cart.add(item("p1", 950, 2, &[]));
        cart.set_quantity("p1", &[], -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn stored_snapshot_keeps_checkout_prices_through_catalog_changes() {
        // the order row persists a serialized copy of the cart lines
        let lines = vec![item("p1", 950, 2, &[("cheese", 100)])];
        let total_at_checkout = subtotal(&lines);
        let stored = serde_json::to_string(&lines).unwrap();

        // a later sync reprices the product and its option
        let repriced = vec![item("p1", 1200, 2, &[("cheese", 150)])];
        assert_ne!(subtotal(&repriced), total_at_checkout);

        // replaying the stored snapshot still yields the checkout total
        let replayed: Vec<OrderItem> = serde_json::from_str(&stored).unwrap();
        assert_eq!(replayed, lines);
        assert_eq!(replayed[0].unit_price_cents, 950);
        assert_eq!(subtotal(&replayed), total_at_checkout);
    }

    #[test]
    fn adding_nonpositive_quantity_is_a_noop() {
        let mut cart = Cart::new();
        cart.add(item("p1", 950, 0, &[]));
        assert!(cart.is_empty());
    }
}
