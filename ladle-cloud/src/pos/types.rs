//! POS wire types
//!
//! The catalog API is loose about types: ids arrive as strings with an
//! alphabetic prefix ("ZD1794498") in catalog payloads but as bare
//! numbers in webhook payloads, and several fields have legacy aliases.
//! Everything here deserializes defensively and lets the sync layer
//! normalize.

use serde::{Deserialize, Deserializer, Serialize};

/// Accept a string or a number, yielding the string form
fn de_flex_id<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flex {
        S(String),
        N(i64),
    }
    Ok(Option::<Flex>::deserialize(de)?.map(|f| match f {
        Flex::S(s) => s,
        Flex::N(n) => n.to_string(),
    }))
}

fn de_flex_ids<'de, D>(de: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flex {
        S(String),
        N(i64),
    }
    Ok(Vec::<Flex>::deserialize(de)?
        .into_iter()
        .map(|f| match f {
            Flex::S(s) => s,
            Flex::N(n) => n.to_string(),
        })
        .collect())
}

/// One product ("dish" or "menu") as served by `GET /catalogs/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCatalogItem {
    #[serde(default, deserialize_with = "de_flex_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de_flex_id")]
    pub internal_id: Option<String>,
    #[serde(default, rename = "type")]
    pub item_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Cents
    #[serde(default)]
    pub price: Option<i64>,
    /// Basis points, e.g. 1000 for 10%
    #[serde(default, alias = "tva")]
    pub tax: Option<i64>,
    #[serde(default)]
    pub disabled: bool,
    /// Legacy alias of `disabled`, still seen in the wild
    #[serde(default)]
    pub disable: bool,
    #[serde(default, deserialize_with = "de_flex_ids")]
    pub tag_ids: Vec<String>,
    #[serde(default, alias = "o")]
    pub sort_order: Option<i32>,
    /// Option values this product declares
    #[serde(default, deserialize_with = "de_flex_ids")]
    pub option_value_ids: Vec<String>,
}

/// Option group metadata (name + selection type)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOptionGroup {
    #[serde(default, deserialize_with = "de_flex_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de_flex_id")]
    pub internal_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub group_type: Option<String>,
}

/// One option value belonging to a group
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOptionValue {
    #[serde(default, deserialize_with = "de_flex_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de_flex_id")]
    pub internal_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub outofstock: bool,
    /// Parent option group reference
    #[serde(default, deserialize_with = "de_flex_id")]
    pub option_id: Option<String>,
    #[serde(default, alias = "o")]
    pub sort_order: Option<i32>,
}

/// Catalog body; the API wraps it as `{ "catalog": {...}, "errno": 0 }`
/// but older deployments return it at the top level
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCatalog {
    #[serde(default, alias = "dishes")]
    pub items: Vec<RawCatalogItem>,
    #[serde(default)]
    pub options: Vec<RawOptionGroup>,
    #[serde(default, rename = "optionValues")]
    pub option_values: Vec<RawOptionValue>,
}

// ===== Webhook payloads =====

/// Webhook envelope; `data` shape depends on `event_name`
#[derive(Debug, Clone, Deserialize)]
pub struct PosWebhookEnvelope {
    pub event_name: String,
    #[serde(default)]
    pub restaurant_id: i64,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// `dish.availability_update`
#[derive(Debug, Clone, Deserialize)]
pub struct DishAvailabilityData {
    pub id_dish: i64,
    #[serde(default)]
    pub outofstock: bool,
}

/// `option_value.availability_update` carries a batch
#[derive(Debug, Clone, Deserialize)]
pub struct OptionAvailabilityData {
    #[serde(default)]
    pub options_values_availabilities: Vec<OptionValueAvailability>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptionValueAvailability {
    pub id_dish_option_value: i64,
    #[serde(default)]
    pub outofstock: bool,
}

/// `order.status.update`
#[derive(Debug, Clone, Deserialize)]
pub struct OrderStatusData {
    pub id_order: i64,
    pub status: String,
}

// ===== Outbound order relay =====

#[derive(Debug, Clone, Serialize)]
pub struct PosOrderPayload {
    pub id_restaurant: i64,
    pub source: &'static str,
    /// "delivery" | "takeaway" | "onsite"
    pub mode: &'static str,
    pub customer: PosCustomer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<PosAddress>,
    pub items: Vec<PosOrderItem>,
    /// Cents, must equal the sum of item lines
    pub total: i64,
    /// Present only for already-captured online payments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<PosTransaction>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PosCustomer {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PosAddress {
    pub street: String,
    pub city: String,
    pub zipcode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

/// The POS has no quantity field; repeated units are repeated items
#[derive(Debug, Clone, Serialize)]
pub struct PosOrderItem {
    pub id: i64,
    pub price: i64,
    pub modifiers: Vec<PosModifier>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PosModifier {
    pub id_option_value: i64,
    pub price: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PosTransaction {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub amount: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PosOrderResponse {
    pub order: PosOrderRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PosOrderRef {
    #[serde(default, deserialize_with = "de_flex_id")]
    pub id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_item_accepts_string_and_numeric_ids() {
        let item: RawCatalogItem = serde_json::from_str(
            r#"{"id": "ZD1794498", "name": "Tacos XL", "price": 950, "tva": 1000}"#,
        )
        .unwrap();
        assert_eq!(item.id.as_deref(), Some("ZD1794498"));
        assert_eq!(item.tax, Some(1000));

        let item: RawCatalogItem =
            serde_json::from_str(r#"{"id": 1794498, "name": "Tacos XL"}"#).unwrap();
        assert_eq!(item.id.as_deref(), Some("1794498"));
        assert_eq!(item.price, None);
    }

    #[test]
    fn catalog_accepts_dishes_alias() {
        let catalog: RawCatalog =
            serde_json::from_str(r#"{"dishes": [{"id": "ZD1"}], "optionValues": []}"#).unwrap();
        assert_eq!(catalog.items.len(), 1);
    }

    #[test]
    fn option_value_ids_accept_mixed_types() {
        let item: RawCatalogItem =
            serde_json::from_str(r#"{"id": "ZD1", "option_value_ids": ["ZOV7", 8]}"#).unwrap();
        assert_eq!(item.option_value_ids, vec!["ZOV7", "8"]);
    }

    #[test]
    fn webhook_envelope_parses_with_typed_data() {
        let envelope: PosWebhookEnvelope = serde_json::from_str(
            r#"{"event_name": "dish.availability_update",
                "restaurant_id": 42,
                "data": {"id_dish": 1794498, "outofstock": true}}"#,
        )
        .unwrap();
        assert_eq!(envelope.event_name, "dish.availability_update");
        let data: DishAvailabilityData = serde_json::from_value(envelope.data).unwrap();
        assert_eq!(data.id_dish, 1794498);
        assert!(data.outofstock);
    }

    #[test]
    fn order_payload_omits_empty_optionals() {
        let payload = PosOrderPayload {
            id_restaurant: 42,
            source: "web",
            mode: "takeaway",
            customer: PosCustomer {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                phone: "+33600000000".into(),
            },
            address: None,
            items: vec![],
            total: 0,
            transactions: None,
            comment: None,
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(!json.contains("address"));
        assert!(!json.contains("transactions"));
        assert!(!json.contains("comment"));
    }
}
