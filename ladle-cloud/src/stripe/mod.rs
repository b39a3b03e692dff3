//! Stripe integration via REST API (no SDK dependency)

use hmac::{Hmac, Mac};
use sha2::Sha256;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A created payment intent, enough for client-side confirmation
#[derive(Debug, Clone)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
}

/// Create a PaymentIntent carrying order correlation metadata
pub async fn create_payment_intent(
    secret_key: &str,
    amount_cents: i64,
    currency: &str,
    order_id: &str,
    order_number: i64,
    tenant_id: &str,
) -> Result<PaymentIntent, BoxError> {
    let client = reqwest::Client::new();
    let amount = amount_cents.to_string();
    let order_number = order_number.to_string();
    let resp: serde_json::Value = client
        .post("https://api.stripe.com/v1/payment_intents")
        .basic_auth(secret_key, None::<&str>)
        .form(&[
            ("amount", amount.as_str()),
            ("currency", currency),
            ("automatic_payment_methods[enabled]", "true"),
            ("metadata[order_id]", order_id),
            ("metadata[order_number]", order_number.as_str()),
            ("metadata[tenant_id]", tenant_id),
        ])
        .send()
        .await?
        .json()
        .await?;

    match (resp["id"].as_str(), resp["client_secret"].as_str()) {
        (Some(id), Some(client_secret)) => Ok(PaymentIntent {
            id: id.to_string(),
            client_secret: client_secret.to_string(),
        }),
        _ => Err(format!("Stripe create_payment_intent failed: {resp}").into()),
    }
}

/// Verify Stripe webhook signature (HMAC-SHA256)
pub fn verify_webhook_signature(
    payload: &[u8],
    sig_header: &str,
    secret: &str,
) -> Result<(), &'static str> {
    let mut timestamp = "";
    let mut signature = "";
    for part in sig_header.split(',') {
        if let Some(t) = part.strip_prefix("t=") {
            timestamp = t;
        } else if let Some(v) = part.strip_prefix("v1=") {
            signature = v;
        }
    }

    if timestamp.is_empty() || signature.is_empty() {
        return Err("Invalid Stripe-Signature header");
    }

    let signed_payload = format!("{timestamp}.{}", std::str::from_utf8(payload).unwrap_or(""));
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).map_err(|_| "HMAC key error")?;
    mac.update(signed_payload.as_bytes());

    // Decode hex signature and use constant-time comparison via hmac::verify_slice
    let sig_bytes = hex::decode(signature).map_err(|_| "Invalid signature hex")?;
    mac.verify_slice(&sig_bytes)
        .map_err(|_| "Webhook signature mismatch")?;

    // Reject events older than 5 minutes to prevent replay attacks
    let ts: i64 = timestamp.parse().map_err(|_| "Invalid timestamp")?;
    let now = chrono::Utc::now().timestamp();
    if (now - ts).abs() > 300 {
        return Err("Webhook timestamp too old");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(payload: &[u8], secret: &str, ts: i64) -> String {
        let signed = format!("{ts}.{}", std::str::from_utf8(payload).unwrap());
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(signed.as_bytes());
        format!("t={ts},v1={}", hex::encode(mac.finalize().into_bytes()))
    }

    #[test]
    fn valid_signature_passes() {
        let payload = br#"{"id":"evt_1"}"#;
        let header = sign(payload, "whsec_test", chrono::Utc::now().timestamp());
        assert!(verify_webhook_signature(payload, &header, "whsec_test").is_ok());
    }

    #[test]
    fn wrong_secret_fails() {
        let payload = br#"{"id":"evt_1"}"#;
        let header = sign(payload, "whsec_test", chrono::Utc::now().timestamp());
        assert!(verify_webhook_signature(payload, &header, "whsec_other").is_err());
    }

    #[test]
    fn stale_timestamp_fails() {
        let payload = br#"{"id":"evt_1"}"#;
        let header = sign(payload, "whsec_test", chrono::Utc::now().timestamp() - 600);
        assert_eq!(
            verify_webhook_signature(payload, &header, "whsec_test"),
            Err("Webhook timestamp too old")
        );
    }

    #[test]
    fn missing_header_parts_fail() {
        assert!(verify_webhook_signature(b"x", "v1=abc", "whsec_test").is_err());
        assert!(verify_webhook_signature(b"x", "t=123", "whsec_test").is_err());
    }
}
