//! POS integration via REST API
//!
//! Catalog pull, order relay and webhook signature verification. The
//! client tolerates an unconfigured environment (local dev without POS
//! credentials); callers decide whether that is fatal.

use hmac::{Hmac, Mac};
use sha2::Sha256;

pub mod sync;
pub mod types;

use types::{PosOrderPayload, PosOrderResponse, RawCatalog};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// POS API client
#[derive(Clone)]
pub struct PosClient {
    http: reqwest::Client,
    base_url: Option<String>,
    api_key: Option<String>,
}

impl PosClient {
    pub fn new(base_url: Option<String>, api_key: Option<String>) -> Self {
        if base_url.is_none() || api_key.is_none() {
            tracing::warn!("POS API not configured, catalog sync and order relay are disabled");
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some() && self.api_key.is_some()
    }

    fn credentials(&self) -> Result<(&str, &str), BoxError> {
        match (self.base_url.as_deref(), self.api_key.as_deref()) {
            (Some(base), Some(key)) => Ok((base, key)),
            _ => Err("POS API not configured".into()),
        }
    }

    /// Pull the full catalog (products, option groups, option values)
    pub async fn get_full_catalog(&self, catalog_id: &str) -> Result<RawCatalog, BoxError> {
        let (base, key) = self.credentials()?;

        let response = self
            .http
            .get(format!("{base}/catalogs/{catalog_id}"))
            .query(&[("lang", "fr")])
            .bearer_auth(key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("POS catalog request failed ({status}): {body}").into());
        }

        // Newer deployments wrap the body as { "catalog": {...}, "errno": 0 }
        let body: serde_json::Value = response.json().await?;
        let catalog = body.get("catalog").unwrap_or(&body);
        Ok(serde_json::from_value(catalog.clone())?)
    }

    /// Relay an order to the POS, returning the POS-side order id
    pub async fn create_order(&self, payload: &PosOrderPayload) -> Result<String, BoxError> {
        let (base, key) = self.credentials()?;

        let response = self
            .http
            .post(format!("{base}/orders"))
            .bearer_auth(key)
            .json(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("POS order relay failed ({status}): {body}").into());
        }

        let parsed: PosOrderResponse = response.json().await?;
        parsed
            .order
            .id
            .ok_or_else(|| "POS order response carried no order id".into())
    }
}

/// Verify a POS webhook signature (hex HMAC-SHA256 over the raw body)
pub fn verify_webhook_signature(
    payload: &[u8],
    signature_hex: &str,
    secret: &str,
) -> Result<(), &'static str> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).map_err(|_| "HMAC key error")?;
    mac.update(payload);

    // Decode hex signature and use constant-time comparison via hmac::verify_slice
    let sig_bytes = hex::decode(signature_hex).map_err(|_| "Invalid signature hex")?;
    mac.verify_slice(&sig_bytes)
        .map_err(|_| "Webhook signature mismatch")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(payload: &[u8], secret: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn valid_signature_passes() {
        let payload = br#"{"event_name":"dish.availability_update"}"#;
        let sig = sign(payload, "whsec_test");
        assert!(verify_webhook_signature(payload, &sig, "whsec_test").is_ok());
    }

    #[test]
    fn tampered_payload_fails() {
        let sig = sign(b"original", "whsec_test");
        assert!(verify_webhook_signature(b"tampered", &sig, "whsec_test").is_err());
    }

    #[test]
    fn wrong_secret_fails() {
        let payload = b"payload";
        let sig = sign(payload, "whsec_test");
        assert!(verify_webhook_signature(payload, &sig, "whsec_other").is_err());
    }

    #[test]
    fn malformed_hex_fails() {
        assert!(verify_webhook_signature(b"payload", "not-hex!", "whsec_test").is_err());
    }

    #[test]
    fn unconfigured_client_reports_itself() {
        let client = PosClient::new(None, Some("key".into()));
        assert!(!client.is_configured());
        let client = PosClient::new(Some("https://pos.example".into()), Some("key".into()));
        assert!(client.is_configured());
    }
}
