//! Runtime configuration.
//!
//! Loaded from an optional JSON file; every field has a default so a partial
//! file (or none at all) is valid. The CLI overrides individual values.

use crate::error::{CheckoutError, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub create_payment_session: String,
    pub place_cod_order: String,
    pub verify_payment: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            create_payment_session: "/proceed-to-pay".to_string(),
            place_cod_order: "/place-cod-order".to_string(),
            verify_payment: "/verify-payment/".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    /// Token the page was rendered with, passed through on every call.
    pub csrf_token: String,
    pub request_timeout_secs: Option<u64>,
    pub endpoints: EndpointConfig,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            csrf_token: String::new(),
            request_timeout_secs: None,
            endpoints: EndpointConfig::default(),
        }
    }
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Branding shown in the hosted widget.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MerchantConfig {
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub currency: String,
    pub theme_color: String,
}

impl Default for MerchantConfig {
    fn default() -> Self {
        Self {
            name: "ScentSpot".to_string(),
            description: "Purchase from ScentSpot".to_string(),
            image: None,
            currency: "INR".to_string(),
            theme_color: "#3399cc".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CheckoutConfig {
    pub backend: BackendConfig,
    pub merchant: MerchantConfig,
    /// How long to wait for the widget to call back. `None` waits forever.
    pub provider_timeout_secs: Option<u64>,
}

impl CheckoutConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn provider_timeout(&self) -> Option<Duration> {
        self.provider_timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.backend.base_url.trim().is_empty() {
            return Err(CheckoutError::Config("backend.base_url is empty".to_string()));
        }
        if self.merchant.currency != "INR" {
            return Err(CheckoutError::Config(format!(
                "unsupported currency '{}', only INR is supported",
                self.merchant.currency
            )));
        }
        if self.provider_timeout_secs == Some(0) {
            return Err(CheckoutError::Config(
                "provider_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
