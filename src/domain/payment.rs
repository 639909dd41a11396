use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const COD_PAYMENT_PREFIX: &str = "COD-";
/// The `payment_mode` the backend records for cash-on-delivery orders.
pub const COD_PAYMENT_MODE: &str = "Cash on Delivery";
pub const DEFAULT_FAILURE_MESSAGE: &str = "Payment failed";
pub const CANCELLED_MESSAGE: &str = "Payment cancelled by user";
pub const COD_TRANSPORT_MESSAGE: &str = "Error processing your order";
pub const SESSION_TRANSPORT_MESSAGE: &str = "Error processing your payment request";
pub const VERIFY_TRANSPORT_MESSAGE: &str = "Payment verification failed";
pub const TIMEOUT_MESSAGE: &str = "Payment session timed out";

const SUCCESS_STATUS: &str = "success";

/// Characters left untouched by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Builds the local payment identifier recorded for cash-on-delivery orders.
///
/// No payment happens online, but the backend still requires an identifier.
/// The prefix keeps these apart from provider-issued ids (`pay_...`).
pub fn cod_payment_id(now: DateTime<Utc>) -> String {
    format!("{COD_PAYMENT_PREFIX}{}", now.timestamp_millis())
}

/// Handoff returned by the create-payment-session endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSession {
    pub key: String,
    /// Amount in minor units (paise).
    pub amount: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
}

/// What the hosted widget reports when it calls back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProviderResult {
    Success {
        payment_id: String,
        order_id: String,
        signature: String,
    },
    Failed {
        description: String,
    },
    Dismissed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Success,
    Failed,
    Cancelled,
}

/// Result of either payment branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentOutcome {
    pub payment_id: Option<String>,
    pub signature: Option<String>,
    pub status: PaymentStatus,
}

impl PaymentOutcome {
    pub fn from_provider(result: &ProviderResult) -> Self {
        match result {
            ProviderResult::Success {
                payment_id,
                signature,
                ..
            } => Self {
                payment_id: Some(payment_id.clone()),
                signature: Some(signature.clone()),
                status: PaymentStatus::Success,
            },
            ProviderResult::Failed { .. } => Self {
                payment_id: None,
                signature: None,
                status: PaymentStatus::Failed,
            },
            ProviderResult::Dismissed => Self {
                payment_id: None,
                signature: None,
                status: PaymentStatus::Cancelled,
            },
        }
    }
}

/// Backend reply shape shared by every endpoint.
///
/// Failure replies carry `redirect_url` and/or `message`. The session fields
/// are only present on create-payment-session replies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub order_id: Option<String>,
}

impl BackendResponse {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(SUCCESS_STATUS)
    }

    /// Best human-readable failure message, falling back to the default.
    pub fn failure_message(&self) -> &str {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_FAILURE_MESSAGE)
    }
}

/// Where the browser goes when the checkout ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RedirectTarget {
    Success { payment_id: String },
    Failure { message: String },
    /// URL chosen by the backend, used verbatim.
    Server { url: String },
}

impl RedirectTarget {
    pub fn failure(message: impl Into<String>) -> Self {
        RedirectTarget::Failure {
            message: message.into(),
        }
    }

    /// Failure target for a backend rejection: the server's `redirect_url`
    /// wins, then its `message`, then the default message.
    pub fn from_error_response(response: &BackendResponse) -> Self {
        match response.redirect_url.as_deref().filter(|u| !u.is_empty()) {
            Some(url) => RedirectTarget::Server {
                url: url.to_string(),
            },
            None => RedirectTarget::failure(response.failure_message()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RedirectTarget::Success { .. })
    }

    pub fn to_url(&self) -> String {
        match self {
            RedirectTarget::Success { payment_id } => format!("/payment-success/{payment_id}/"),
            RedirectTarget::Failure { message } => format!(
                "/payment-failure/?error_message={}",
                utf8_percent_encode(message, URI_COMPONENT)
            ),
            RedirectTarget::Server { url } => url.clone(),
        }
    }
}

impl fmt::Display for RedirectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_cod_payment_id_prefix() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(cod_payment_id(now), "COD-1700000000123");
    }

    #[test]
    fn test_failure_url_encoding() {
        assert_eq!(
            RedirectTarget::failure("Card declined").to_url(),
            "/payment-failure/?error_message=Card%20declined"
        );
        assert_eq!(
            RedirectTarget::failure(CANCELLED_MESSAGE).to_url(),
            "/payment-failure/?error_message=Payment%20cancelled%20by%20user"
        );
        assert_eq!(
            RedirectTarget::failure("a&b=c/d?(ok)!").to_url(),
            "/payment-failure/?error_message=a%26b%3Dc%2Fd%3F(ok)!"
        );
    }

    #[test]
    fn test_success_url() {
        let target = RedirectTarget::Success {
            payment_id: "pay_123".to_string(),
        };
        assert_eq!(target.to_url(), "/payment-success/pay_123/");
        assert!(target.is_success());
    }

    #[test]
    fn test_error_response_prefers_redirect_url() {
        let response = BackendResponse {
            status: Some("error".to_string()),
            redirect_url: Some("/cart".to_string()),
            message: Some("Out of stock".to_string()),
            ..Default::default()
        };
        assert_eq!(RedirectTarget::from_error_response(&response).to_url(), "/cart");
    }

    #[test]
    fn test_error_response_message_and_default() {
        let with_message = BackendResponse {
            message: Some("Out of stock".to_string()),
            ..Default::default()
        };
        assert_eq!(
            RedirectTarget::from_error_response(&with_message).to_url(),
            "/payment-failure/?error_message=Out%20of%20stock"
        );

        let empty = BackendResponse::default();
        assert_eq!(
            RedirectTarget::from_error_response(&empty).to_url(),
            "/payment-failure/?error_message=Payment%20failed"
        );
    }

    #[test]
    fn test_error_response_is_idempotent() {
        let response = BackendResponse {
            message: Some("Signature mismatch".to_string()),
            ..Default::default()
        };
        let first = RedirectTarget::from_error_response(&response).to_url();
        let second = RedirectTarget::from_error_response(&response).to_url();
        assert_eq!(first, second);
    }

    #[test]
    fn test_provider_result_deserialization() {
        let json = r#"{"event":"success","payment_id":"pay_1","order_id":"order_1","signature":"sig"}"#;
        let result: ProviderResult = serde_json::from_str(json).unwrap();
        assert_eq!(
            PaymentOutcome::from_provider(&result).status,
            PaymentStatus::Success
        );

        let dismissed: ProviderResult = serde_json::from_str(r#"{"event":"dismissed"}"#).unwrap();
        assert_eq!(dismissed, ProviderResult::Dismissed);
    }
}
