use super::order::OrderDraft;
use super::payment::{BackendResponse, ProviderResult, ProviderSession, RedirectTarget};
use super::provider::ProviderOptions;
use crate::error::Result;
use async_trait::async_trait;

/// Body of a place-cod-order call.
#[derive(Debug, Clone, PartialEq)]
pub struct CodOrderRequest {
    pub draft: OrderDraft,
    pub payment_id: String,
}

/// Body of a verify-payment call.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationRequest {
    pub payment_id: String,
    pub order_id: String,
    pub signature: String,
    pub draft: OrderDraft,
}

/// The storefront endpoints the checkout talks to.
///
/// Implementations return `Ok` for any interpretable reply, including
/// rejections; `Err` means the call produced nothing usable.
#[async_trait]
pub trait CheckoutBackend: Send + Sync {
    async fn create_payment_session(&self, amount_minor: i64) -> Result<ProviderSession>;
    async fn place_cod_order(&self, request: CodOrderRequest) -> Result<BackendResponse>;
    async fn verify_payment(&self, request: VerificationRequest) -> Result<BackendResponse>;
}

/// The hosted checkout widget. `open` resolves when the widget calls back.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn open(&self, options: ProviderOptions) -> Result<ProviderResult>;
}

/// Performs the terminal full-page navigation.
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn navigate(&self, target: &RedirectTarget) -> Result<()>;
}

pub type CheckoutBackendBox = Box<dyn CheckoutBackend>;
pub type PaymentProviderBox = Box<dyn PaymentProvider>;
pub type NavigatorBox = Box<dyn Navigator>;
