use super::order::OrderDraft;
use super::payment::ProviderSession;
use crate::config::MerchantConfig;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prefill {
    pub name: String,
    pub email: String,
    pub contact: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub color: String,
}

/// Options handed to the hosted checkout widget.
///
/// Serializes to the JSON object the widget constructor expects. The success,
/// failure and dismiss handlers are not part of the value; they are the
/// outcomes of `PaymentProvider::open`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderOptions {
    /// Publishable key. Public by nature, not a credential.
    pub key: String,
    pub amount: i64,
    pub currency: String,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    pub prefill: Prefill,
    pub theme: Theme,
}

impl ProviderOptions {
    pub fn new(session: &ProviderSession, draft: &OrderDraft, merchant: &MerchantConfig) -> Self {
        Self {
            key: session.key.clone(),
            amount: session.amount,
            currency: merchant.currency.clone(),
            name: merchant.name.clone(),
            description: merchant.description.clone(),
            image: merchant.image.clone(),
            order_id: session.order_id.clone(),
            prefill: Prefill {
                name: draft.customer_name.clone(),
                email: draft.email.clone(),
                contact: draft.phone.clone(),
            },
            theme: Theme {
                color: merchant.theme_color.clone(),
            },
        }
    }
}
