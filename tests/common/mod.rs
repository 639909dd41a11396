#![allow(dead_code)]

use checkout_flow::application::controller::CheckoutController;
use checkout_flow::config::CheckoutConfig;
use checkout_flow::domain::order::{Amount, OrderDraft, OrderForm, PaymentMethod};
use checkout_flow::infrastructure::in_memory::{
    RecordingNavigator, ScriptedBackend, ScriptedProvider,
};
use rust_decimal::Decimal;
use std::str::FromStr;

pub fn sample_form(total: &str, payment_method: &str) -> OrderForm {
    OrderForm {
        fname: "Asha Rao".to_string(),
        email: "asha@example.com".to_string(),
        phone: "9876543210".to_string(),
        address: "12 MG Road, Bengaluru".to_string(),
        total: total.to_string(),
        payment_method: payment_method.to_string(),
    }
}

pub fn sample_draft(total: &str, payment_method: PaymentMethod) -> OrderDraft {
    OrderDraft {
        customer_name: "Asha Rao".to_string(),
        email: "asha@example.com".to_string(),
        phone: "9876543210".to_string(),
        address: "12 MG Road, Bengaluru".to_string(),
        total: Amount::new(Decimal::from_str(total).unwrap()).unwrap(),
        payment_method,
    }
}

pub struct Harness {
    pub backend: ScriptedBackend,
    pub provider: ScriptedProvider,
    pub navigator: RecordingNavigator,
    pub controller: CheckoutController,
}

pub fn harness(backend: ScriptedBackend, provider: ScriptedProvider) -> Harness {
    harness_with_config(backend, provider, CheckoutConfig::default())
}

pub fn harness_with_config(
    backend: ScriptedBackend,
    provider: ScriptedProvider,
    config: CheckoutConfig,
) -> Harness {
    let navigator = RecordingNavigator::new();
    let controller = CheckoutController::new(
        Box::new(backend.clone()),
        Box::new(provider.clone()),
        Box::new(navigator.clone()),
        &config,
    );
    Harness {
        backend,
        provider,
        navigator,
        controller,
    }
}
