use crate::domain::payment::{BackendResponse, ProviderResult, ProviderSession, RedirectTarget};
use crate::domain::ports::{
    CheckoutBackend, CodOrderRequest, Navigator, PaymentProvider, VerificationRequest,
};
use crate::domain::provider::ProviderOptions;
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A call observed by [`ScriptedBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    CreateSession { amount_minor: i64 },
    PlaceCodOrder(CodOrderRequest),
    Verify(VerificationRequest),
}

#[derive(Debug, Clone)]
enum Reply<T> {
    Respond(T),
    Unreachable,
}

/// An in-memory backend that answers from a script and records every call.
///
/// Clones share the same script and call log, so a test can keep one handle
/// while the controller owns another. Endpoints with no scripted reply
/// behave like an unreachable server.
#[derive(Clone)]
pub struct ScriptedBackend {
    session: Arc<RwLock<Reply<ProviderSession>>>,
    cod: Arc<RwLock<Reply<BackendResponse>>>,
    verify: Arc<RwLock<Reply<BackendResponse>>>,
    calls: Arc<RwLock<Vec<BackendCall>>>,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self {
            session: Arc::new(RwLock::new(Reply::Unreachable)),
            cod: Arc::new(RwLock::new(Reply::Unreachable)),
            verify: Arc::new(RwLock::new(Reply::Unreachable)),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(self, session: ProviderSession) -> Self {
        Self {
            session: Arc::new(RwLock::new(Reply::Respond(session))),
            ..self
        }
    }

    pub fn with_cod_response(self, response: BackendResponse) -> Self {
        Self {
            cod: Arc::new(RwLock::new(Reply::Respond(response))),
            ..self
        }
    }

    pub fn with_verify_response(self, response: BackendResponse) -> Self {
        Self {
            verify: Arc::new(RwLock::new(Reply::Respond(response))),
            ..self
        }
    }

    pub async fn calls(&self) -> Vec<BackendCall> {
        self.calls.read().await.clone()
    }

    async fn record(&self, call: BackendCall) {
        self.calls.write().await.push(call);
    }
}

fn answer<T: Clone>(reply: &Reply<T>, endpoint: &str) -> Result<T> {
    match reply {
        Reply::Respond(value) => Ok(value.clone()),
        Reply::Unreachable => Err(CheckoutError::Transport(format!(
            "{endpoint}: connection refused"
        ))),
    }
}

#[async_trait]
impl CheckoutBackend for ScriptedBackend {
    async fn create_payment_session(&self, amount_minor: i64) -> Result<ProviderSession> {
        self.record(BackendCall::CreateSession { amount_minor }).await;
        answer(&*self.session.read().await, "create-payment-session")
    }

    async fn place_cod_order(&self, request: CodOrderRequest) -> Result<BackendResponse> {
        self.record(BackendCall::PlaceCodOrder(request)).await;
        answer(&*self.cod.read().await, "place-cod-order")
    }

    async fn verify_payment(&self, request: VerificationRequest) -> Result<BackendResponse> {
        self.record(BackendCall::Verify(request)).await;
        answer(&*self.verify.read().await, "verify-payment")
    }
}

/// A stand-in for the hosted widget that calls back with a fixed result.
///
/// `pending()` never calls back, like a tab left open on the widget.
#[derive(Clone)]
pub struct ScriptedProvider {
    result: Option<ProviderResult>,
    opened: Arc<RwLock<Vec<ProviderOptions>>>,
}

impl ScriptedProvider {
    pub fn new(result: ProviderResult) -> Self {
        Self {
            result: Some(result),
            opened: Arc::default(),
        }
    }

    pub fn succeeding(payment_id: &str, order_id: &str, signature: &str) -> Self {
        Self::new(ProviderResult::Success {
            payment_id: payment_id.to_string(),
            order_id: order_id.to_string(),
            signature: signature.to_string(),
        })
    }

    pub fn failing(description: &str) -> Self {
        Self::new(ProviderResult::Failed {
            description: description.to_string(),
        })
    }

    pub fn dismissed() -> Self {
        Self::new(ProviderResult::Dismissed)
    }

    pub fn pending() -> Self {
        Self {
            result: None,
            opened: Arc::default(),
        }
    }

    /// Options the widget was opened with, in order.
    pub async fn opened(&self) -> Vec<ProviderOptions> {
        self.opened.read().await.clone()
    }
}

#[async_trait]
impl PaymentProvider for ScriptedProvider {
    async fn open(&self, options: ProviderOptions) -> Result<ProviderResult> {
        self.opened.write().await.push(options);
        match &self.result {
            Some(result) => Ok(result.clone()),
            None => std::future::pending().await,
        }
    }
}

/// Records redirects instead of performing them.
#[derive(Default, Clone)]
pub struct RecordingNavigator {
    visited: Arc<RwLock<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn visited(&self) -> Vec<String> {
        self.visited.read().await.clone()
    }
}

#[async_trait]
impl Navigator for RecordingNavigator {
    async fn navigate(&self, target: &RedirectTarget) -> Result<()> {
        self.visited.write().await.push(target.to_url());
        Ok(())
    }
}
