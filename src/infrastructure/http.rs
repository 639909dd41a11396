use crate::config::BackendConfig;
use crate::domain::payment::{BackendResponse, COD_PAYMENT_MODE, ProviderSession};
use crate::domain::ports::{CheckoutBackend, CodOrderRequest, VerificationRequest};
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

const CSRF_HEADER: &str = "X-CSRFToken";
const CSRF_FIELD: &str = "csrfmiddlewaretoken";

/// Talks to the storefront over HTTP.
///
/// Every call is a form-encoded `POST` carrying the page's CSRF token as both
/// a header and a form field.
#[derive(Debug, Clone)]
pub struct HttpCheckoutBackend {
    client: Client,
    config: BackendConfig,
}

impl HttpCheckoutBackend {
    pub fn new(config: BackendConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Posts a form and parses the reply.
    ///
    /// Replies with an error status still count as answers when their body
    /// parses; anything else is a transport error.
    async fn post_form(
        &self,
        path: &str,
        mut fields: Vec<(&str, String)>,
    ) -> Result<BackendResponse> {
        fields.push((CSRF_FIELD, self.config.csrf_token.clone()));
        let url = self.url(path);

        let response = self
            .client
            .post(&url)
            .header(CSRF_HEADER, &self.config.csrf_token)
            .form(&fields)
            .send()
            .await
            .map_err(|e| CheckoutError::Transport(format!("{url}: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CheckoutError::Transport(format!("{url}: {e}")))?;
        debug!(%url, %status, "backend replied");

        serde_json::from_str(&body).map_err(|e| {
            CheckoutError::Transport(format!("{url}: malformed response ({status}): {e}"))
        })
    }
}

#[async_trait]
impl CheckoutBackend for HttpCheckoutBackend {
    async fn create_payment_session(&self, amount_minor: i64) -> Result<ProviderSession> {
        let path = self.config.endpoints.create_payment_session.clone();
        let response = self
            .post_form(&path, vec![("total", amount_minor.to_string())])
            .await?;

        match (response.key, response.amount) {
            (Some(key), Some(amount)) => Ok(ProviderSession {
                key,
                amount,
                order_id: response.order_id,
            }),
            _ => Err(CheckoutError::Transport(format!(
                "{path}: session reply is missing key or amount"
            ))),
        }
    }

    async fn place_cod_order(&self, request: CodOrderRequest) -> Result<BackendResponse> {
        let draft = request.draft;
        let fields = vec![
            ("fname", draft.customer_name),
            ("email", draft.email),
            ("phone", draft.phone),
            ("address", draft.address),
            ("total", draft.total.to_string()),
            ("payment_mode", COD_PAYMENT_MODE.to_string()),
            ("payment_id", request.payment_id),
        ];
        self.post_form(&self.config.endpoints.place_cod_order, fields)
            .await
    }

    async fn verify_payment(&self, request: VerificationRequest) -> Result<BackendResponse> {
        let draft = request.draft;
        let fields = vec![
            ("payment_id", request.payment_id),
            ("order_id", request.order_id),
            ("signature", request.signature),
            ("fname", draft.customer_name),
            ("email", draft.email),
            ("phone", draft.phone),
            ("address", draft.address),
        ];
        self.post_form(&self.config.endpoints.verify_payment, fields)
            .await
    }
}
