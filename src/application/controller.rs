use crate::config::{CheckoutConfig, MerchantConfig};
use crate::domain::order::{OrderDraft, OrderForm, PaymentMethod};
use crate::domain::payment::{
    CANCELLED_MESSAGE, COD_TRANSPORT_MESSAGE, DEFAULT_FAILURE_MESSAGE, PaymentOutcome,
    ProviderResult, RedirectTarget, SESSION_TRANSPORT_MESSAGE, TIMEOUT_MESSAGE,
    VERIFY_TRANSPORT_MESSAGE, cod_payment_id,
};
use crate::domain::ports::{
    CheckoutBackendBox, CodOrderRequest, NavigatorBox, PaymentProviderBox, VerificationRequest,
};
use crate::domain::provider::ProviderOptions;
use crate::domain::state::CheckoutState;
use crate::error::{CheckoutError, Result};
use chrono::Utc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Drives one checkout submission from the submit click to the terminal
/// redirect.
///
/// The controller owns the backend, the hosted widget and the navigator.
/// Every submission ends in exactly one navigation, except for local
/// validation failures which return `CheckoutError::Validation` and leave the
/// customer on the form.
pub struct CheckoutController {
    backend: CheckoutBackendBox,
    provider: PaymentProviderBox,
    navigator: NavigatorBox,
    merchant: MerchantConfig,
    provider_timeout: Option<Duration>,
    state: RwLock<CheckoutState>,
}

impl CheckoutController {
    /// Creates a controller in the `Idle` state.
    ///
    /// # Arguments
    ///
    /// * `backend` - The storefront endpoints.
    /// * `provider` - The hosted checkout widget.
    /// * `navigator` - Performs the terminal redirect.
    /// * `config` - Merchant branding and the optional widget timeout.
    pub fn new(
        backend: CheckoutBackendBox,
        provider: PaymentProviderBox,
        navigator: NavigatorBox,
        config: &CheckoutConfig,
    ) -> Self {
        Self {
            backend,
            provider,
            navigator,
            merchant: config.merchant.clone(),
            provider_timeout: config.provider_timeout(),
            state: RwLock::new(CheckoutState::Idle),
        }
    }

    pub async fn state(&self) -> CheckoutState {
        *self.state.read().await
    }

    /// Submits raw form input. Validation happens before any network call.
    #[instrument(skip_all)]
    pub async fn submit_form(&self, form: OrderForm) -> Result<RedirectTarget> {
        self.begin().await?;
        let draft = match OrderDraft::from_form(form) {
            Ok(draft) => draft,
            Err(e) => return self.reject_locally(e).await,
        };
        self.run(draft).await
    }

    /// Submits an already-built draft.
    #[instrument(skip_all, fields(method = ?draft.payment_method))]
    pub async fn submit(&self, draft: OrderDraft) -> Result<RedirectTarget> {
        self.begin().await?;
        if let Err(e) = draft.validate() {
            return self.reject_locally(e).await;
        }
        self.run(draft).await
    }

    async fn run(&self, draft: OrderDraft) -> Result<RedirectTarget> {
        match draft.payment_method {
            PaymentMethod::CashOnDelivery => self.pay_on_delivery(draft).await,
            PaymentMethod::HostedPayment => {
                let amount_minor = match draft.total.to_minor_units() {
                    Ok(amount) => amount,
                    Err(e) => return self.reject_locally(e).await,
                };
                self.pay_hosted(draft, amount_minor).await
            }
        }
    }

    async fn pay_on_delivery(&self, draft: OrderDraft) -> Result<RedirectTarget> {
        self.transition(CheckoutState::CodSubmitting).await?;

        let payment_id = cod_payment_id(Utc::now());
        let request = CodOrderRequest {
            draft,
            payment_id: payment_id.clone(),
        };

        match self.backend.place_cod_order(request).await {
            Ok(response) if response.is_success() => {
                let target = match response.redirect_url.filter(|url| !url.is_empty()) {
                    Some(url) => RedirectTarget::Server { url },
                    None => RedirectTarget::Success { payment_id },
                };
                self.finish(CheckoutState::Succeeded, target).await
            }
            Ok(response) => {
                let error = CheckoutError::Rejected(response.failure_message().to_string());
                warn!(%error, status = ?response.status, "COD order rejected");
                self.finish(
                    CheckoutState::Failed,
                    RedirectTarget::from_error_response(&response),
                )
                .await
            }
            Err(e) => {
                warn!(error = %e, "COD order request failed");
                self.finish(
                    CheckoutState::Failed,
                    RedirectTarget::failure(COD_TRANSPORT_MESSAGE),
                )
                .await
            }
        }
    }

    async fn pay_hosted(&self, draft: OrderDraft, amount_minor: i64) -> Result<RedirectTarget> {
        self.transition(CheckoutState::ProviderHandoff).await?;

        let session = match self.backend.create_payment_session(amount_minor).await {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "payment session request failed");
                return self
                    .finish(
                        CheckoutState::Failed,
                        RedirectTarget::failure(SESSION_TRANSPORT_MESSAGE),
                    )
                    .await;
            }
        };
        if session.amount != amount_minor {
            warn!(
                requested = amount_minor,
                session = session.amount,
                "session amount differs from cart total"
            );
        }

        let options = ProviderOptions::new(&session, &draft, &self.merchant);
        let result = match self.await_provider(options).await {
            Some(Ok(result)) => result,
            Some(Err(e)) => {
                warn!(error = %e, "payment widget failed to open");
                return self
                    .finish(
                        CheckoutState::Failed,
                        RedirectTarget::failure(DEFAULT_FAILURE_MESSAGE),
                    )
                    .await;
            }
            None => {
                warn!(timeout = ?self.provider_timeout, "payment widget timed out");
                return self
                    .finish(CheckoutState::Failed, RedirectTarget::failure(TIMEOUT_MESSAGE))
                    .await;
            }
        };
        debug!(outcome = ?PaymentOutcome::from_provider(&result), "widget called back");

        match result {
            ProviderResult::Success {
                payment_id,
                order_id,
                signature,
            } => {
                self.verify(VerificationRequest {
                    payment_id,
                    order_id,
                    signature,
                    draft,
                })
                .await
            }
            ProviderResult::Failed { description } => {
                let error = CheckoutError::Provider(description.clone());
                info!(%error, "payment failed at provider");
                let message = if description.trim().is_empty() {
                    DEFAULT_FAILURE_MESSAGE.to_string()
                } else {
                    description
                };
                self.finish(CheckoutState::Failed, RedirectTarget::failure(message))
                    .await
            }
            ProviderResult::Dismissed => {
                let error = CheckoutError::Provider(CANCELLED_MESSAGE.to_string());
                info!(%error, "payment widget dismissed");
                self.finish(CheckoutState::Failed, RedirectTarget::failure(CANCELLED_MESSAGE))
                    .await
            }
        }
    }

    /// Opens the widget. `None` means the configured timeout elapsed first.
    async fn await_provider(&self, options: ProviderOptions) -> Option<Result<ProviderResult>> {
        let open = self.provider.open(options);
        match self.provider_timeout {
            Some(limit) => tokio::time::timeout(limit, open).await.ok(),
            None => Some(open.await),
        }
    }

    async fn verify(&self, request: VerificationRequest) -> Result<RedirectTarget> {
        self.transition(CheckoutState::Verifying).await?;
        let payment_id = request.payment_id.clone();

        match self.backend.verify_payment(request).await {
            Ok(response) if response.is_success() => {
                if let Some(confirmed) = response.payment_id.as_deref()
                    && confirmed != payment_id
                {
                    warn!(%confirmed, widget = %payment_id, "verified payment id differs");
                }
                self.finish(
                    CheckoutState::Succeeded,
                    RedirectTarget::Success { payment_id },
                )
                .await
            }
            Ok(response) => {
                let error = CheckoutError::Verification(response.failure_message().to_string());
                warn!(%error, status = ?response.status, "payment verification rejected");
                self.finish(
                    CheckoutState::Failed,
                    RedirectTarget::from_error_response(&response),
                )
                .await
            }
            Err(e) => {
                warn!(error = %e, "payment verification request failed");
                self.finish(
                    CheckoutState::Failed,
                    RedirectTarget::failure(VERIFY_TRANSPORT_MESSAGE),
                )
                .await
            }
        }
    }

    /// Claims the controller for a new submission.
    async fn begin(&self) -> Result<()> {
        let mut state = self.state.write().await;
        let current = *state;
        if !current.accepts_submit() {
            return Err(CheckoutError::SubmissionInProgress(current));
        }
        debug!(from = %current, to = %CheckoutState::Validating, "transition");
        *state = CheckoutState::Validating;
        Ok(())
    }

    async fn reject_locally(&self, error: CheckoutError) -> Result<RedirectTarget> {
        info!(%error, "checkout form rejected");
        self.transition(CheckoutState::Idle).await?;
        Err(error)
    }

    async fn transition(&self, next: CheckoutState) -> Result<()> {
        let mut state = self.state.write().await;
        let current = *state;
        if !current.can_transition_to(next) {
            return Err(CheckoutError::InvalidTransition {
                from: current,
                to: next,
            });
        }
        debug!(from = %current, to = %next, "transition");
        *state = next;
        Ok(())
    }

    async fn finish(
        &self,
        terminal: CheckoutState,
        target: RedirectTarget,
    ) -> Result<RedirectTarget> {
        self.transition(terminal).await?;
        info!(state = %terminal, url = %target, "checkout finished");
        self.navigator.navigate(&target).await?;
        Ok(target)
    }
}
