use serde::Serialize;
use std::fmt;

/// Lifecycle of one checkout submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutState {
    #[default]
    Idle,
    Validating,
    CodSubmitting,
    ProviderHandoff,
    Verifying,
    Succeeded,
    Failed,
}

impl CheckoutState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CheckoutState::Succeeded | CheckoutState::Failed)
    }

    /// True when a new submission may start from this state.
    pub fn accepts_submit(&self) -> bool {
        *self == CheckoutState::Idle || self.is_terminal()
    }

    pub fn can_transition_to(&self, next: CheckoutState) -> bool {
        use CheckoutState::*;
        matches!(
            (self, next),
            (Idle | Succeeded | Failed, Validating)
                // Local validation failure keeps the customer on the form.
                | (Validating, Idle)
                | (Validating, CodSubmitting)
                | (Validating, ProviderHandoff)
                | (CodSubmitting, Succeeded | Failed)
                | (ProviderHandoff, Verifying | Failed)
                | (Verifying, Succeeded | Failed)
        )
    }
}

impl fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckoutState::Idle => "idle",
            CheckoutState::Validating => "validating",
            CheckoutState::CodSubmitting => "cod_submitting",
            CheckoutState::ProviderHandoff => "provider_handoff",
            CheckoutState::Verifying => "verifying",
            CheckoutState::Succeeded => "succeeded",
            CheckoutState::Failed => "failed",
        };
        f.write_str(name)
    }
}
