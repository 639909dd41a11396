use crate::domain::state::CheckoutState;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Backend rejected request: {0}")]
    Rejected(String),
    #[error("Provider error: {0}")]
    Provider(String),
    #[error("Verification failed: {0}")]
    Verification(String),
    #[error("A checkout submission is already in progress ({0})")]
    SubmissionInProgress(CheckoutState),
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition {
        from: CheckoutState,
        to: CheckoutState,
    },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
