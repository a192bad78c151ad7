use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status reported by gateways for an accepted payment.
pub const STATUS_SUCCEEDED: &str = "succeeded";

/// The result of asking a gateway to charge an amount.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PaymentOutcome {
    /// Payment accepted synchronously.
    Succeeded { id: String, status: String },
    /// An external flow was started and must be completed out-of-band.
    Delegated {
        client_secret: String,
        publishable_key: String,
    },
    /// The gateway declined the charge.
    Failed { reason: String },
}

/// Gateway-level failures. These never reach the shopper directly: checkout falls back
/// to the mock gateway when one occurs.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Gateway unavailable: {0}")]
    Unavailable(#[from] reqwest::Error),
    #[error("Gateway rejected the request with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("Gateway misconfigured: {0}")]
    Misconfigured(String),
}
