use crate::domain::order::Amount;
use crate::domain::payment::{GatewayError, PaymentOutcome};
use crate::domain::ports::PaymentGateway;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";
pub const DEFAULT_CURRENCY: &str = "inr";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings for a Stripe-compatible payments API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalGatewayConfig {
    /// API root, e.g. `"https://api.stripe.com"`.
    pub api_base: String,
    /// Secret key sent as a bearer token.
    pub secret_key: String,
    /// Key handed back to the caller to finish the payment client-side.
    pub publishable_key: String,
    /// Three-letter currency code charged in.
    pub currency: String,
    /// Upper bound on each request, connect included.
    pub timeout: Duration,
}

impl ExternalGatewayConfig {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            secret_key: secret_key.into(),
            publishable_key: String::new(),
            currency: DEFAULT_CURRENCY.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Starts an asynchronous payment by creating a remote payment intent.
///
/// A created intent is reported as `PaymentOutcome::Delegated`: the caller completes
/// the payment out-of-band with the returned client secret.
#[derive(Debug, Clone)]
pub struct ExternalGateway {
    config: ExternalGatewayConfig,
    http: Client,
}

impl ExternalGateway {
    pub fn new(config: ExternalGatewayConfig) -> Result<Self, GatewayError> {
        if config.secret_key.trim().is_empty() {
            return Err(GatewayError::Misconfigured("missing secret key".to_string()));
        }
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Misconfigured(e.to_string()))?;
        Ok(Self { config, http })
    }

    fn intents_url(&self) -> String {
        format!(
            "{}/v1/payment_intents",
            self.config.api_base.trim_end_matches('/')
        )
    }
}

#[derive(Debug, Deserialize)]
struct PaymentIntent {
    id: Option<String>,
    client_secret: String,
}

#[async_trait]
impl PaymentGateway for ExternalGateway {
    fn name(&self) -> &'static str {
        "external"
    }

    async fn charge(&self, amount: Amount) -> Result<PaymentOutcome, GatewayError> {
        let minor_units = amount.to_minor_units().ok_or_else(|| {
            GatewayError::Misconfigured(format!("amount {} out of range", amount.value()))
        })?;

        let response = self
            .http
            .post(self.intents_url())
            .bearer_auth(&self.config.secret_key)
            .form(&[
                ("amount", minor_units.to_string()),
                ("currency", self.config.currency.clone()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected { status, body });
        }

        let intent: PaymentIntent = response.json().await?;
        debug!(intent_id = ?intent.id, minor_units, "payment intent created");

        Ok(PaymentOutcome::Delegated {
            client_secret: intent.client_secret,
            publishable_key: self.config.publishable_key.clone(),
        })
    }
}
