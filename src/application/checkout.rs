use crate::application::cart::CartStore;
use crate::domain::order::{Address, Amount, Order, ValidationError};
use crate::domain::payment::{GatewayError, PaymentOutcome};
use crate::domain::ports::{OrderLedgerBox, PaymentGatewayBox};
use crate::infrastructure::gateway::mock::MockGateway;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Steps of a single checkout attempt.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutState {
    Idle,
    Validating,
    Charging,
    Persisting,
    Completed,
    Failed,
}

impl CheckoutState {
    pub fn can_transition_to(self, next: CheckoutState) -> bool {
        use CheckoutState::*;
        matches!(
            (self, next),
            (Idle, Validating)
                | (Validating, Charging)
                | (Validating, Failed)
                | (Charging, Persisting)
                | (Charging, Completed)
                | (Charging, Failed)
                | (Persisting, Completed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, CheckoutState::Completed | CheckoutState::Failed)
    }
}

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("Payment failed: {0}")]
    PaymentFailed(String),
    #[error("Payment gateway unavailable: {0}")]
    GatewayUnavailable(GatewayError),
}

/// Summary of a completed, paid checkout.
#[derive(Debug, PartialEq, Clone)]
pub struct Receipt {
    pub id: String,
    pub status: String,
    pub amount: Amount,
    pub address: Option<Address>,
    /// `false` when the payment went through but the order could not be recorded.
    pub order_saved: bool,
}

#[derive(Debug, PartialEq, Clone)]
pub enum CheckoutOutcome {
    Completed(Receipt),
    /// An external payment flow was started; cart and ledger were left untouched.
    Delegated {
        client_secret: String,
        publishable_key: String,
    },
}

/// Tracks the state of one checkout attempt. Every attempt starts at `Idle`.
#[derive(Debug)]
struct CheckoutRun {
    state: CheckoutState,
}

impl CheckoutRun {
    fn new() -> Self {
        Self {
            state: CheckoutState::Idle,
        }
    }

    fn advance(&mut self, next: CheckoutState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal checkout transition {:?} -> {:?}",
            self.state,
            next
        );
        debug!(from = ?self.state, to = ?next, "checkout transition");
        self.state = next;
    }

    fn fail(&mut self, err: CheckoutError) -> CheckoutError {
        self.advance(CheckoutState::Failed);
        info!(error = %err, "checkout failed");
        err
    }
}

/// Coordinates the cart, the payment gateway and the order ledger into one checkout.
///
/// Validation strictly precedes charging, which strictly precedes persisting. Gateway
/// errors are absorbed by retrying once on the fallback gateway (the mock gateway by
/// default). Ledger failures never undo a successful charge.
pub struct CheckoutOrchestrator {
    gateway: PaymentGatewayBox,
    fallback: PaymentGatewayBox,
    ledger: OrderLedgerBox,
}

impl CheckoutOrchestrator {
    pub fn new(gateway: PaymentGatewayBox, ledger: OrderLedgerBox) -> Self {
        Self {
            gateway,
            fallback: Box::new(MockGateway::new()),
            ledger,
        }
    }

    /// Replaces the gateway used when the primary gateway errors.
    pub fn with_fallback(mut self, fallback: PaymentGatewayBox) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn gateway_name(&self) -> &'static str {
        self.gateway.name()
    }

    /// Runs one checkout over the current contents of `cart`.
    ///
    /// On success the order is appended to the ledger and the cart is cleared.
    pub async fn checkout(
        &self,
        cart: &mut CartStore,
        amount: f64,
        address: &Address,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let mut run = CheckoutRun::new();

        run.advance(CheckoutState::Validating);
        let amount = match validate(cart, amount, address) {
            Ok(amount) => amount,
            Err(e) => return Err(run.fail(e.into())),
        };

        run.advance(CheckoutState::Charging);
        let outcome = match self.charge(amount).await {
            Ok(outcome) => outcome,
            Err(e) => return Err(run.fail(CheckoutError::GatewayUnavailable(e))),
        };

        let (id, status) = match outcome {
            PaymentOutcome::Succeeded { id, status } => (id, status),
            PaymentOutcome::Delegated {
                client_secret,
                publishable_key,
            } => {
                run.advance(CheckoutState::Completed);
                return Ok(CheckoutOutcome::Delegated {
                    client_secret,
                    publishable_key,
                });
            }
            PaymentOutcome::Failed { reason } => {
                return Err(run.fail(CheckoutError::PaymentFailed(reason)));
            }
        };

        run.advance(CheckoutState::Persisting);
        let address = address.trimmed();
        let order = Order::paid(id.clone(), cart.lines().to_vec(), amount, Some(address.clone()));
        let order_saved = match self.ledger.append(order).await {
            Ok(()) => true,
            Err(e) => {
                error!(order_id = %id, error = %e, "payment succeeded but the order could not be saved");
                false
            }
        };

        if let Err(e) = cart.clear().await {
            warn!(order_id = %id, error = %e, "failed to persist the cleared cart");
        }

        run.advance(CheckoutState::Completed);
        info!(order_id = %id, order_saved, "checkout completed");
        Ok(CheckoutOutcome::Completed(Receipt {
            id,
            status,
            amount,
            address: Some(address),
            order_saved,
        }))
    }

    async fn charge(&self, amount: Amount) -> Result<PaymentOutcome, GatewayError> {
        match self.gateway.charge(amount).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                warn!(
                    gateway = self.gateway.name(),
                    fallback = self.fallback.name(),
                    error = %e,
                    "payment gateway error, falling back"
                );
                self.fallback.charge(amount).await
            }
        }
    }
}

fn validate(cart: &CartStore, amount: f64, address: &Address) -> Result<Amount, ValidationError> {
    if cart.is_empty() {
        return Err(ValidationError::EmptyCart);
    }
    address.validate()?;
    if cart.total().is_none() {
        return Err(ValidationError::InvalidAmount);
    }
    Amount::try_from(amount)
}
