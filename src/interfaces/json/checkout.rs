use crate::application::cart::CartStore;
use crate::application::checkout::{CheckoutError, CheckoutOrchestrator, CheckoutOutcome};
use crate::domain::cart::CartLine;
use crate::domain::order::{Address, Amount};
use crate::infrastructure::in_memory::InMemoryCartRepository;
use serde::{Deserialize, Serialize};

/// Body of a checkout request.
///
/// `amount` (also accepted as `total`) defaults to the cart total when omitted.
#[derive(Debug, Deserialize, PartialEq, Clone, Default)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub cart: Vec<CartLine>,
    #[serde(default, alias = "total")]
    pub amount: Option<f64>,
    #[serde(default)]
    pub address: Option<Address>,
}

#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSucceeded {
    pub success: bool,
    pub id: String,
    pub status: String,
    pub amount: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    pub order_saved: bool,
}

#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDelegated {
    pub stripe: bool,
    pub client_secret: String,
    pub publishable_key: String,
}

#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct CheckoutFailed {
    pub error: String,
}

/// Body of a checkout response: exactly one of the three shapes.
#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(untagged)]
pub enum CheckoutResponse {
    Success(PaymentSucceeded),
    Stripe(PaymentDelegated),
    Error(CheckoutFailed),
}

impl CheckoutResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, CheckoutResponse::Error(_))
    }
}

impl From<Result<CheckoutOutcome, CheckoutError>> for CheckoutResponse {
    fn from(result: Result<CheckoutOutcome, CheckoutError>) -> Self {
        match result {
            Ok(CheckoutOutcome::Completed(receipt)) => CheckoutResponse::Success(PaymentSucceeded {
                success: true,
                id: receipt.id,
                status: receipt.status,
                amount: receipt.amount,
                address: receipt.address,
                order_saved: receipt.order_saved,
            }),
            Ok(CheckoutOutcome::Delegated {
                client_secret,
                publishable_key,
            }) => CheckoutResponse::Stripe(PaymentDelegated {
                stripe: true,
                client_secret,
                publishable_key,
            }),
            Err(e) => CheckoutResponse::Error(CheckoutFailed {
                error: e.to_string(),
            }),
        }
    }
}

/// Runs a checkout for a cart supplied in the request body rather than a stored cart.
///
/// The submitted lines are normalised the same way a stored cart is: lines repeating a
/// product id are merged into the first one (quantities added) and `qty: 0` counts as 1.
/// The default amount and the recorded order both use the normalised cart. A cart whose
/// total overflows is rejected as an invalid amount.
pub async fn handle_checkout(
    orchestrator: &CheckoutOrchestrator,
    request: CheckoutRequest,
) -> CheckoutResponse {
    let mut cart = CartStore::load(Box::new(InMemoryCartRepository::with_lines(request.cart))).await;
    let amount = request
        .amount
        .unwrap_or_else(|| cart.total().map_or(0.0, |total| total as f64));
    let address = request.address.unwrap_or_default();
    orchestrator.checkout(&mut cart, amount, &address).await.into()
}
