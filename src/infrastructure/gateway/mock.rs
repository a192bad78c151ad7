use crate::domain::order::Amount;
use crate::domain::payment::{GatewayError, PaymentOutcome, STATUS_SUCCEEDED};
use crate::domain::ports::PaymentGateway;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generates a payment id that is unique within this process.
///
/// The millisecond timestamp keeps ids roughly sortable; the sequence suffix keeps
/// two charges within the same millisecond apart.
pub fn next_payment_id() -> String {
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("MOCKPAY_{}_{}", Utc::now().timestamp_millis(), seq)
}

/// Accepts every charge immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockGateway;

impl MockGateway {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn charge(&self, amount: Amount) -> Result<PaymentOutcome, GatewayError> {
        let id = next_payment_id();
        debug!(payment_id = %id, amount = %amount.value(), "mock payment accepted");
        Ok(PaymentOutcome::Succeeded {
            id,
            status: STATUS_SUCCEEDED.to_string(),
        })
    }
}
