use crate::domain::auth::{AccessError, Role};
use crate::domain::order::Order;
use crate::domain::ports::{AuthProvider, OrderLedgerBox};
use tracing::warn;

/// Read-only view of the order ledger for the host role.
pub struct OrderHistory {
    ledger: OrderLedgerBox,
}

impl OrderHistory {
    pub fn new(ledger: OrderLedgerBox) -> Self {
        Self { ledger }
    }

    /// Lists every order, most recent first. Only `Role::Host` may list.
    ///
    /// A ledger that cannot be read yields an empty list.
    pub async fn list(&self, auth: &dyn AuthProvider) -> Result<Vec<Order>, AccessError> {
        if auth.current_role().await != Role::Host {
            return Err(AccessError::Forbidden);
        }
        match self.ledger.list_all().await {
            Ok(orders) => Ok(orders),
            Err(e) => {
                warn!(error = %e, "order ledger unreadable, returning no orders");
                Ok(Vec::new())
            }
        }
    }
}
