use super::auth::{Role, Session};
use super::cart::CartLine;
use super::order::{Amount, Order};
use super::payment::{GatewayError, PaymentOutcome};
use super::product::Product;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Supplies the full product list the catalog engine operates over.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn load(&self) -> Result<Vec<Product>>;
}

/// Durable storage for one shopper's cart.
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Returns the persisted lines, or an empty list when nothing was saved yet.
    async fn load(&self) -> Result<Vec<CartLine>>;
    /// Replaces the persisted cart with `lines`.
    async fn save(&self, lines: &[CartLine]) -> Result<()>;
}

/// Append-only record of completed orders.
#[async_trait]
pub trait OrderLedger: Send + Sync {
    async fn append(&self, order: Order) -> Result<()>;
    /// All orders, most recently appended first.
    async fn list_all(&self) -> Result<Vec<Order>>;
}

/// Executes a charge.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    fn name(&self) -> &'static str;
    async fn charge(&self, amount: Amount) -> std::result::Result<PaymentOutcome, GatewayError>;
}

/// Resolves the role of whoever is making the current request.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn current_role(&self) -> Role;
}

/// Issues and resolves session tokens.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn issue(&self, username: &str, role: Role) -> String;
    /// Returns `None` for unknown or expired tokens.
    async fn resolve(&self, token: &str) -> Option<Session>;
}

pub type CatalogSourceBox = Box<dyn CatalogSource>;
pub type CartRepositoryBox = Box<dyn CartRepository>;
pub type OrderLedgerBox = Box<dyn OrderLedger>;
pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
pub type SessionStoreRef = Arc<dyn SessionStore>;

pub type CartRepositoryFactory = Box<dyn Fn(&str) -> CartRepositoryBox + Send + Sync>;
