use crate::domain::cart::CartLine;
use crate::domain::order::Order;
use crate::domain::ports::{CartRepository, CatalogSource, OrderLedger};
use crate::domain::product::Product;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// A thread-safe in-memory cart repository.
///
/// Clones share the same underlying cart, which lets tests inspect what a
/// `CartStore` persisted.
#[derive(Default, Clone)]
pub struct InMemoryCartRepository {
    lines: Arc<RwLock<Vec<CartLine>>>,
    saves: Arc<AtomicUsize>,
}

impl InMemoryCartRepository {
    /// Creates a new, empty in-memory cart repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository that already holds `lines`.
    pub fn with_lines(lines: Vec<CartLine>) -> Self {
        Self {
            lines: Arc::new(RwLock::new(lines)),
            saves: Arc::default(),
        }
    }

    /// Number of times `save` has been called.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CartRepository for InMemoryCartRepository {
    async fn load(&self) -> Result<Vec<CartLine>> {
        Ok(self.lines.read().await.clone())
    }

    async fn save(&self, lines: &[CartLine]) -> Result<()> {
        let mut stored = self.lines.write().await;
        *stored = lines.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A thread-safe in-memory order ledger.
///
/// Appends take the write lock, so concurrent appends from one process never lose records.
#[derive(Default, Clone)]
pub struct InMemoryOrderLedger {
    orders: Arc<RwLock<Vec<Order>>>,
}

impl InMemoryOrderLedger {
    /// Creates a new, empty in-memory ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderLedger for InMemoryOrderLedger {
    async fn append(&self, order: Order) -> Result<()> {
        self.orders.write().await.push(order);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.iter().rev().cloned().collect())
    }
}

/// A catalog backed by a fixed product list.
#[derive(Default, Clone)]
pub struct StaticCatalog {
    products: Arc<Vec<Product>>,
}

impl StaticCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(products),
        }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn load(&self) -> Result<Vec<Product>> {
        Ok(self.products.as_ref().clone())
    }
}
