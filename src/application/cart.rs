use crate::domain::cart::{Cart, CartLine, ProductSnapshot};
use crate::domain::ports::CartRepositoryBox;
use crate::error::Result;
use tracing::warn;

/// A shopper's cart backed by a durable `CartRepository`.
///
/// Every mutating operation updates the in-memory cart and then rewrites the persisted
/// copy. Operations on unknown product ids change nothing and skip the write.
pub struct CartStore {
    repository: CartRepositoryBox,
    cart: Cart,
}

impl CartStore {
    /// Loads the persisted cart. A missing or unreadable cart starts empty.
    pub async fn load(repository: CartRepositoryBox) -> Self {
        let cart = match repository.load().await {
            Ok(lines) => Cart::from_lines(lines),
            Err(e) => {
                warn!(error = %e, "persisted cart unreadable, starting with an empty cart");
                Cart::new()
            }
        };
        Self { repository, cart }
    }

    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// `None` when the total does not fit in a `u64`.
    pub fn total(&self) -> Option<u64> {
        self.cart.total()
    }

    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    pub async fn add(&mut self, product_id: u64, snapshot: ProductSnapshot) -> Result<()> {
        self.cart.add(product_id, snapshot);
        self.persist().await
    }

    pub async fn increment(&mut self, product_id: u64) -> Result<()> {
        if self.cart.increment(product_id) {
            self.persist().await?;
        }
        Ok(())
    }

    pub async fn decrement(&mut self, product_id: u64) -> Result<()> {
        if self.cart.decrement(product_id) {
            self.persist().await?;
        }
        Ok(())
    }

    pub async fn remove(&mut self, product_id: u64) -> Result<()> {
        if self.cart.remove(product_id) {
            self.persist().await?;
        }
        Ok(())
    }

    pub async fn clear(&mut self) -> Result<()> {
        self.cart.clear();
        self.persist().await
    }

    async fn persist(&self) -> Result<()> {
        self.repository.save(self.cart.lines()).await
    }
}
