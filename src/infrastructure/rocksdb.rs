use crate::domain::cart::CartLine;
use crate::domain::order::Order;
use crate::domain::ports::{CartRepository, OrderLedger};
use crate::error::{Result, StoreError};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, IteratorMode, Options};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::warn;

/// Column Family for storing one cart per shopper.
pub const CF_CARTS: &str = "carts";
/// Column Family for the order ledger, keyed by big-endian append sequence.
pub const CF_ORDERS: &str = "orders";

fn missing_cf(name: &str) -> StoreError {
    StoreError::InternalError(Box::new(std::io::Error::other(format!(
        "{name} column family not found"
    ))))
}

/// A persistent store implementation using RocksDB.
///
/// Carts and orders live in separate Column Families. Orders are keyed by a
/// monotonically increasing sequence number, so key order is append order.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    writer: Arc<Mutex<()>>,
    next_seq: Arc<AtomicU64>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families ("carts" and "orders") exist and
    /// resumes the order sequence after the last stored key.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_carts = ColumnFamilyDescriptor::new(CF_CARTS, Options::default());
        let cf_orders = ColumnFamilyDescriptor::new(CF_ORDERS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_carts, cf_orders])?;

        let next_seq = {
            let cf = db.cf_handle(CF_ORDERS).ok_or_else(|| missing_cf(CF_ORDERS))?;
            match db.iterator_cf(&cf, IteratorMode::End).next() {
                Some(item) => {
                    let (key, _) = item?;
                    let bytes: [u8; 8] = key.as_ref().try_into().map_err(|_| {
                        StoreError::InternalError(Box::new(std::io::Error::other(
                            "malformed order key",
                        )))
                    })?;
                    u64::from_be_bytes(bytes) + 1
                }
                None => 0,
            }
        };

        Ok(Self {
            db: Arc::new(db),
            writer: Arc::new(Mutex::new(())),
            next_seq: Arc::new(AtomicU64::new(next_seq)),
        })
    }

    /// A cart repository for `shopper` backed by this database.
    pub fn cart_repository(&self, shopper: &str) -> RocksDBCartRepository {
        RocksDBCartRepository {
            store: self.clone(),
            shopper: shopper.to_string(),
        }
    }
}

#[async_trait]
impl OrderLedger for RocksDBStore {
    async fn append(&self, order: Order) -> Result<()> {
        let value = serde_json::to_vec(&order)?;

        let _guard = self.writer.lock().await;
        let cf = self
            .db
            .cf_handle(CF_ORDERS)
            .ok_or_else(|| missing_cf(CF_ORDERS))?;
        let seq = self.next_seq.load(Ordering::SeqCst);
        self.db.put_cf(&cf, seq.to_be_bytes(), value)?;
        self.next_seq.store(seq + 1, Ordering::SeqCst);
        Ok(())
    }

    /// Newest first. Records that no longer decode are logged and skipped.
    async fn list_all(&self) -> Result<Vec<Order>> {
        let cf = self
            .db
            .cf_handle(CF_ORDERS)
            .ok_or_else(|| missing_cf(CF_ORDERS))?;

        let mut orders = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::End) {
            let (key, value) = item?;
            match serde_json::from_slice::<Order>(&value) {
                Ok(order) => orders.push(order),
                Err(e) => warn!(
                    key = ?key,
                    error = %e,
                    "skipping malformed order record"
                ),
            }
        }
        Ok(orders)
    }
}

/// One shopper's cart stored under its shopper id in the "carts" column family.
#[derive(Clone)]
pub struct RocksDBCartRepository {
    store: RocksDBStore,
    shopper: String,
}

#[async_trait]
impl CartRepository for RocksDBCartRepository {
    async fn load(&self) -> Result<Vec<CartLine>> {
        let cf = self
            .store
            .db
            .cf_handle(CF_CARTS)
            .ok_or_else(|| missing_cf(CF_CARTS))?;
        match self.store.db.get_cf(&cf, self.shopper.as_bytes())? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, lines: &[CartLine]) -> Result<()> {
        let cf = self
            .store
            .db
            .cf_handle(CF_CARTS)
            .ok_or_else(|| missing_cf(CF_CARTS))?;
        let value = serde_json::to_vec(lines)?;
        self.store.db.put_cf(&cf, self.shopper.as_bytes(), value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::Amount;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn order(id: &str) -> Order {
        Order::paid(id.to_string(), vec![], Amount::new(dec!(99)).unwrap(), None)
    }

    #[tokio::test]
    async fn test_rocksdb_open_cf() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).expect("Failed to open RocksDB");

        assert!(store.db.cf_handle(CF_CARTS).is_some());
        assert!(store.db.cf_handle(CF_ORDERS).is_some());
    }

    #[tokio::test]
    async fn test_rocksdb_cart_repository() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();
        let alice = store.cart_repository("alice");
        let bob = store.cart_repository("bob");

        let line = CartLine {
            id: 3,
            name: "BassPro Audio Model 1003".to_string(),
            price: 1_900,
            image: "/images/headphones.svg".to_string(),
            qty: 2,
        };
        alice.save(std::slice::from_ref(&line)).await.unwrap();

        assert_eq!(alice.load().await.unwrap(), vec![line]);
        assert!(bob.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rocksdb_ledger_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = RocksDBStore::open(dir.path()).unwrap();
            store.append(order("a")).await.unwrap();
            store.append(order("b")).await.unwrap();
        }

        let store = RocksDBStore::open(dir.path()).unwrap();
        store.append(order("c")).await.unwrap();

        let ids: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_rocksdb_ledger_skips_unreadable_records() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();
        store.append(order("a")).await.unwrap();
        {
            let cf = store.db.cf_handle(CF_ORDERS).unwrap();
            store.db.put_cf(&cf, 1u64.to_be_bytes(), b"{\"id\":").unwrap();
            store.next_seq.store(2, Ordering::SeqCst);
        }
        store.append(order("c")).await.unwrap();

        let ids: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec!["c", "a"]);
    }
}
