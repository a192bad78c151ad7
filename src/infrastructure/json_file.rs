use crate::domain::cart::CartLine;
use crate::domain::order::Order;
use crate::domain::ports::{CartRepository, OrderLedger};
use crate::error::Result;
use async_trait::async_trait;
use std::io::{ErrorKind, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::warn;

/// File name of the order log inside the data directory.
pub const ORDERS_FILE: &str = "orders.jsonl";
/// Directory holding one cart file per shopper.
pub const CARTS_DIR: &str = "carts";

/// Reads a file as raw bytes, mapping "not found" to `None`.
async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match tokio::fs::read(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Keeps shopper identities usable as file names.
fn sanitize(shopper: &str) -> String {
    let cleaned: String = shopper
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "guest".to_string()
    } else {
        cleaned
    }
}

/// Stores one shopper's cart as a JSON array.
///
/// Saves write a temporary file next to the target and rename it into place, so a
/// crash mid-write leaves the previous cart intact.
#[derive(Debug, Clone)]
pub struct JsonFileCartRepository {
    path: PathBuf,
}

impl JsonFileCartRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The cart file for `shopper` under `data_dir`.
    pub fn for_shopper<P: AsRef<Path>>(data_dir: P, shopper: &str) -> Self {
        Self::new(
            data_dir
                .as_ref()
                .join(CARTS_DIR)
                .join(format!("{}.json", sanitize(shopper))),
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CartRepository for JsonFileCartRepository {
    async fn load(&self) -> Result<Vec<CartLine>> {
        match read_optional(&self.path).await? {
            Some(content) if !content.trim_ascii().is_empty() => {
                Ok(serde_json::from_slice(&content)?)
            }
            _ => Ok(Vec::new()),
        }
    }

    async fn save(&self, lines: &[CartLine]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(lines)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let dir = match path.parent() {
                Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
                _ => PathBuf::from("."),
            };
            std::fs::create_dir_all(&dir)?;
            let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
            tmp.write_all(&bytes)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path)?;
            Ok(())
        })
        .await?
    }
}

/// Append-only order log in JSON Lines format, one order per line.
///
/// Appends are serialized through a single-writer lock. Reads take no lock: a line
/// that fails to parse (for instance one still being written, possibly cut inside a
/// multibyte character) is skipped.
#[derive(Debug, Clone)]
pub struct JsonFileOrderLedger {
    path: PathBuf,
    writer: Arc<Mutex<()>>,
}

impl JsonFileOrderLedger {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// The order log under `data_dir`.
    pub fn in_dir<P: AsRef<Path>>(data_dir: P) -> Self {
        Self::new(data_dir.as_ref().join(ORDERS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl OrderLedger for JsonFileOrderLedger {
    async fn append(&self, order: Order) -> Result<()> {
        let mut line = serde_json::to_vec(&order)?;
        line.push(b'\n');

        let _guard = self.writer.lock().await;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .await?;

        // A torn record from an earlier crash must not swallow this one.
        let len = file.metadata().await?.len();
        if len > 0 {
            file.seek(SeekFrom::Start(len - 1)).await?;
            let mut last = [0u8; 1];
            file.read_exact(&mut last).await?;
            if last[0] != b'\n' {
                line.insert(0, b'\n');
            }
        }
        file.write_all(&line).await?;
        file.flush().await?;
        file.sync_data().await?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Order>> {
        let Some(content) = read_optional(&self.path).await? else {
            return Ok(Vec::new());
        };

        // Split on raw bytes: a torn tail may end inside a multibyte character.
        let mut orders = Vec::new();
        for (index, line) in content.split(|b| *b == b'\n').enumerate() {
            if line.trim_ascii().is_empty() {
                continue;
            }
            match serde_json::from_slice::<Order>(line) {
                Ok(order) => orders.push(order),
                Err(e) => warn!(
                    path = %self.path.display(),
                    line = index + 1,
                    error = %e,
                    "skipping malformed order record"
                ),
            }
        }
        orders.reverse();
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{Address, Amount};
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn line(id: u64, qty: u32) -> CartLine {
        CartLine {
            id,
            name: format!("Ultra Computers Model {}", 1000 + id),
            price: 40_000,
            image: "/images/laptop.svg".to_string(),
            qty,
        }
    }

    fn order(id: &str) -> Order {
        Order::paid(
            id.to_string(),
            vec![line(1, 1)],
            Amount::new(dec!(40000)).unwrap(),
            None,
        )
    }

    #[test]
    fn test_sanitize_shopper() {
        assert_eq!(sanitize("alice"), "alice");
        assert_eq!(sanitize("../etc/passwd"), "___etc_passwd");
        assert_eq!(sanitize(""), "guest");
    }

    #[tokio::test]
    async fn test_cart_file_round_trip() {
        let dir = tempdir().unwrap();
        let repository = JsonFileCartRepository::for_shopper(dir.path(), "alice");

        assert!(repository.load().await.unwrap().is_empty());

        let lines = vec![line(1, 2), line(2, 1)];
        repository.save(&lines).await.unwrap();
        assert_eq!(repository.load().await.unwrap(), lines);
        assert!(repository.path().ends_with("carts/alice.json"));
    }

    #[tokio::test]
    async fn test_corrupt_cart_file_is_an_error() {
        let dir = tempdir().unwrap();
        let repository = JsonFileCartRepository::new(dir.path().join("cart.json"));
        std::fs::write(repository.path(), "{not json").unwrap();

        assert!(repository.load().await.is_err());
    }

    #[tokio::test]
    async fn test_ledger_append_and_list() {
        let dir = tempdir().unwrap();
        let ledger = JsonFileOrderLedger::in_dir(dir.path());

        assert!(ledger.list_all().await.unwrap().is_empty());

        ledger.append(order("first")).await.unwrap();
        ledger.append(order("second")).await.unwrap();

        let reopened = JsonFileOrderLedger::in_dir(dir.path());
        let ids: Vec<String> = reopened
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_ledger_skips_torn_lines() {
        let dir = tempdir().unwrap();
        let ledger = JsonFileOrderLedger::in_dir(dir.path());
        ledger.append(order("kept")).await.unwrap();

        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(ledger.path())
            .unwrap();
        file.write_all(br#"{"id":"torn","createdAt":"#).unwrap();

        let orders = ledger.list_all().await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, "kept");

        ledger.append(order("after")).await.unwrap();
        let ids: Vec<String> = ledger
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec!["after", "kept"]);
    }

    #[tokio::test]
    async fn test_ledger_skips_tail_cut_inside_multibyte_char() {
        let dir = tempdir().unwrap();
        let ledger = JsonFileOrderLedger::in_dir(dir.path());
        let mut kept = order("kept");
        kept.address = Some(Address {
            name: "Zoë Müller".to_string(),
            line1: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "KA".to_string(),
            pincode: "560001".to_string(),
        });
        ledger.append(kept.clone()).await.unwrap();

        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(ledger.path())
            .unwrap();
        file.write_all(b"{\"id\":\"torn\",\"address\":{\"name\":\"\xC3").unwrap();

        let orders = ledger.list_all().await.unwrap();
        assert_eq!(orders, vec![kept.clone()]);

        ledger.append(order("after")).await.unwrap();
        let ids: Vec<String> = ledger
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec!["after", "kept"]);
    }

    #[tokio::test]
    async fn test_ledger_concurrent_appends() {
        let dir = tempdir().unwrap();
        let ledger = JsonFileOrderLedger::in_dir(dir.path());

        let mut handles = Vec::new();
        for i in 0..20 {
            let ledger = ledger.clone();
            handles.push(tokio::spawn(async move {
                ledger.append(order(&format!("order-{i}"))).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(ledger.list_all().await.unwrap().len(), 20);
    }
}
