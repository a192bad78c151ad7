//! Runtime configuration, read from command-line flags with environment fallbacks.

use crate::domain::ports::{
    CartRepositoryBox, CartRepositoryFactory, CatalogSourceBox, OrderLedgerBox, PaymentGatewayBox,
};
use crate::error::Result;
use crate::infrastructure::catalog::{
    CsvCatalogSource, DEFAULT_CATALOG_SEED, DEFAULT_CATALOG_SIZE, GeneratedCatalog,
};
use crate::infrastructure::gateway::external::{
    DEFAULT_API_BASE, DEFAULT_CURRENCY, ExternalGateway, ExternalGatewayConfig,
};
use crate::infrastructure::gateway::mock::MockGateway;
use crate::infrastructure::json_file::{JsonFileCartRepository, JsonFileOrderLedger};
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Where carts and orders are persisted.
#[derive(Debug, Clone, Args)]
pub struct StorageSettings {
    /// Directory holding cart files and the order log
    #[arg(long, env = "STOREFRONT_DATA_DIR", default_value = ".storefront", global = true)]
    pub data_dir: PathBuf,

    /// Shopper identity the cart belongs to
    #[arg(long, env = "STOREFRONT_SHOPPER", default_value = "guest", global = true)]
    pub shopper: String,

    /// Path to a persistent database (optional). If provided, uses RocksDB.
    #[arg(long, global = true)]
    pub db_path: Option<PathBuf>,
}

/// Opened storage backends.
pub struct Storage {
    pub ledger: OrderLedgerBox,
    pub carts: CartRepositoryFactory,
}

impl Storage {
    pub fn cart_for(&self, shopper: &str) -> CartRepositoryBox {
        (self.carts)(shopper)
    }
}

impl StorageSettings {
    /// Opens RocksDB when `--db-path` is given and the feature is compiled in,
    /// otherwise JSON files under `data_dir`.
    pub fn open(&self) -> Result<Storage> {
        if let Some(storage) = self.open_rocksdb()? {
            return Ok(storage);
        }

        info!(path = %self.data_dir.display(), "using file storage");
        let data_dir = self.data_dir.clone();
        Ok(Storage {
            ledger: Box::new(JsonFileOrderLedger::in_dir(&self.data_dir)),
            carts: Box::new(move |shopper: &str| -> CartRepositoryBox {
                Box::new(JsonFileCartRepository::for_shopper(&data_dir, shopper))
            }),
        })
    }

    #[cfg(feature = "storage-rocksdb")]
    fn open_rocksdb(&self) -> Result<Option<Storage>> {
        use crate::infrastructure::rocksdb::RocksDBStore;

        let Some(db_path) = &self.db_path else {
            return Ok(None);
        };
        let store = RocksDBStore::open(db_path)?;
        info!(path = %db_path.display(), "using RocksDB storage");
        let carts_store = store.clone();
        Ok(Some(Storage {
            ledger: Box::new(store),
            carts: Box::new(move |shopper: &str| -> CartRepositoryBox {
                Box::new(carts_store.cart_repository(shopper))
            }),
        }))
    }

    #[cfg(not(feature = "storage-rocksdb"))]
    fn open_rocksdb(&self) -> Result<Option<Storage>> {
        if self.db_path.is_some() {
            warn!(
                "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to file storage."
            );
        }
        Ok(None)
    }
}

/// Where the product list comes from.
#[derive(Debug, Clone, Args)]
pub struct CatalogSettings {
    /// CSV file with the product list; a generated catalog is used when absent
    #[arg(long, env = "STOREFRONT_CATALOG", global = true)]
    pub catalog: Option<PathBuf>,

    /// Number of products in the generated catalog
    #[arg(long, default_value_t = DEFAULT_CATALOG_SIZE, global = true)]
    pub catalog_size: usize,

    /// Seed of the generated catalog
    #[arg(long, default_value_t = DEFAULT_CATALOG_SEED, global = true)]
    pub catalog_seed: u64,
}

impl CatalogSettings {
    pub fn source(&self) -> CatalogSourceBox {
        match &self.catalog {
            Some(path) => Box::new(CsvCatalogSource::new(path)),
            None => Box::new(GeneratedCatalog::new(self.catalog_size, self.catalog_seed)),
        }
    }
}

/// Which payment gateway is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewaySelection {
    Mock,
    External(ExternalGatewayConfig),
}

#[derive(Debug, Clone, Args)]
pub struct GatewaySettings {
    /// Set to 1 to charge through the external gateway
    #[arg(long, env = "USE_STRIPE", default_value = "0", global = true)]
    pub use_stripe: String,

    #[arg(long, env = "STRIPE_SECRET", hide_env_values = true, global = true)]
    pub stripe_secret: Option<String>,

    #[arg(long, env = "STRIPE_PUBLISHABLE", default_value = "", global = true)]
    pub stripe_publishable: String,

    #[arg(long, env = "STRIPE_API_BASE", default_value = DEFAULT_API_BASE, global = true)]
    pub stripe_api_base: String,

    #[arg(long, env = "STRIPE_CURRENCY", default_value = DEFAULT_CURRENCY, global = true)]
    pub stripe_currency: String,

    /// Upper bound on each external gateway request, in milliseconds
    #[arg(long, env = "GATEWAY_TIMEOUT_MS", default_value_t = 5000, global = true)]
    pub gateway_timeout_ms: u64,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            use_stripe: "0".to_string(),
            stripe_secret: None,
            stripe_publishable: String::new(),
            stripe_api_base: DEFAULT_API_BASE.to_string(),
            stripe_currency: DEFAULT_CURRENCY.to_string(),
            gateway_timeout_ms: 5000,
        }
    }
}

impl GatewaySettings {
    /// The external gateway is selected only when it is switched on and has a secret.
    /// Every other combination quietly selects the mock gateway.
    pub fn selection(&self) -> GatewaySelection {
        let enabled = self.use_stripe.trim() == "1";
        match self.stripe_secret.as_deref().map(str::trim) {
            Some(secret) if enabled && !secret.is_empty() => {
                GatewaySelection::External(ExternalGatewayConfig {
                    api_base: self.stripe_api_base.clone(),
                    secret_key: secret.to_string(),
                    publishable_key: self.stripe_publishable.clone(),
                    currency: self.stripe_currency.clone(),
                    timeout: Duration::from_millis(self.gateway_timeout_ms),
                })
            }
            _ => GatewaySelection::Mock,
        }
    }

    pub fn build(&self) -> PaymentGatewayBox {
        match self.selection() {
            GatewaySelection::Mock => Box::new(MockGateway::new()),
            GatewaySelection::External(config) => match ExternalGateway::new(config) {
                Ok(gateway) => Box::new(gateway),
                Err(e) => {
                    warn!(error = %e, "external gateway unavailable, using mock gateway");
                    Box::new(MockGateway::new())
                }
            },
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct SessionSettings {
    /// Lifetime of a login session, in seconds
    #[arg(long, env = "SESSION_TTL_SECS", default_value_t = 3600, global = true)]
    pub session_ttl_secs: u64,
}

impl SessionSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}
