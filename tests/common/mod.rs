#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use storefront::domain::cart::CartLine;
use storefront::domain::order::{Address, Amount, Order};
use storefront::domain::payment::{GatewayError, PaymentOutcome};
use storefront::domain::ports::{OrderLedger, PaymentGateway};
use storefront::domain::product::Product;
use storefront::error::{Result, StoreError};

pub fn product(id: u64, category: &str, brand: &str, price: u64, rating: f64) -> Product {
    Product {
        id,
        name: format!("{brand} {category} Model {}", 1000 + id),
        category: category.to_string(),
        brand: brand.to_string(),
        price,
        rating,
        image: format!("/images/{}.svg", category.to_lowercase()),
    }
}

pub fn line(id: u64, price: u64, qty: u32) -> CartLine {
    CartLine {
        id,
        name: format!("Product {id}"),
        price,
        image: "/images/phone.svg".to_string(),
        qty,
    }
}

pub fn address() -> Address {
    Address {
        name: "Asha Rao".to_string(),
        line1: "12 MG Road".to_string(),
        city: "Bengaluru".to_string(),
        state: "KA".to_string(),
        pincode: "560001".to_string(),
    }
}

/// A gateway that counts calls and always errors.
#[derive(Clone, Default)]
pub struct BrokenGateway {
    pub calls: Arc<AtomicUsize>,
}

impl BrokenGateway {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for BrokenGateway {
    fn name(&self) -> &'static str {
        "broken"
    }

    async fn charge(&self, _amount: Amount) -> std::result::Result<PaymentOutcome, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(GatewayError::Misconfigured("injected failure".to_string()))
    }
}

/// A gateway that returns a fixed outcome and counts calls.
#[derive(Clone)]
pub struct ScriptedGateway {
    pub outcome: PaymentOutcome,
    pub calls: Arc<AtomicUsize>,
}

impl ScriptedGateway {
    pub fn new(outcome: PaymentOutcome) -> Self {
        Self {
            outcome,
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn charge(&self, _amount: Amount) -> std::result::Result<PaymentOutcome, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.outcome.clone())
    }
}

/// A ledger whose storage is gone: writes fail, reads fail.
#[derive(Clone, Default)]
pub struct UnavailableLedger;

#[async_trait]
impl OrderLedger for UnavailableLedger {
    async fn append(&self, _order: Order) -> Result<()> {
        Err(StoreError::IoError(std::io::Error::other("disk unavailable")))
    }

    async fn list_all(&self) -> Result<Vec<Order>> {
        Err(StoreError::IoError(std::io::Error::other("disk unavailable")))
    }
}
