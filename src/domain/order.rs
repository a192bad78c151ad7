use super::cart::CartLine;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input validation failures detected before any payment is attempted.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ValidationError {
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Please fill all address fields: missing {0}")]
    InvalidAddress(&'static str),
    #[error("Enter a valid amount")]
    InvalidAmount,
}

/// A positive, finite monetary amount submitted at checkout.
///
/// Wraps `rust_decimal::Decimal` so arithmetic on charged amounts never drifts.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, ValidationError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(ValidationError::InvalidAmount)
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// The amount in the smallest currency unit, rounded half away from zero.
    pub fn to_minor_units(&self) -> Option<i64> {
        (self.0 * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = ValidationError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<f64> for Amount {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(ValidationError::InvalidAmount);
        }
        let decimal = Decimal::try_from(value).map_err(|_| ValidationError::InvalidAmount)?;
        Self::new(decimal)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// Shipping address collected at checkout. Every field is required.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
pub struct Address {
    pub name: String,
    pub line1: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl Address {
    /// Returns a copy with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            line1: self.line1.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            pincode: self.pincode.trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("name", &self.name),
            ("line1", &self.line1),
            ("city", &self.city),
            ("state", &self.state),
            ("pincode", &self.pincode),
        ];
        match fields.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(ValidationError::InvalidAddress(field)),
            None => Ok(()),
        }
    }
}

/// Only successful orders are persisted, so `Paid` is the single status.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Paid,
}

/// A completed order. Immutable once appended to the ledger.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub cart: Vec<CartLine>,
    pub amount: Amount,
    pub address: Option<Address>,
    pub status: OrderStatus,
}

impl Order {
    pub fn paid(id: String, cart: Vec<CartLine>, amount: Amount, address: Option<Address>) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            cart,
            amount,
            address,
            status: OrderStatus::Paid,
        }
    }
}
