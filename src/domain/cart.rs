use super::product::Product;
use serde::{Deserialize, Serialize};

/// One product's quantity entry in the shopper's cart.
///
/// `name`, `price` and `image` are a snapshot taken when the product was first added;
/// later adds only bump `qty`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct CartLine {
    /// The product id this line is keyed by.
    pub id: u64,
    pub name: String,
    pub price: u64,
    pub image: String,
    pub qty: u32,
}

impl CartLine {
    /// `price * qty`, or `None` if it does not fit in a `u64`.
    pub fn subtotal(&self) -> Option<u64> {
        self.price.checked_mul(u64::from(self.qty))
    }
}

/// The denormalised product fields copied into a new cart line.
#[derive(Debug, PartialEq, Clone)]
pub struct ProductSnapshot {
    pub name: String,
    pub price: u64,
    pub image: String,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
        }
    }
}

/// Ordered cart contents: at most one line per product id, insertion order preserved.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from persisted lines.
    ///
    /// Lines with `qty == 0` are lifted to 1 and duplicate product ids are merged
    /// into the first occurrence, so a hand-edited file cannot break the invariants.
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let mut cart = Self::new();
        for mut line in lines {
            line.qty = line.qty.max(1);
            match cart.line_mut(line.id) {
                Some(existing) => existing.qty = existing.qty.saturating_add(line.qty),
                None => cart.lines.push(line),
            }
        }
        cart
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, product_id: u64) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == product_id)
    }

    fn line_mut(&mut self, product_id: u64) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.id == product_id)
    }

    /// Adds one unit of a product. Existing lines keep their original snapshot.
    pub fn add(&mut self, product_id: u64, snapshot: ProductSnapshot) {
        if let Some(line) = self.line_mut(product_id) {
            line.qty = line.qty.saturating_add(1);
            return;
        }
        self.lines.push(CartLine {
            id: product_id,
            name: snapshot.name,
            price: snapshot.price,
            image: snapshot.image,
            qty: 1,
        });
    }

    /// Returns `true` if a line was changed.
    pub fn increment(&mut self, product_id: u64) -> bool {
        match self.line_mut(product_id) {
            Some(line) => {
                line.qty = line.qty.saturating_add(1);
                true
            }
            None => false,
        }
    }

    /// Decreases a line by one unit, never below 1. Returns `true` if a line was changed.
    pub fn decrement(&mut self, product_id: u64) -> bool {
        match self.line_mut(product_id) {
            Some(line) if line.qty > 1 => {
                line.qty -= 1;
                true
            }
            _ => false,
        }
    }

    /// Returns `true` if a line was removed.
    pub fn remove(&mut self, product_id: u64) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.id != product_id);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of `price * qty` over all lines, or `None` on overflow.
    pub fn total(&self) -> Option<u64> {
        self.lines
            .iter()
            .try_fold(0u64, |acc, line| acc.checked_add(line.subtotal()?))
    }

    /// Sum of quantities over all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.qty)).sum()
    }
}
