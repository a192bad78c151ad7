//! Application layer containing the storefront use cases.
//!
//! The catalog engine is a pure function over a product list. `CartStore`,
//! `CheckoutOrchestrator` and `OrderHistory` own boxed ports from `domain::ports`
//! and await each storage or gateway call in sequence.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod orders;
