//! Payment gateway adapters.
//!
//! `MockGateway` accepts every charge and is both the default and the fallback.
//! `ExternalGateway` creates a payment intent on a Stripe-compatible API.

pub mod external;
pub mod mock;
