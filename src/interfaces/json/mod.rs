//! Transport-agnostic JSON request and response shapes.

pub mod checkout;
