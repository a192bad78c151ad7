//! Domain types and the ports the application layer depends on.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod order;
pub mod payment;
pub mod ports;
pub mod product;
