//! Adapters implementing the domain ports.

pub mod auth;
pub mod catalog;
pub mod gateway;
pub mod in_memory;
pub mod json_file;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
