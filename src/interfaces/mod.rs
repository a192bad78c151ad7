//! Boundaries between the storefront core and its callers.

pub mod csv;
pub mod json;
