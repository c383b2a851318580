//! Network and disk adapters.

pub mod api;
pub mod cache;
