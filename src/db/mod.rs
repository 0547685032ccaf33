//! Database Module
//!
//! Entity models shared by the ledger implementations.

pub mod models;
