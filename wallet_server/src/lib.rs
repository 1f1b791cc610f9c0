//! HTTP server for the wallet ledger.
//!
//! Exposes balance lookups and deposit/withdraw operations over JSON, backed by
//! either PostgreSQL or an in-memory store.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
