//! Wallet module: balances and the deposit/withdraw ledger operations.
//!
//! This module implements:
//! - [`WalletStore`]: keyed wallet storage with exclusive per-wallet mutation
//! - [`MemoryWalletStore`] and [`PgWalletStore`] backends
//! - [`LedgerExecutor`]: validation and balance arithmetic on top of a store
//!
//! Concurrent operations on one wallet are serialized by the store's lock;
//! operations on different wallets run in parallel.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use wallet_ledger::db::Database;
//! use wallet_ledger::wallet::{LedgerExecutor, OperationType, PgWalletStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&Default::default()).await?;
//!     db.ensure_schema().await?;
//!
//!     let store = PgWalletStore::new(Arc::new(db.pool().clone()));
//!     store.get_or_create_wallet("wallet-1", 1000).await?;
//!
//!     let executor = LedgerExecutor::new(Arc::new(store));
//!     let balance = executor.apply("wallet-1", OperationType::Deposit, 500).await?;
//!     println!("New balance: {}", balance);
//!
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod executor;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use errors::{WalletError, WalletResult};
pub use executor::LedgerExecutor;
pub use memory::MemoryWalletStore;
pub use models::{
    Balance, DEFAULT_BALANCE, MAX_WALLET_ID_LEN, OperationRequest, OperationType,
    WITHDRAWAL_LIMIT, Wallet, WalletId,
};
pub use postgres::PgWalletStore;
pub use store::{Mutator, WalletStore};
