//! # Wallet Ledger
//!
//! Wallet balances with deposit and withdrawal operations that stay correct
//! under concurrent access.
//!
//! Every balance change is a read-modify-write performed while holding an
//! exclusive lock on that single wallet, so concurrent operations against one
//! wallet are serialized (no lost updates, no overdrafts) while operations on
//! different wallets proceed independently.
//!
//! ## Core Modules
//!
//! - [`wallet`]: Store abstraction, in-memory and PostgreSQL stores, and the
//!   [`LedgerExecutor`] that validates and applies operations
//! - [`db`]: PostgreSQL pool, schema bootstrap, and query timeouts
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use wallet_ledger::{LedgerExecutor, MemoryWalletStore, OperationType};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), wallet_ledger::WalletError> {
//! let store = MemoryWalletStore::new();
//! store.get_or_create_wallet("wallet-1", 1000).await?;
//!
//! let executor = LedgerExecutor::new(Arc::new(store));
//! let balance = executor.apply("wallet-1", OperationType::Withdraw, 200).await?;
//! assert_eq!(balance, 800);
//! # Ok(())
//! # }
//! ```

/// PostgreSQL connection pool and helpers.
pub mod db;

/// Wallet records and ledger operations.
pub mod wallet;

pub use wallet::{
    LedgerExecutor, MemoryWalletStore, OperationType, PgWalletStore, WalletError, WalletResult,
    WalletStore,
};
