//! Storage abstraction for wallet records.
//!
//! Every balance change goes through [`WalletStore::with_exclusive_lock`]: the
//! record is locked, the mutator sees the current balance, and the value it
//! returns is committed before the lock is released. There is no separate
//! write path.

use async_trait::async_trait;

use super::{
    errors::{WalletError, WalletResult},
    models::{Balance, Wallet},
};

/// Read-modify-write step run while a wallet is locked.
///
/// Receives the current balance and returns the balance to persist. An `Err`
/// aborts the mutation: nothing is written and the error is returned to the
/// caller unchanged.
pub type Mutator = Box<dyn FnOnce(Balance) -> WalletResult<Balance> + Send>;

/// Keyed wallet storage with serialized per-record mutation
#[async_trait]
pub trait WalletStore: Send + Sync {
    /// Short backend name, used in logs and health reports
    fn backend(&self) -> &'static str;

    /// Get the last committed state of a wallet
    ///
    /// Never waits for in-flight mutations.
    async fn get(&self, wallet_id: &str) -> WalletResult<Wallet>;

    /// Run `mutator` against the wallet while holding an exclusive lock on it
    ///
    /// Calls for the same id are totally ordered; calls for different ids do
    /// not block each other. The mutator is not invoked if the wallet does not
    /// exist.
    ///
    /// # Returns
    ///
    /// * `WalletResult<Balance>` - The committed balance
    ///
    /// # Errors
    ///
    /// * `WalletError::WalletNotFound` - No record for `wallet_id`
    /// * Any error returned by `mutator`, with the wallet left unchanged
    /// * `WalletError::Database` / `WalletError::Timeout` - Storage fault. The
    ///   row is never partially written, but a fault reported while committing
    ///   may follow a commit that took effect; re-read before retrying
    async fn with_exclusive_lock(
        &self,
        wallet_id: &str,
        mutator: Mutator,
    ) -> WalletResult<Balance>;

    /// Check that the backend can serve requests
    async fn health_check(&self) -> WalletResult<()>;
}

/// Run a mutator and enforce the non-negative balance invariant on its output.
pub(crate) fn run_mutator(current: Balance, mutator: Mutator) -> WalletResult<Balance> {
    let next = mutator(current)?;
    if next < 0 {
        return Err(WalletError::InsufficientFunds {
            available: current,
            required: current.saturating_sub(next),
        });
    }
    Ok(next)
}
