//! In-process wallet store.
//!
//! Each wallet lives in its own cell: an async mutex that serializes mutators
//! and an atomic holding the committed balance. The map lock is only held long
//! enough to find or insert a cell, so a slow mutation on one wallet never
//! blocks another.

use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicI64, Ordering},
    },
};
use tokio::sync::{Mutex, RwLock};

use super::{
    errors::{WalletError, WalletResult},
    models::{Balance, Wallet, WalletId, validate_wallet_id},
    store::{Mutator, WalletStore, run_mutator},
};

struct WalletCell {
    /// Held for the whole read-modify-write window
    lock: Mutex<()>,
    /// Last committed balance; written only while `lock` is held
    balance: AtomicI64,
}

impl WalletCell {
    fn new(balance: Balance) -> Self {
        Self {
            lock: Mutex::new(()),
            balance: AtomicI64::new(balance),
        }
    }
}

/// Wallet store backed by process memory
#[derive(Clone, Default)]
pub struct MemoryWalletStore {
    wallets: Arc<RwLock<HashMap<WalletId, Arc<WalletCell>>>>,
}

impl MemoryWalletStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a wallet unless one already exists under `wallet_id`
    ///
    /// An existing wallet is returned unchanged.
    ///
    /// # Errors
    ///
    /// * `WalletError::InvalidRequest` - Bad identifier or negative initial balance
    pub async fn get_or_create_wallet(
        &self,
        wallet_id: &str,
        initial_balance: Balance,
    ) -> WalletResult<Wallet> {
        validate_wallet_id(wallet_id)?;
        if initial_balance < 0 {
            return Err(WalletError::InvalidRequest(format!(
                "Initial balance must not be negative, got {initial_balance}"
            )));
        }

        let mut wallets = self.wallets.write().await;
        let cell = wallets
            .entry(wallet_id.to_string())
            .or_insert_with(|| Arc::new(WalletCell::new(initial_balance)));

        Ok(Wallet {
            id: wallet_id.to_string(),
            balance: cell.balance.load(Ordering::Acquire),
        })
    }

    /// Number of wallets held
    pub async fn len(&self) -> usize {
        self.wallets.read().await.len()
    }

    /// Whether the store holds no wallets
    pub async fn is_empty(&self) -> bool {
        self.wallets.read().await.is_empty()
    }

    async fn cell(&self, wallet_id: &str) -> WalletResult<Arc<WalletCell>> {
        self.wallets
            .read()
            .await
            .get(wallet_id)
            .cloned()
            .ok_or_else(|| WalletError::WalletNotFound(wallet_id.to_string()))
    }
}

#[async_trait]
impl WalletStore for MemoryWalletStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, wallet_id: &str) -> WalletResult<Wallet> {
        let cell = self.cell(wallet_id).await?;
        Ok(Wallet {
            id: wallet_id.to_string(),
            balance: cell.balance.load(Ordering::Acquire),
        })
    }

    async fn with_exclusive_lock(
        &self,
        wallet_id: &str,
        mutator: Mutator,
    ) -> WalletResult<Balance> {
        let cell = self.cell(wallet_id).await?;

        // The only await point; cancelling here leaves the wallet untouched.
        let _guard = cell.lock.lock().await;
        log::debug!("Locked wallet {wallet_id}");

        let current = cell.balance.load(Ordering::Acquire);
        let next = run_mutator(current, mutator)?;
        cell.balance.store(next, Ordering::Release);

        log::debug!("Committed wallet {wallet_id}: {current} -> {next}");
        Ok(next)
    }

    async fn health_check(&self) -> WalletResult<()> {
        Ok(())
    }
}
