//! PostgreSQL wallet store.
//!
//! Mutations run in one transaction that takes a row lock with
//! `SELECT ... FOR UPDATE`, so concurrent mutations of the same wallet queue
//! on the row while other wallets proceed in parallel.
#![allow(clippy::needless_raw_string_hashes)]

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::sync::Arc;

use super::{
    errors::{WalletError, WalletResult},
    models::{Balance, Wallet, validate_wallet_id},
    store::{Mutator, WalletStore, run_mutator},
};
use crate::db::timeouts::{self, Deadline};

/// Wallet store backed by the `wallets` table
#[derive(Clone)]
pub struct PgWalletStore {
    pool: Arc<PgPool>,
}

impl PgWalletStore {
    /// Create a new PostgreSQL wallet store
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create a wallet unless one already exists under `wallet_id`
    ///
    /// An existing wallet is returned unchanged.
    ///
    /// # Arguments
    ///
    /// * `wallet_id` - Wallet identifier
    /// * `initial_balance` - Balance for a newly created wallet
    ///
    /// # Returns
    ///
    /// * `WalletResult<Wallet>` - The stored wallet
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

        timeouts::query(
            Deadline::Query,
            sqlx::query(
                r#"
                INSERT INTO wallets (uuid, balance)
                VALUES ($1, $2)
                ON CONFLICT (uuid) DO NOTHING
                "#,
            )
            .bind(wallet_id)
            .bind(initial_balance)
            .execute(self.pool.as_ref()),
        )
        .await?;

        self.get(wallet_id).await
    }

    async fn locked_mutation(&self, wallet_id: &str, mutator: Mutator) -> WalletResult<Balance> {
        let mut tx = self.pool.begin().await?;

        // Row lock is held until commit or rollback
        let row = sqlx::query("SELECT balance FROM wallets WHERE uuid = $1 FOR UPDATE")
            .bind(wallet_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| WalletError::WalletNotFound(wallet_id.to_string()))?;

        let current: Balance = row.get("balance");
        log::debug!("Locked wallet {wallet_id} at balance {current}");

        // An aborted mutation returns here; dropping `tx` rolls back.
        let next = run_mutator(current, mutator)?;

        sqlx::query("UPDATE wallets SET balance = $1 WHERE uuid = $2")
            .bind(next)
            .bind(wallet_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        log::debug!("Committed wallet {wallet_id}: {current} -> {next}");
        Ok(next)
    }
}

#[async_trait]
impl WalletStore for PgWalletStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn get(&self, wallet_id: &str) -> WalletResult<Wallet> {
        let row = timeouts::query(
            Deadline::Query,
            sqlx::query("SELECT uuid, balance FROM wallets WHERE uuid = $1")
                .bind(wallet_id)
                .fetch_optional(self.pool.as_ref()),
        )
        .await?
        .ok_or_else(|| WalletError::WalletNotFound(wallet_id.to_string()))?;

        Ok(Wallet {
            id: row.get("uuid"),
            balance: row.get("balance"),
        })
    }

    /// The deadline also covers `COMMIT`. A `WalletError::Timeout` that fires
    /// after the server received the commit is returned even though the new
    /// balance is durable, so a timeout does not mean nothing was written.
    /// Read the balance before retrying.
    async fn with_exclusive_lock(
        &self,
        wallet_id: &str,
        mutator: Mutator,
    ) -> WalletResult<Balance> {
        timeouts::bounded(
            Deadline::Transaction,
            self.locked_mutation(wallet_id, mutator),
        )
        .await
    }

    async fn health_check(&self) -> WalletResult<()> {
        timeouts::query(
            Deadline::Query,
            sqlx::query("SELECT 1").execute(self.pool.as_ref()),
        )
        .await?;
        Ok(())
    }
}
