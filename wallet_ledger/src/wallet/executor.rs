//! Ledger operation executor.
//!
//! Validates a deposit or withdrawal, then applies it through the store's
//! exclusive-lock primitive. Validation that needs no stored state runs first
//! so invalid requests never contend for a wallet lock.

use std::sync::Arc;

use super::{
    errors::{WalletError, WalletResult},
    models::{Balance, OperationRequest, OperationType},
    store::{Mutator, WalletStore},
};

/// Applies ledger operations to wallets held by a [`WalletStore`]
#[derive(Clone)]
pub struct LedgerExecutor {
    store: Arc<dyn WalletStore>,
}

impl LedgerExecutor {
    /// Create a new executor
    ///
    /// # Arguments
    ///
    /// * `store` - Store owning the wallet records; the only mutation path
    pub fn new(store: Arc<dyn WalletStore>) -> Self {
        Self { store }
    }

    /// Store this executor writes through
    pub fn store(&self) -> &Arc<dyn WalletStore> {
        &self.store
    }

    /// Get the current balance of a wallet
    ///
    /// # Errors
    ///
    /// * `WalletError::WalletNotFound` - No wallet with this identifier
    pub async fn balance(&self, wallet_id: &str) -> WalletResult<Balance> {
        Ok(self.store.get(wallet_id).await?.balance)
    }

    /// Apply one operation to one wallet
    ///
    /// Each call applies exactly once; retrying a call that succeeded applies
    /// it again.
    ///
    /// # Arguments
    ///
    /// * `wallet_id` - Wallet identifier
    /// * `operation_type` - Deposit or withdrawal
    /// * `amount` - Positive amount
    ///
    /// # Returns
    ///
    /// * `WalletResult<Balance>` - The committed balance after the operation
    ///
    /// # Errors
    ///
    /// * `WalletError::InvalidRequest` - Non-positive amount, or deposit overflow
    /// * `WalletError::LimitExceeded` - Withdrawal above the one-time limit
    /// * `WalletError::WalletNotFound` - No wallet with this identifier
    /// * `WalletError::InsufficientFunds` - Withdrawal larger than the balance
    pub async fn apply(
        &self,
        wallet_id: &str,
        operation_type: OperationType,
        amount: Balance,
    ) -> WalletResult<Balance> {
        self.apply_request(&OperationRequest {
            wallet_id: wallet_id.to_string(),
            operation_type,
            amount,
        })
        .await
    }

    /// Apply a prepared [`OperationRequest`]
    pub async fn apply_request(&self, request: &OperationRequest) -> WalletResult<Balance> {
        if let Err(e) = request.validate() {
            log::debug!(
                "Rejected {} of {} on wallet {}: {e}",
                request.operation_type,
                request.amount,
                request.wallet_id
            );
            return Err(e);
        }

        let result = self
            .store
            .with_exclusive_lock(
                &request.wallet_id,
                mutator(request.operation_type, request.amount),
            )
            .await;

        match &result {
            Ok(balance) => log::debug!(
                "Applied {} of {} on wallet {}, balance now {balance}",
                request.operation_type,
                request.amount,
                request.wallet_id
            ),
            Err(e) if e.is_storage_error() => log::warn!(
                "Storage failure during {} on wallet {}: {e}",
                request.operation_type,
                request.wallet_id
            ),
            Err(e) => log::debug!(
                "Aborted {} of {} on wallet {}: {e}",
                request.operation_type,
                request.amount,
                request.wallet_id
            ),
        }

        result
    }
}

/// Build the read-modify-write step for one operation
fn mutator(operation_type: OperationType, amount: Balance) -> Mutator {
    match operation_type {
        OperationType::Deposit => Box::new(move |current: Balance| {
            current.checked_add(amount).ok_or_else(|| {
                WalletError::InvalidRequest("Deposit would overflow the wallet balance".to_string())
            })
        }),
        OperationType::Withdraw => Box::new(move |current: Balance| {
            if current < amount {
                return Err(WalletError::InsufficientFunds {
                    available: current,
                    required: amount,
                });
            }
            Ok(current - amount)
        }),
    }
}
