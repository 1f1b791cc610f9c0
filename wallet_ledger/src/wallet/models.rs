//! Wallet data models.

use super::errors::{WalletError, WalletResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Wallet identifier (opaque string key)
pub type WalletId = String;

/// Balance and amount type, in the smallest unit
pub type Balance = i64;

/// Balance of a freshly created wallet
pub const DEFAULT_BALANCE: Balance = 0;

/// Maximum amount allowed in a single withdrawal
pub const WITHDRAWAL_LIMIT: Balance = 50_000;

/// Longest identifier the wallets table accepts
pub const MAX_WALLET_ID_LEN: usize = 36;

/// Wallet model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: WalletId,
    pub balance: Balance,
}

/// Check an identifier before creating a wallet under it
///
/// # Errors
///
/// * `WalletError::InvalidRequest` - Empty or longer than `MAX_WALLET_ID_LEN`
pub fn validate_wallet_id(wallet_id: &str) -> WalletResult<()> {
    if wallet_id.is_empty() {
        return Err(WalletError::InvalidRequest(
            "Wallet identifier must not be empty".to_string(),
        ));
    }
    if wallet_id.chars().count() > MAX_WALLET_ID_LEN {
        return Err(WalletError::InvalidRequest(format!(
            "Wallet identifier must be at most {MAX_WALLET_ID_LEN} characters"
        )));
    }
    Ok(())
}

/// Ledger operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    Deposit,
    Withdraw,
}

impl OperationType {
    /// Wire name of the operation
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Deposit => "DEPOSIT",
            OperationType::Withdraw => "WITHDRAW",
        }
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OperationType {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEPOSIT" => Ok(OperationType::Deposit),
            "WITHDRAW" => Ok(OperationType::Withdraw),
            other => Err(WalletError::InvalidRequest(format!(
                "\"{other}\" is not a valid operation type; expected DEPOSIT or WITHDRAW"
            ))),
        }
    }
}

/// A single ledger operation against one wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRequest {
    pub wallet_id: WalletId,
    pub operation_type: OperationType,
    pub amount: Balance,
}

impl OperationRequest {
    /// Build a request from its wire representation
    ///
    /// # Errors
    ///
    /// * `WalletError::InvalidRequest` - Unknown operation type
    pub fn parse(
        wallet_id: impl Into<WalletId>,
        operation_type: &str,
        amount: Balance,
    ) -> WalletResult<Self> {
        Ok(Self {
            wallet_id: wallet_id.into(),
            operation_type: operation_type.parse()?,
            amount,
        })
    }

    /// Check the request against the rules that need no stored state.
    ///
    /// Runs before any lock is taken.
    ///
    /// # Errors
    ///
    /// * `WalletError::InvalidRequest` - Amount is not positive
    /// * `WalletError::LimitExceeded` - Withdrawal above `WITHDRAWAL_LIMIT`
    pub fn validate(&self) -> WalletResult<()> {
        if self.amount <= 0 {
            return Err(WalletError::InvalidRequest(format!(
                "Amount must be a positive integer, got {}",
                self.amount
            )));
        }

        if self.operation_type == OperationType::Withdraw && self.amount > WITHDRAWAL_LIMIT {
            return Err(WalletError::LimitExceeded {
                amount: self.amount,
                limit: WITHDRAWAL_LIMIT,
            });
        }

        Ok(())
    }
}
