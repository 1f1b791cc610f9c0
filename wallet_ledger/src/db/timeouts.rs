//! Deadlines for wallet storage calls.
//!
//! Every PostgreSQL round trip made by the wallet store runs under one of the
//! [`Deadline`]s below. When a deadline fires the inner future is dropped, so
//! an open `sqlx::Transaction` inside it rolls back and releases its row lock.

use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

/// Time budget for a class of storage calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deadline {
    /// Single statement: balance read, wallet insert, health ping
    Query,
    /// Lock, mutate and commit one wallet row
    Transaction,
    /// Schema bootstrap at startup
    Schema,
}

impl Deadline {
    pub const fn duration(self) -> Duration {
        match self {
            Deadline::Query => Duration::from_secs(5),
            Deadline::Transaction => Duration::from_secs(10),
            Deadline::Schema => Duration::from_secs(30),
        }
    }
}

/// Error type for bounded storage calls
#[derive(Debug, thiserror::Error)]
pub enum TimeoutError {
    /// Deadline elapsed before the call finished
    #[error("Database operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Run `future` under `deadline`, keeping the caller's error type
///
/// # Example
///
/// ```no_run
/// use wallet_ledger::db::timeouts::{Deadline, TimeoutError, bounded};
/// # use sqlx::PgPool;
/// # async fn example(pool: &PgPool) -> Result<(), TimeoutError> {
/// let mut tx = pool.begin().await?;
/// bounded(Deadline::Transaction, async {
///     sqlx::query("SELECT balance FROM wallets WHERE uuid = $1 FOR UPDATE")
///         .bind("wallet-1")
///         .fetch_optional(&mut *tx)
///         .await?;
///     Ok::<_, TimeoutError>(())
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn bounded<F, T, E>(deadline: Deadline, future: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<TimeoutError>,
{
    let limit = deadline.duration();
    match timeout(limit, future).await {
        Ok(result) => result,
        Err(_) => Err(TimeoutError::Timeout(limit).into()),
    }
}

/// Run one sqlx statement under `deadline`
pub async fn query<F, T>(deadline: Deadline, future: F) -> Result<T, TimeoutError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    bounded(deadline, async { Ok(future.await?) }).await
}
