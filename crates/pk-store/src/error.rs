//! Error types for pk-store.

use pk_core::CarId;
use thiserror::Error;

/// Failures of an external collaborator write or read.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("{0} lock poisoned")]
    Poisoned(&'static str),

    #[error("no account for car {0}")]
    UnknownAccount(CarId),

    #[error("car {car} has balance {balance}, cannot debit {amount}")]
    InsufficientFunds {
        car:     CarId,
        balance: u64,
        amount:  u64,
    },

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;
