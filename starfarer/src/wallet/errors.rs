//! Wallet error types.

use std::path::PathBuf;
use thiserror::Error;

/// Durable storage errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Filesystem error while reading or writing the ledger
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Ledger could not be encoded or decoded
    #[error("Ledger encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Storage backend refused the write
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for storage operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Wallet errors
#[derive(Debug, Error)]
pub enum WalletError {
    /// Durable write failed; nothing was committed
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Insufficient balance
    #[error("Insufficient funds: available {available}, required {required}")]
    InsufficientFunds { available: i64, required: i64 },

    /// Invalid amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(i64),

    /// Withdrawal smaller than the configured minimum
    #[error("Amount {requested} is below the minimum of {minimum}")]
    BelowMinimum { minimum: i64, requested: i64 },

    /// Balance would exceed the representable range
    #[error("Balance overflow")]
    BalanceOverflow,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl WalletError {
    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            WalletError::Persistence(_) => "persistence_error",
            WalletError::InsufficientFunds { .. } => "insufficient_funds",
            WalletError::InvalidAmount(_) => "invalid_amount",
            WalletError::BelowMinimum { .. } => "below_minimum",
            WalletError::BalanceOverflow => "balance_overflow",
            WalletError::Configuration(_) => "configuration_error",
        }
    }

    /// Get a client-safe error message that doesn't leak storage details
    pub fn client_message(&self) -> String {
        match self {
            // Don't expose file paths or encoder internals
            WalletError::Persistence(_) => "Ledger unavailable, try again later".to_string(),
            WalletError::Configuration(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for wallet operations
pub type WalletResult<T> = Result<T, WalletError>;
