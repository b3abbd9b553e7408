//! Slot machine error types.

use crate::wallet::{Chips, PersistenceError, WalletError};
use thiserror::Error;

/// Machine configuration errors
#[derive(Debug, Error)]
pub enum MachineConfigError {
    /// No symbols defined
    #[error("Symbol catalog is empty")]
    EmptyCatalog,

    /// Symbol with zero draw weight
    #[error("Symbol '{0}' has zero weight")]
    ZeroWeight(String),

    /// Two symbols share a name
    #[error("Duplicate symbol '{0}'")]
    DuplicateSymbol(String),

    /// Pay table refers to a symbol missing from the catalog
    #[error("Pay table entry '{0}' is not in the symbol catalog")]
    UnknownSymbol(String),

    /// Multiplier not representable in hundredths
    #[error("Invalid multiplier: {0}")]
    InvalidMultiplier(f64),

    /// Config file could not be read
    #[error("Failed to read machine config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON
    #[error("Failed to parse machine config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for machine configuration
pub type MachineConfigResult<T> = Result<T, MachineConfigError>;

/// Spin errors
#[derive(Debug, Error)]
pub enum SpinError {
    /// Stake is zero or negative
    #[error("Invalid stake: {0} (must be a positive integer)")]
    InvalidStake(Chips),

    /// Stake exceeds the balance
    #[error("Insufficient funds: available {available}, required {required}")]
    InsufficientFunds { available: Chips, required: Chips },

    /// Durable write failed
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Payout would overflow the balance
    #[error("Balance overflow")]
    BalanceOverflow,

    /// Settlement task did not run to completion
    #[error("Settlement aborted: {0}")]
    SettlementAborted(String),

    /// Any other wallet failure
    #[error("Wallet error: {0}")]
    Wallet(WalletError),
}

impl From<WalletError> for SpinError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::InvalidAmount(amount) => SpinError::InvalidStake(amount),
            WalletError::InsufficientFunds {
                available,
                required,
            } => SpinError::InsufficientFunds {
                available,
                required,
            },
            WalletError::Persistence(e) => SpinError::Persistence(e),
            WalletError::BalanceOverflow => SpinError::BalanceOverflow,
            other => SpinError::Wallet(other),
        }
    }
}

impl SpinError {
    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            SpinError::InvalidStake(_) => "invalid_stake",
            SpinError::InsufficientFunds { .. } => "insufficient_funds",
            SpinError::Persistence(_) => "persistence_error",
            SpinError::BalanceOverflow => "balance_overflow",
            SpinError::SettlementAborted(_) => "settlement_aborted",
            SpinError::Wallet(e) => e.code(),
        }
    }

    /// Get a client-safe error message
    pub fn client_message(&self) -> String {
        match self {
            SpinError::InsufficientFunds { available, .. } => {
                format!("You only have {available} chips")
            }
            SpinError::Persistence(_) | SpinError::SettlementAborted(_) => {
                "Ledger unavailable, try again later".to_string()
            }
            SpinError::Wallet(e) => e.client_message(),
            _ => self.to_string(),
        }
    }
}

/// Result type for slot machine operations
pub type SlotsResult<T> = Result<T, SpinError>;
