//! Wallet module providing the chip ledger.
//!
//! This module implements:
//! - Per-account locking so one account's operations are totally ordered
//! - Write-through persistence of the full ledger on every mutation
//! - Atomic check-and-debit for wagers and withdrawals
//! - Clamp-at-zero balance adjustments for cashier grants
//!
//! ## Example
//!
//! ```no_run
//! use starfarer::wallet::{AccountId, JsonFileStorage, WalletConfig, WalletManager};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = WalletConfig::from_env();
//!     let storage = Arc::new(JsonFileStorage::new(&config.ledger_path));
//!     let wallet = WalletManager::open(storage, &config).await?;
//!
//!     let player = AccountId::from(1234u64);
//!     wallet.grant(&player, 500).await?;
//!
//!     let remaining = wallet.try_debit(&player, 200).await?;
//!     println!("Balance after bet: {}", remaining);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod errors;
pub mod manager;
pub mod models;
pub mod storage;

pub use config::WalletConfig;
pub use errors::{PersistenceError, PersistenceResult, WalletError, WalletResult};
pub use manager::WalletManager;
pub use models::{AccountId, AccountRecord, Chips, LedgerSnapshot, Withdrawal};
pub use storage::{JsonFileStorage, MemoryStorage, WalletStorage};
