//! Slot machine module: weighted reels, pay table, and wager settlement.
//!
//! A spin runs `validate -> debit -> draw -> settle`:
//! - The stake is checked and debited in one atomic wallet operation
//! - Three symbols are drawn independently, each with probability weight / total
//! - Three of a kind pays the symbol's pay table multiplier
//! - Exactly one adjacent pair pays the pair multiplier; outer-only matches lose
//! - A win returns the stake plus `max(1, floor(stake * multiplier))`
//!
//! ## Example
//!
//! ```no_run
//! use starfarer::slots::{MachineConfig, SlotMachine};
//! use starfarer::wallet::{AccountId, WalletManager};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let wallet = Arc::new(WalletManager::in_memory().await?);
//!     let machine = SlotMachine::new(wallet.clone(), &MachineConfig::default())?;
//!
//!     let player = AccountId::from("captain");
//!     wallet.grant(&player, 100).await?;
//!
//!     let result = machine.spin(&player, 10).await?;
//!     println!("{:?} net {} balance {}", result.kind, result.net, result.balance);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod errors;
pub mod machine;
pub mod models;
pub mod payout;
pub mod reel;

pub use config::MachineConfig;
pub use errors::{MachineConfigError, MachineConfigResult, SlotsResult, SpinError};
pub use machine::SlotMachine;
pub use models::{Draw, Multiplier, PayLine, SpinResult, Symbol, WinKind};
pub use payout::{PayTable, winnings};
pub use reel::{OutcomeSource, Reel, SeededSource, ThreadSource};
