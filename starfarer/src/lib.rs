//! # Starfarer
//!
//! A chip wallet ledger and the weighted slot machine that bets against it.
//!
//! ## Architecture
//!
//! The crate has two layers, leaves first:
//!
//! - **Wallet**: per-account balances behind per-account locks, persisted in
//!   full on every mutation. Debits that must not overdraw go through an
//!   atomic check-and-debit, so concurrent wagers on one account cannot both
//!   spend the same chips.
//! - **Slots**: draws three symbols from a weighted reel, prices the draw from
//!   a fixed pay table, and settles the wager against the wallet.
//!
//! The wallet never calls into the slot machine.
//!
//! ## Core Modules
//!
//! - [`wallet`]: Ledger, storage backends, grants and withdrawals
//! - [`slots`]: Reels, pay table, and spin settlement
//!
//! ## Example
//!
//! ```
//! use starfarer::slots::{MachineConfig, Multiplier};
//!
//! let config = MachineConfig::default();
//! assert_eq!(config.three_of_a_kind["crystal"], Multiplier::whole(50));
//! ```

/// Chip ledger with atomic balance operations.
pub mod wallet;
pub use wallet::{AccountId, Chips, WalletConfig, WalletError, WalletManager};

/// Weighted slot machine settled against the wallet.
pub mod slots;
pub use slots::{MachineConfig, SlotMachine, SpinError, SpinResult};
