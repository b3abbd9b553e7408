//! Wallet manager implementation with per-account locking and write-through persistence.

use super::{
    config::WalletConfig,
    errors::{PersistenceError, PersistenceResult, WalletError, WalletResult},
    models::{AccountId, AccountRecord, Chips, LedgerSnapshot, Withdrawal},
    storage::{MemoryStorage, WalletStorage},
};
use chrono::Utc;
use log::{debug, error, info, warn};
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// In-memory state of one account, guarded by its own lock
#[derive(Debug, Default)]
struct AccountState {
    wallet: Chips,
    /// Whether the durable ledger already holds this account
    persisted: bool,
}

type AccountSlot = Arc<Mutex<AccountState>>;

/// Wallet manager
///
/// Every account has its own async mutex, so operations on one account are
/// totally ordered while different accounts proceed in parallel. The account
/// index lock is only held for lookups and inserts.
///
/// Lock order is always account slot, then durable snapshot. Mutations run
/// on their own task, so dropping a caller's future never leaves memory and
/// storage holding different balances.
#[derive(Clone)]
pub struct WalletManager {
    storage: Arc<dyn WalletStorage>,
    accounts: Arc<RwLock<HashMap<AccountId, AccountSlot>>>,
    durable: Arc<Mutex<LedgerSnapshot>>,
    persist_retries: u32,
    withdraw_min: Chips,
}

impl WalletManager {
    /// Open a wallet manager over `storage`
    ///
    /// # Arguments
    ///
    /// * `storage` - Durable ledger backend
    /// * `config` - Wallet configuration
    ///
    /// # Returns
    ///
    /// * `WalletResult<WalletManager>` - Manager loaded with the stored ledger
    pub async fn open(
        storage: Arc<dyn WalletStorage>,
        config: &WalletConfig,
    ) -> WalletResult<Self> {
        config.validate()?;

        let mut snapshot = storage.load().await?;
        let mut accounts = HashMap::with_capacity(snapshot.len());

        for (account, record) in snapshot.iter_mut() {
            if record.wallet < 0 {
                warn!(
                    "Stored wallet for {} is negative ({}), clamping to 0",
                    account, record.wallet
                );
                record.wallet = 0;
            }
            accounts.insert(
                account.clone(),
                Arc::new(Mutex::new(AccountState {
                    wallet: record.wallet,
                    persisted: true,
                })),
            );
        }

        info!("Wallet ledger loaded with {} account(s)", accounts.len());

        Ok(Self {
            storage,
            accounts: Arc::new(RwLock::new(accounts)),
            durable: Arc::new(Mutex::new(snapshot)),
            persist_retries: config.persist_retries,
            withdraw_min: config.withdraw_min,
        })
    }

    /// Open a wallet manager backed by fresh in-memory storage
    pub async fn in_memory() -> WalletResult<Self> {
        Self::open(Arc::new(MemoryStorage::new()), &WalletConfig::default()).await
    }

    /// Minimum withdrawal amount
    pub fn withdraw_min(&self) -> Chips {
        self.withdraw_min
    }

    /// Get wallet balance for an account
    ///
    /// Creates the account with a zero balance on first reference.
    ///
    /// # Arguments
    ///
    /// * `account` - Account ID
    ///
    /// # Returns
    ///
    /// * `WalletResult<Chips>` - Current balance
    pub async fn get_balance(&self, account: &AccountId) -> WalletResult<Chips> {
        {
            let slot = self.slot(account).await;
            let state = slot.lock().await;
            if state.persisted {
                return Ok(state.wallet);
            }
        }

        let balance = self.commit(account, Ok).await?;
        debug!("Created wallet for {}", account);
        Ok(balance)
    }

    /// Apply `delta` to an account's balance
    ///
    /// A result below zero is clamped to zero rather than rejected. Callers that
    /// need a hard funds check use [`try_debit`](Self::try_debit).
    ///
    /// # Arguments
    ///
    /// * `account` - Account ID
    /// * `delta` - Signed amount to apply
    ///
    /// # Returns
    ///
    /// * `WalletResult<Chips>` - New balance
    ///
    /// # Errors
    ///
    /// * `WalletError::BalanceOverflow` - Credit would overflow
    /// * `WalletError::Persistence` - Durable write failed, nothing changed
    pub async fn adjust_balance(&self, account: &AccountId, delta: Chips) -> WalletResult<Chips> {
        let new_balance = self
            .commit(account, move |wallet| {
                wallet
                    .checked_add(delta)
                    .map(|balance| balance.max(0))
                    .ok_or(WalletError::BalanceOverflow)
            })
            .await?;

        debug!(
            "Adjusted {} by {}: new balance {}",
            account, delta, new_balance
        );
        Ok(new_balance)
    }

    /// Atomically check funds and debit
    ///
    /// The funds check and the debit happen under the same account lock, so two
    /// concurrent debits can never both spend the same chips.
    ///
    /// # Arguments
    ///
    /// * `account` - Account ID
    /// * `amount` - Amount to debit (must be positive)
    ///
    /// # Returns
    ///
    /// * `WalletResult<Chips>` - New balance
    ///
    /// # Errors
    ///
    /// * `WalletError::InvalidAmount` - Amount is zero or negative
    /// * `WalletError::InsufficientFunds` - Balance is lower than `amount`
    /// * `WalletError::Persistence` - Durable write failed, nothing changed
    pub async fn try_debit(&self, account: &AccountId, amount: Chips) -> WalletResult<Chips> {
        self.try_debit_with_headroom(account, amount, 0).await
    }

    /// [`try_debit`](Self::try_debit) that also requires `headroom` more chips
    /// to fit on top of the debited balance
    ///
    /// Used to reserve room for a credit that must not fail once the debit has
    /// committed.
    ///
    /// # Errors
    ///
    /// * `WalletError::BalanceOverflow` - `headroom` would not fit; nothing changed
    pub async fn try_debit_with_headroom(
        &self,
        account: &AccountId,
        amount: Chips,
        headroom: Chips,
    ) -> WalletResult<Chips> {
        if amount <= 0 {
            return Err(WalletError::InvalidAmount(amount));
        }
        if headroom < 0 {
            return Err(WalletError::InvalidAmount(headroom));
        }

        let new_balance = self
            .commit(account, move |wallet| {
                if amount > wallet {
                    return Err(WalletError::InsufficientFunds {
                        available: wallet,
                        required: amount,
                    });
                }
                let remaining = wallet - amount;
                remaining
                    .checked_add(headroom)
                    .ok_or(WalletError::BalanceOverflow)?;
                Ok(remaining)
            })
            .await?;

        debug!("Debited {} from {}: new balance {}", amount, account, new_balance);
        Ok(new_balance)
    }

    /// Credit that saturates at the maximum balance instead of failing
    ///
    /// Only for settling a wager whose headroom was reserved at debit time.
    pub(crate) async fn credit_saturating(
        &self,
        account: &AccountId,
        credit: Chips,
    ) -> WalletResult<Chips> {
        let owner = account.clone();
        self.commit(account, move |wallet| {
            let balance = wallet.saturating_add(credit);
            if balance == Chips::MAX && wallet.checked_add(credit).is_none() {
                warn!(
                    "Credit of {} to {} capped at the maximum balance",
                    credit, owner
                );
            }
            Ok(balance)
        })
        .await
    }

    /// Cashier grant
    ///
    /// Positive amounts credit the account, negative amounts take chips back
    /// (clamped at zero).
    ///
    /// # Errors
    ///
    /// * `WalletError::InvalidAmount` - Amount is zero
    pub async fn grant(&self, account: &AccountId, amount: Chips) -> WalletResult<Chips> {
        if amount == 0 {
            return Err(WalletError::InvalidAmount(amount));
        }

        let new_balance = self.adjust_balance(account, amount).await?;
        info!(
            "Granted {} chips to {}: new balance {}",
            amount, account, new_balance
        );
        Ok(new_balance)
    }

    /// Request a cash-out
    ///
    /// The chips are debited immediately; the returned record is what a cashier
    /// pays out against.
    ///
    /// # Errors
    ///
    /// * `WalletError::BelowMinimum` - Amount is under the configured minimum
    /// * `WalletError::InsufficientFunds` - Balance is lower than `amount`
    pub async fn withdraw(
        &self,
        account: &AccountId,
        amount: Chips,
        note: Option<&str>,
    ) -> WalletResult<Withdrawal> {
        if amount < self.withdraw_min {
            return Err(WalletError::BelowMinimum {
                minimum: self.withdraw_min,
                requested: amount,
            });
        }

        let remaining = self.try_debit(account, amount).await?;
        let withdrawal = Withdrawal {
            id: Uuid::new_v4(),
            account: account.clone(),
            amount,
            note: note
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            remaining,
            requested_at: Utc::now(),
        };

        info!(
            "Withdrawal {} requested by {}: {} chips, {} remaining",
            withdrawal.id, account, amount, remaining
        );
        Ok(withdrawal)
    }

    /// Copy of the committed ledger
    pub async fn snapshot(&self) -> LedgerSnapshot {
        self.durable.lock().await.clone()
    }

    /// Number of known accounts
    pub async fn account_count(&self) -> usize {
        self.accounts.read().await.len()
    }

    /// Look up or insert an account slot
    async fn slot(&self, account: &AccountId) -> AccountSlot {
        if let Some(slot) = self.accounts.read().await.get(account) {
            return Arc::clone(slot);
        }

        // Another task may have inserted it between the two locks
        let mut accounts = self.accounts.write().await;
        Arc::clone(accounts.entry(account.clone()).or_default())
    }

    /// Compute and commit a new balance for `account`
    ///
    /// `update` maps the current balance to the new one under the account lock.
    /// The lock, write and in-memory update run on a spawned task, so they
    /// finish even if the caller stops waiting.
    async fn commit<F>(&self, account: &AccountId, update: F) -> WalletResult<Chips>
    where
        F: FnOnce(Chips) -> WalletResult<Chips> + Send + 'static,
    {
        let manager = self.clone();
        let account = account.clone();
        tokio::spawn(async move { manager.commit_locked(&account, update).await })
            .await
            .map_err(|e| PersistenceError::Unavailable(format!("ledger task failed: {e}")))?
    }

    async fn commit_locked<F>(&self, account: &AccountId, update: F) -> WalletResult<Chips>
    where
        F: FnOnce(Chips) -> WalletResult<Chips>,
    {
        let slot = self.slot(account).await;
        let mut state = slot.lock().await;

        let new_balance = update(state.wallet)?;
        if state.persisted && new_balance == state.wallet {
            return Ok(new_balance);
        }

        self.persist(account, new_balance).await?;
        state.wallet = new_balance;
        state.persisted = true;
        Ok(new_balance)
    }

    /// Write the ledger with `account` set to `wallet`
    ///
    /// The durable snapshot only takes the new value once storage accepts it.
    async fn persist(&self, account: &AccountId, wallet: Chips) -> PersistenceResult<()> {
        let mut durable = self.durable.lock().await;
        let mut next = durable.clone();
        next.insert(account.clone(), AccountRecord { wallet });

        let mut attempt = 0;
        loop {
            match self.storage.save(&next).await {
                Ok(()) => {
                    *durable = next;
                    return Ok(());
                }
                Err(e) if attempt < self.persist_retries => {
                    attempt += 1;
                    warn!(
                        "Ledger write for {} failed (attempt {}/{}): {}",
                        account,
                        attempt,
                        self.persist_retries + 1,
                        e
                    );
                    tokio::time::sleep(Duration::from_millis(10 * u64::from(attempt))).await;
                }
                Err(e) => {
                    error!("Ledger write for {} failed permanently: {}", account, e);
                    return Err(e);
                }
            }
        }
    }
}
