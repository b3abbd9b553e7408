//! Slot machine: bet, draw, settle.

use super::{
    config::MachineConfig,
    errors::{MachineConfigResult, SlotsResult, SpinError},
    models::{Draw, PayLine, SpinResult, Symbol, WinKind},
    payout::{PayTable, winnings},
    reel::{OutcomeSource, Reel, ThreadSource},
};
use crate::wallet::{AccountId, Chips, WalletManager};
use log::{debug, error, info};
use std::sync::Arc;

struct MachineInner {
    wallet: Arc<WalletManager>,
    reel: Reel,
    pay_table: PayTable,
    source: Arc<dyn OutcomeSource>,
}

/// Slot machine bound to a wallet
///
/// Cheap to clone; clones share the reel, pay table and random source.
#[derive(Clone)]
pub struct SlotMachine {
    inner: Arc<MachineInner>,
}

impl SlotMachine {
    /// Create a machine drawing from thread-local randomness
    ///
    /// # Arguments
    ///
    /// * `wallet` - Ledger to bet against
    /// * `config` - Symbol catalog and pay table
    pub fn new(wallet: Arc<WalletManager>, config: &MachineConfig) -> MachineConfigResult<Self> {
        Self::with_source(wallet, config, Arc::new(ThreadSource))
    }

    /// Create a machine with an injected random source
    pub fn with_source(
        wallet: Arc<WalletManager>,
        config: &MachineConfig,
        source: Arc<dyn OutcomeSource>,
    ) -> MachineConfigResult<Self> {
        config.validate()?;
        let reel = Reel::new(config.symbols.clone())?;
        let pay_table = PayTable::new(&reel, config);

        Ok(Self {
            inner: Arc::new(MachineInner {
                wallet,
                reel,
                pay_table,
                source,
            }),
        })
    }

    pub fn reel(&self) -> &Reel {
        &self.inner.reel
    }

    pub fn pay_table(&self) -> &PayTable {
        &self.inner.pay_table
    }

    pub fn wallet(&self) -> &Arc<WalletManager> {
        &self.inner.wallet
    }

    /// Published pay table, one line per symbol in reel order
    pub fn pay_lines(&self) -> Vec<PayLine> {
        let reel = &self.inner.reel;
        reel.symbols()
            .iter()
            .enumerate()
            .map(|(index, symbol)| PayLine {
                symbol: symbol.clone(),
                probability: reel.probability(index),
                three_of_a_kind: self.inner.pay_table.three_of_a_kind(index),
            })
            .collect()
    }

    /// Theoretical return per chip staked
    pub fn return_to_player(&self) -> f64 {
        self.inner.pay_table.return_to_player(&self.inner.reel)
    }

    /// Wager `stake` chips on one spin
    ///
    /// The funds check and debit are one atomic wallet operation, which also
    /// reserves room for the largest possible payout. The whole spin runs on a
    /// detached task, so once the debit commits the spin settles even if the
    /// caller stops waiting.
    ///
    /// # Arguments
    ///
    /// * `account` - Account placing the bet
    /// * `stake` - Chips wagered
    ///
    /// # Returns
    ///
    /// * `SlotsResult<SpinResult>` - Drawn symbols, payout, and new balance
    ///
    /// # Errors
    ///
    /// * `SpinError::InvalidStake` - Stake is zero or negative
    /// * `SpinError::InsufficientFunds` - Stake exceeds the balance
    /// * `SpinError::BalanceOverflow` - The top payout would not fit in the balance
    /// * `SpinError::Persistence` - Ledger write failed
    pub async fn spin(&self, account: &AccountId, stake: Chips) -> SlotsResult<SpinResult> {
        if stake <= 0 {
            return Err(SpinError::InvalidStake(stake));
        }

        let inner = Arc::clone(&self.inner);
        let account = account.clone();
        tokio::spawn(async move { inner.play(account, stake).await })
            .await
            .map_err(|e| SpinError::SettlementAborted(e.to_string()))?
    }
}

impl MachineInner {
    async fn play(&self, account: AccountId, stake: Chips) -> SlotsResult<SpinResult> {
        let max_credit = winnings(stake, self.pay_table.max_multiplier())
            .and_then(|won| stake.checked_add(won))
            .ok_or(SpinError::BalanceOverflow)?;

        let debited = self
            .wallet
            .try_debit_with_headroom(&account, stake, max_credit)
            .await?;
        debug!("{} staked {} chips, balance {}", account, stake, debited);

        self.settle(account, stake, debited).await
    }

    async fn settle(
        &self,
        account: AccountId,
        stake: Chips,
        debited: Chips,
    ) -> SlotsResult<SpinResult> {
        let draw = self.reel.spin(self.source.as_ref());
        let (kind, multiplier) = self.pay_table.evaluate(draw);
        // Bounded by the headroom reserved at debit
        let won = winnings(stake, multiplier).unwrap_or(0);

        let (net, balance) = if kind == WinKind::Loss {
            (-stake, debited)
        } else {
            let credit = stake.saturating_add(won);
            let balance = self
                .wallet
                .credit_saturating(&account, credit)
                .await
                .inspect_err(|e| {
                    error!(
                        "Settlement credit of {} for {} failed after debit: {}",
                        credit, account, e
                    )
                })?;
            (won, balance)
        };

        let symbols = self.symbols_for(draw);
        info!(
            "Spin for {}: {} {} {} -> {} {} stake {} net {} balance {}",
            account,
            symbols[0],
            symbols[1],
            symbols[2],
            kind,
            multiplier,
            stake,
            net,
            balance
        );

        Ok(SpinResult {
            account,
            stake,
            symbols,
            kind,
            multiplier,
            winnings: won,
            net,
            balance,
        })
    }

    fn symbols_for(&self, draw: Draw) -> [Symbol; 3] {
        // Reel indices always come from this reel
        draw.map(|i| self.reel.symbols()[i].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Replays fixed symbol indices
    struct Scripted {
        rolls: Mutex<Vec<u64>>,
    }

    impl Scripted {
        fn draws(reel: &Reel, draw: Draw) -> Self {
            let mut rolls: Vec<u64> = draw
                .iter()
                .map(|&i| reel.first_roll_for(i).unwrap())
                .collect();
            rolls.reverse();
            Self {
                rolls: Mutex::new(rolls),
            }
        }
    }

    impl OutcomeSource for Scripted {
        fn roll(&self, _total: u64) -> u64 {
            self.rolls.lock().unwrap().pop().expect("script exhausted")
        }
    }

    async fn machine_with_draw(draw: Draw) -> (SlotMachine, AccountId) {
        let wallet = Arc::new(WalletManager::in_memory().await.unwrap());
        let config = MachineConfig::default();
        let reel = Reel::new(config.symbols.clone()).unwrap();
        let source = Arc::new(Scripted::draws(&reel, draw));
        let machine = SlotMachine::with_source(wallet, &config, source).unwrap();
        (machine, AccountId::from("pilot"))
    }

    #[tokio::test]
    async fn test_pair_with_small_stake_wins_one_chip() {
        let (machine, pilot) = machine_with_draw([1, 1, 0]).await;
        machine.wallet().adjust_balance(&pilot, 3).await.unwrap();

        let result = machine.spin(&pilot, 3).await.unwrap();
        assert_eq!(result.kind, WinKind::AdjacentPair);
        assert_eq!(result.winnings, 1);
        assert_eq!(result.net, 1);
        assert_eq!(result.balance, 4);
    }

    #[tokio::test]
    async fn test_loss_keeps_debit() {
        let (machine, pilot) = machine_with_draw([3, 0, 3]).await;
        machine.wallet().adjust_balance(&pilot, 20).await.unwrap();

        let result = machine.spin(&pilot, 8).await.unwrap();
        assert!(!result.is_win());
        assert_eq!(result.net, -8);
        assert_eq!(result.balance, 12);
    }

    #[tokio::test]
    async fn test_invalid_stake_draws_nothing() {
        let (machine, pilot) = machine_with_draw([0, 0, 0]).await;
        let err = machine.spin(&pilot, 0).await.unwrap_err();
        assert_eq!(err.code(), "invalid_stake");
    }

    #[tokio::test]
    async fn test_pay_lines_follow_reel_order() {
        let config = MachineConfig::default();
        let wallet = Arc::new(WalletManager::in_memory().await.unwrap());
        let machine = SlotMachine::new(wallet, &config).unwrap();

        let lines = machine.pay_lines();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0].symbol.name, "planet");
        assert_eq!(lines[4].three_of_a_kind.to_string(), "x50");
        assert!((lines[4].probability - 0.02).abs() < 1e-12);
    }
}
