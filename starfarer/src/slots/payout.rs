//! Pay table and settlement arithmetic.

use super::{
    config::MachineConfig,
    models::{Draw, Multiplier, WinKind},
    reel::Reel,
};
use crate::wallet::Chips;

/// Multipliers indexed by reel position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayTable {
    three_of_a_kind: Vec<Multiplier>,
    adjacent_pair: Multiplier,
}

impl PayTable {
    /// Build from a validated config; symbols missing from the table pay zero
    pub fn new(reel: &Reel, config: &MachineConfig) -> Self {
        let three_of_a_kind = reel
            .symbols()
            .iter()
            .map(|s| {
                config
                    .three_of_a_kind
                    .get(&s.name)
                    .copied()
                    .unwrap_or(Multiplier::ZERO)
            })
            .collect();

        Self {
            three_of_a_kind,
            adjacent_pair: config.adjacent_pair,
        }
    }

    pub fn three_of_a_kind(&self, index: usize) -> Multiplier {
        self.three_of_a_kind
            .get(index)
            .copied()
            .unwrap_or(Multiplier::ZERO)
    }

    pub fn adjacent_pair(&self) -> Multiplier {
        self.adjacent_pair
    }

    /// Largest multiplier any draw can pay
    pub fn max_multiplier(&self) -> Multiplier {
        self.three_of_a_kind
            .iter()
            .copied()
            .fold(self.adjacent_pair, Multiplier::max)
    }

    /// Classify a draw
    ///
    /// Only adjacent pairs count: a draw whose outer symbols match around a
    /// different middle symbol is a loss. A zero multiplier is always a loss.
    pub fn evaluate(&self, draw: Draw) -> (WinKind, Multiplier) {
        let [first, second, third] = draw;

        let (kind, multiplier) = if first == second && second == third {
            (WinKind::ThreeOfAKind, self.three_of_a_kind(first))
        } else if first == second || second == third {
            (WinKind::AdjacentPair, self.adjacent_pair)
        } else {
            (WinKind::Loss, Multiplier::ZERO)
        };

        if multiplier.is_zero() {
            (WinKind::Loss, Multiplier::ZERO)
        } else {
            (kind, multiplier)
        }
    }

    /// Expected amount returned per chip staked, including the returned stake
    ///
    /// Ignores the one-chip minimum win, so small stakes return slightly more.
    pub fn return_to_player(&self, reel: &Reel) -> f64 {
        let n = reel.symbols().len();
        let p: Vec<f64> = (0..n).map(|i| reel.probability(i)).collect();

        let mut rtp = 0.0;
        for (i, &pi) in p.iter().enumerate() {
            let triple = self.three_of_a_kind(i);
            if !triple.is_zero() {
                rtp += pi.powi(3) * (1.0 + triple.as_f64());
            }

            // first == second != third, or first != second == third
            if !self.adjacent_pair.is_zero() {
                let pair = 2.0 * pi * pi * (1.0 - pi);
                rtp += pair * (1.0 + self.adjacent_pair.as_f64());
            }
        }
        rtp
    }
}

/// Profit for a settled stake: zero on a loss, otherwise
/// `floor(stake * multiplier)` raised to at least one chip.
///
/// Returns `None` if the profit overflows.
pub fn winnings(stake: Chips, multiplier: Multiplier) -> Option<Chips> {
    if multiplier.is_zero() {
        return Some(0);
    }
    multiplier.apply(stake).map(|w| w.max(1))
}
