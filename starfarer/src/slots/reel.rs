//! Weighted reel and random sources.

use super::{
    errors::{MachineConfigError, MachineConfigResult},
    models::{Draw, Symbol},
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::sync::Mutex;

/// Source of uniform rolls for the reels
///
/// Injected into the machine so tests can force outcomes and simulations can
/// be replayed from a seed.
pub trait OutcomeSource: Send + Sync {
    /// Uniform roll in `0..total`
    fn roll(&self, total: u64) -> u64;
}

/// Thread-local OS-seeded randomness
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSource;

impl OutcomeSource for ThreadSource {
    fn roll(&self, total: u64) -> u64 {
        rand::rng().random_range(0..total)
    }
}

/// Deterministic source for replays and tests
#[derive(Debug)]
pub struct SeededSource {
    rng: Mutex<StdRng>,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl OutcomeSource for SeededSource {
    fn roll(&self, total: u64) -> u64 {
        // A poisoned lock still holds a usable generator
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.random_range(0..total)
    }
}

/// Reel with cumulative weights for binary-search sampling
#[derive(Debug, Clone)]
pub struct Reel {
    symbols: Vec<Symbol>,
    cumulative: Vec<u64>,
}

impl Reel {
    pub fn new(symbols: Vec<Symbol>) -> MachineConfigResult<Self> {
        if symbols.is_empty() {
            return Err(MachineConfigError::EmptyCatalog);
        }

        let mut cumulative = Vec::with_capacity(symbols.len());
        let mut running = 0u64;
        for symbol in &symbols {
            if symbol.weight == 0 {
                return Err(MachineConfigError::ZeroWeight(symbol.name.clone()));
            }
            running += u64::from(symbol.weight);
            cumulative.push(running);
        }

        Ok(Self {
            symbols,
            cumulative,
        })
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Position of the symbol called `name`
    pub fn position(&self, name: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s.name == name)
    }

    pub fn total_weight(&self) -> u64 {
        // Non-empty by construction
        self.cumulative.last().copied().unwrap_or_default()
    }

    /// Single-reel probability of the symbol at `index`
    pub fn probability(&self, index: usize) -> f64 {
        self.symbols
            .get(index)
            .map(|s| f64::from(s.weight) / self.total_weight() as f64)
            .unwrap_or(0.0)
    }

    /// Map a roll in `0..total_weight` to a symbol index
    pub fn index_for_roll(&self, roll: u64) -> usize {
        self.cumulative
            .partition_point(|&upper| upper <= roll)
            .min(self.symbols.len() - 1)
    }

    /// Smallest roll that lands on `index`
    pub fn first_roll_for(&self, index: usize) -> Option<u64> {
        match index {
            0 => Some(0),
            i if i < self.cumulative.len() => Some(self.cumulative[i - 1]),
            _ => None,
        }
    }

    /// Draw one symbol index
    pub fn spin_one(&self, source: &dyn OutcomeSource) -> usize {
        self.index_for_roll(source.roll(self.total_weight()))
    }

    /// Draw three independent symbol indices
    pub fn spin(&self, source: &dyn OutcomeSource) -> Draw {
        [
            self.spin_one(source),
            self.spin_one(source),
            self.spin_one(source),
        ]
    }
}
