//! Slot machine data models.

use super::errors::{MachineConfigError, MachineConfigResult};
use crate::wallet::{AccountId, Chips};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed-point scale for multipliers (hundredths)
pub const MULTIPLIER_SCALE: u32 = 100;

/// A reel face
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    /// Stable name used as the pay table key
    pub name: String,
    /// Display glyph
    pub glyph: String,
    /// Relative draw weight
    pub weight: u32,
}

impl Symbol {
    pub fn new(name: &str, glyph: &str, weight: u32) -> Self {
        Self {
            name: name.to_string(),
            glyph: glyph.to_string(),
            weight,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.glyph)
    }
}

/// Profit multiplier stored in hundredths so payouts use integer math
///
/// Serialized as a plain number (`0.25`, `50`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "f64", into = "f64")]
pub struct Multiplier(u32);

impl Multiplier {
    pub const ZERO: Self = Self(0);

    pub const fn from_hundredths(hundredths: u32) -> Self {
        Self(hundredths)
    }

    pub const fn whole(times: u32) -> Self {
        Self(times * MULTIPLIER_SCALE)
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / f64::from(MULTIPLIER_SCALE)
    }

    /// `floor(stake * self)`, or `None` on overflow
    pub fn apply(self, stake: Chips) -> Option<Chips> {
        let scaled = i128::from(stake) * i128::from(self.0) / i128::from(MULTIPLIER_SCALE);
        Chips::try_from(scaled).ok()
    }
}

impl TryFrom<f64> for Multiplier {
    type Error = MachineConfigError;

    fn try_from(value: f64) -> MachineConfigResult<Self> {
        let scaled = value * f64::from(MULTIPLIER_SCALE);
        if !scaled.is_finite()
            || scaled < 0.0
            || scaled > f64::from(u32::MAX)
            || (scaled - scaled.round()).abs() > 1e-6
        {
            return Err(MachineConfigError::InvalidMultiplier(value));
        }
        Ok(Self(scaled.round() as u32))
    }
}

impl From<Multiplier> for f64 {
    fn from(m: Multiplier) -> Self {
        m.as_f64()
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / MULTIPLIER_SCALE;
        let frac = self.0 % MULTIPLIER_SCALE;
        if frac == 0 {
            write!(f, "x{whole}")
        } else if frac % 10 == 0 {
            write!(f, "x{whole}.{}", frac / 10)
        } else {
            write!(f, "x{whole}.{frac:02}")
        }
    }
}

/// How a draw paid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinKind {
    ThreeOfAKind,
    AdjacentPair,
    Loss,
}

impl fmt::Display for WinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WinKind::ThreeOfAKind => write!(f, "three_of_a_kind"),
            WinKind::AdjacentPair => write!(f, "adjacent_pair"),
            WinKind::Loss => write!(f, "loss"),
        }
    }
}

/// Indices into the reel's symbol catalog, left to right
pub type Draw = [usize; 3];

/// Settled spin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinResult {
    pub account: AccountId,
    pub stake: Chips,
    pub symbols: [Symbol; 3],
    pub kind: WinKind,
    pub multiplier: Multiplier,
    /// Profit on top of the returned stake (zero on a loss)
    pub winnings: Chips,
    /// Net change to the balance: `winnings`, or `-stake` on a loss
    pub net: Chips,
    /// Balance after settlement
    pub balance: Chips,
}

impl SpinResult {
    pub fn is_win(&self) -> bool {
        self.kind != WinKind::Loss
    }
}

/// One row of the published pay table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayLine {
    pub symbol: Symbol,
    /// Draw probability of this symbol on a single reel
    pub probability: f64,
    pub three_of_a_kind: Multiplier,
}
