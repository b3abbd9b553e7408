//! Slot machine configuration.

use super::{
    errors::{MachineConfigError, MachineConfigResult},
    models::{Multiplier, Symbol},
};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashSet},
    path::Path,
};

/// Symbol catalog and pay table
///
/// Loaded once at startup and never mutated afterwards.
///
/// ```json
/// {
///   "symbols": [{ "name": "planet", "glyph": "🪐", "weight": 40 }],
///   "three_of_a_kind": { "planet": 2 },
///   "adjacent_pair": 0.25
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Reel faces with their draw weights
    pub symbols: Vec<Symbol>,

    /// Symbol name -> three-of-a-kind profit multiplier
    pub three_of_a_kind: BTreeMap<String, Multiplier>,

    /// Profit multiplier for exactly one adjacent pair
    #[serde(default = "default_adjacent_pair")]
    pub adjacent_pair: Multiplier,
}

fn default_adjacent_pair() -> Multiplier {
    Multiplier::from_hundredths(25)
}

impl MachineConfig {
    /// Parse and validate a JSON machine definition
    pub fn from_json(json: &str) -> MachineConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON machine definition from disk
    pub fn from_file(path: impl AsRef<Path>) -> MachineConfigResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> MachineConfigResult<()> {
        if self.symbols.is_empty() {
            return Err(MachineConfigError::EmptyCatalog);
        }

        let mut names = HashSet::with_capacity(self.symbols.len());
        for symbol in &self.symbols {
            if symbol.weight == 0 {
                return Err(MachineConfigError::ZeroWeight(symbol.name.clone()));
            }
            if !names.insert(symbol.name.as_str()) {
                return Err(MachineConfigError::DuplicateSymbol(symbol.name.clone()));
            }
        }

        if let Some(unknown) = self
            .three_of_a_kind
            .keys()
            .find(|name| !names.contains(name.as_str()))
        {
            return Err(MachineConfigError::UnknownSymbol(unknown.clone()));
        }

        Ok(())
    }
}

impl Default for MachineConfig {
    /// The Starfarer machine: five symbols weighted 40/30/20/8/2
    fn default() -> Self {
        let symbols = vec![
            Symbol::new("planet", "🪐", 40),
            Symbol::new("moon", "🌙", 30),
            Symbol::new("explorer", "👨‍🚀", 20),
            Symbol::new("rocket", "🚀", 8),
            Symbol::new("crystal", "💎", 2),
        ];

        let three_of_a_kind = [
            ("planet", 2),
            ("moon", 3),
            ("explorer", 5),
            ("rocket", 15),
            ("crystal", 50),
        ]
        .into_iter()
        .map(|(name, times)| (name.to_string(), Multiplier::whole(times)))
        .collect();

        Self {
            symbols,
            three_of_a_kind,
            adjacent_pair: default_adjacent_pair(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = MachineConfig::default();
        assert!(config.validate().is_ok());
        let total: u32 = config.symbols.iter().map(|s| s.weight).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_from_json_defaults_pair_multiplier() {
        let config = MachineConfig::from_json(
            r#"{
                "symbols": [
                    { "name": "a", "glyph": "A", "weight": 1 },
                    { "name": "b", "glyph": "B", "weight": 3 }
                ],
                "three_of_a_kind": { "a": 10 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.adjacent_pair, Multiplier::from_hundredths(25));
        assert_eq!(config.three_of_a_kind["a"], Multiplier::whole(10));
    }

    #[test]
    fn test_rejects_unknown_pay_table_symbol() {
        let mut config = MachineConfig::default();
        config
            .three_of_a_kind
            .insert("comet".to_string(), Multiplier::whole(5));
        assert!(matches!(
            config.validate(),
            Err(MachineConfigError::UnknownSymbol(name)) if name == "comet"
        ));
    }

    #[test]
    fn test_rejects_zero_weight_and_duplicates() {
        let mut config = MachineConfig::default();
        config.symbols[0].weight = 0;
        assert!(matches!(
            config.validate(),
            Err(MachineConfigError::ZeroWeight(_))
        ));

        let mut config = MachineConfig::default();
        config.symbols.push(Symbol::new("moon", "🌕", 1));
        assert!(matches!(
            config.validate(),
            Err(MachineConfigError::DuplicateSymbol(_))
        ));

        let config = MachineConfig {
            symbols: vec![],
            three_of_a_kind: BTreeMap::new(),
            adjacent_pair: Multiplier::ZERO,
        };
        assert!(matches!(
            config.validate(),
            Err(MachineConfigError::EmptyCatalog)
        ));
    }

    #[test]
    fn test_rejects_negative_multiplier_in_json() {
        let err = MachineConfig::from_json(
            r#"{
                "symbols": [{ "name": "a", "glyph": "A", "weight": 1 }],
                "three_of_a_kind": { "a": -2 }
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, MachineConfigError::Parse(_)));
    }
}
