//! Wallet configuration.

use super::{
    errors::{WalletError, WalletResult},
    models::Chips,
};
use std::path::PathBuf;

/// Wallet configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletConfig {
    /// Ledger file location
    pub ledger_path: PathBuf,

    /// Extra attempts for a failed durable write before giving up
    pub persist_retries: u32,

    /// Smallest amount a withdrawal may request
    pub withdraw_min: Chips,
}

impl WalletConfig {
    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `LEDGER_PATH`: Ledger file (default: economy.json)
    /// - `LEDGER_PERSIST_RETRIES`: Retries per failed write (default: 2)
    /// - `WITHDRAW_MIN`: Minimum withdrawal (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ledger_path: std::env::var("LEDGER_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.ledger_path),
            persist_retries: parse_env_or("LEDGER_PERSIST_RETRIES", defaults.persist_retries),
            withdraw_min: parse_env_or("WITHDRAW_MIN", defaults.withdraw_min),
        }
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> WalletResult<()> {
        if self.withdraw_min < 1 {
            return Err(WalletError::Configuration(format!(
                "WITHDRAW_MIN must be at least 1, got {}",
                self.withdraw_min
            )));
        }

        if self.persist_retries > 10 {
            return Err(WalletError::Configuration(format!(
                "LEDGER_PERSIST_RETRIES must be at most 10, got {}",
                self.persist_retries
            )));
        }

        Ok(())
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            ledger_path: PathBuf::from("economy.json"),
            persist_retries: 2,
            withdraw_min: 1,
        }
    }
}

fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_is_valid() {
        assert!(WalletConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_withdraw_min_rejected() {
        let config = WalletConfig {
            withdraw_min: 0,
            ..WalletConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, WalletError::Configuration(_)));
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        // SAFETY: serialized with other env-mutating tests
        unsafe {
            std::env::set_var("LEDGER_PATH", "/tmp/ledger-test.json");
            std::env::set_var("WITHDRAW_MIN", "25");
            std::env::set_var("LEDGER_PERSIST_RETRIES", "not-a-number");
        }

        let config = WalletConfig::from_env();
        assert_eq!(config.ledger_path, PathBuf::from("/tmp/ledger-test.json"));
        assert_eq!(config.withdraw_min, 25);
        assert_eq!(config.persist_retries, 2);

        unsafe {
            std::env::remove_var("LEDGER_PATH");
            std::env::remove_var("WITHDRAW_MIN");
            std::env::remove_var("LEDGER_PERSIST_RETRIES");
        }
    }
}
