//! CLI configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use starfarer::{
    slots::{MachineConfig, MachineConfigError},
    wallet::WalletConfig,
};
use std::path::PathBuf;

/// Complete CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Ledger configuration
    pub wallet: WalletConfig,
    /// Optional JSON machine definition; the built-in machine is used otherwise
    pub machine_path: Option<PathBuf>,
}

impl CliConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `ledger_override` - Optional ledger path override (from CLI args)
    /// * `machine_override` - Optional machine definition override (from CLI args)
    pub fn from_env(
        ledger_override: Option<PathBuf>,
        machine_override: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let mut wallet = WalletConfig::from_env();
        if let Some(path) = ledger_override {
            wallet.ledger_path = path;
        }

        let machine_path =
            machine_override.or_else(|| std::env::var("SLOTS_MACHINE").ok().map(PathBuf::from));

        let config = CliConfig {
            wallet,
            machine_path,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wallet.ledger_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                var: "LEDGER_PATH".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        self.wallet
            .validate()
            .map_err(|e| ConfigError::Invalid {
                var: "wallet".to_string(),
                reason: e.to_string(),
            })
    }

    /// Load the machine definition
    pub fn load_machine(&self) -> Result<MachineConfig, ConfigError> {
        match &self.machine_path {
            Some(path) => Ok(MachineConfig::from_file(path)?),
            None => Ok(MachineConfig::default()),
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },

    #[error("Invalid machine definition: {0}")]
    Machine(#[from] MachineConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Invalid {
            var: "LEDGER_PATH".to_string(),
            reason: "Must not be empty".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("LEDGER_PATH"));
        assert!(msg.contains("Must not be empty"));
    }

    #[test]
    #[serial]
    fn test_overrides_take_priority() {
        // SAFETY: serialized with other env-mutating tests
        unsafe {
            std::env::set_var("LEDGER_PATH", "/tmp/from-env.json");
            std::env::remove_var("SLOTS_MACHINE");
        }

        let config = CliConfig::from_env(Some(PathBuf::from("/tmp/from-args.json")), None).unwrap();
        assert_eq!(config.wallet.ledger_path, PathBuf::from("/tmp/from-args.json"));
        assert!(config.machine_path.is_none());
        assert_eq!(config.load_machine().unwrap(), MachineConfig::default());

        unsafe {
            std::env::remove_var("LEDGER_PATH");
        }
    }

    #[test]
    #[serial]
    fn test_invalid_withdraw_min_rejected() {
        unsafe {
            std::env::set_var("WITHDRAW_MIN", "0");
        }

        let err = CliConfig::from_env(None, None).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        unsafe {
            std::env::remove_var("WITHDRAW_MIN");
        }
    }

    #[test]
    fn test_missing_machine_file() {
        let config = CliConfig {
            wallet: WalletConfig::default(),
            machine_path: Some(PathBuf::from("/nonexistent/machine.json")),
        };
        assert!(matches!(
            config.load_machine(),
            Err(ConfigError::Machine(MachineConfigError::Io(_)))
        ));
    }
}
