//! Logging configuration.

use env_logger::Env;

/// Initialize logging
///
/// Level is taken from `RUST_LOG`, defaulting to `info`.
pub fn init() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_target(false)
        .init();
}

/// Log a rejected command with its stable error code
///
/// # Arguments
///
/// * `command` - Command name
/// * `account` - Account the command was for, if any
/// * `code` - Stable error code
pub fn log_rejection(command: &str, account: Option<&str>, code: &str) {
    log::warn!(
        "Rejected {} for {}: {}",
        command,
        account.unwrap_or("-"),
        code
    );
}
