use crate::logging::log_rejection;
use starfarer::{
    AccountId, Chips,
    slots::{SlotMachine, SpinResult},
    wallet::Withdrawal,
};
use std::fmt::{self, Write};

/// A parsed cashier or player command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show an account's balance.
    Balance(AccountId),
    /// Cashier credit (or debit, if negative).
    AddChips { account: AccountId, amount: Chips },
    /// Spin the reels.
    Slots { account: AccountId, stake: Chips },
    /// Request a cash-out.
    Withdraw {
        account: AccountId,
        amount: Chips,
        note: Option<String>,
    },
    /// Show the pay table and rules.
    PayTable,
    /// Show available commands.
    Help,
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Command is missing its account argument.
    MissingAccount(&'static str),
    /// Command is missing its amount argument.
    MissingAmount(&'static str),
    /// Amount is not a valid integer.
    InvalidAmount(String),
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAccount(usage) | Self::MissingAmount(usage) => {
                write!(f, "Usage: {usage}")
            }
            Self::InvalidAmount(value) => {
                write!(f, "Invalid amount '{value}'. Must be a whole number")
            }
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{cmd}'. Type 'help' to see available commands"
            ),
        }
    }
}

impl std::error::Error for ParseError {}

const USAGE_BAL: &str = "bal <account>";
const USAGE_ADDCHIPS: &str = "addchips <account> <amount>";
const USAGE_SLOTS: &str = "slots <account> <amount>";
const USAGE_WITHDRAW: &str = "withdraw <account> <amount> [note]";

/// Parse a command string into a Command.
///
/// # Examples
///
/// ```
/// use sf_cli::commands::{Command, parse_command};
/// use starfarer::AccountId;
///
/// assert_eq!(parse_command("paytable"), Ok(Command::PayTable));
/// assert_eq!(
///     parse_command("slots 42 10"),
///     Ok(Command::Slots { account: AccountId::from(42u64), stake: 10 })
/// );
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim();
    let parts: Vec<&str> = trimmed.split_ascii_whitespace().collect();

    match parts.first().copied() {
        Some("bal" | "balance") => Ok(Command::Balance(account_arg(&parts, USAGE_BAL)?)),
        Some("addchips") => Ok(Command::AddChips {
            account: account_arg(&parts, USAGE_ADDCHIPS)?,
            amount: amount_arg(&parts, USAGE_ADDCHIPS)?,
        }),
        Some("slots") => Ok(Command::Slots {
            account: account_arg(&parts, USAGE_SLOTS)?,
            stake: amount_arg(&parts, USAGE_SLOTS)?,
        }),
        Some("withdraw" | "cashout" | "payout") => {
            let account = account_arg(&parts, USAGE_WITHDRAW)?;
            let amount = amount_arg(&parts, USAGE_WITHDRAW)?;
            let note = parts.get(3..).map(|rest| rest.join(" ")).filter(|n| !n.is_empty());
            Ok(Command::Withdraw {
                account,
                amount,
                note,
            })
        }
        Some("rules" | "payouts" | "paytable") => Ok(Command::PayTable),
        Some("help") => Ok(Command::Help),
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}

fn account_arg(parts: &[&str], usage: &'static str) -> Result<AccountId, ParseError> {
    parts
        .get(1)
        .map(|id| AccountId::from(*id))
        .ok_or(ParseError::MissingAccount(usage))
}

fn amount_arg(parts: &[&str], usage: &'static str) -> Result<Chips, ParseError> {
    let value = parts.get(2).ok_or(ParseError::MissingAmount(usage))?;
    value
        .parse()
        .map_err(|_| ParseError::InvalidAmount(value.to_string()))
}

/// Run a command against the machine and its wallet, returning the reply text.
///
/// Rejections are rendered from the error's client message, never as a failure.
pub async fn execute(command: Command, machine: &SlotMachine) -> String {
    let wallet = machine.wallet();

    match command {
        Command::Balance(account) => match wallet.get_balance(&account).await {
            Ok(chips) => format!("🛰️ {account} has {chips} cosmic chips."),
            Err(e) => reject("bal", Some(&account), e.code(), e.client_message()),
        },
        Command::AddChips { account, amount } => match wallet.grant(&account, amount).await {
            Ok(balance) => format!(
                "🪙 {account} received {amount} cosmic chips.\n💰 New balance: {balance}"
            ),
            Err(e) => reject("addchips", Some(&account), e.code(), e.client_message()),
        },
        Command::Slots { account, stake } => match machine.spin(&account, stake).await {
            Ok(result) => render_spin(&result),
            Err(e) => reject("slots", Some(&account), e.code(), e.client_message()),
        },
        Command::Withdraw {
            account,
            amount,
            note,
        } => match wallet.withdraw(&account, amount, note.as_deref()).await {
            Ok(withdrawal) => render_withdrawal(&withdrawal),
            Err(e) => reject("withdraw", Some(&account), e.code(), e.client_message()),
        },
        Command::PayTable => render_pay_table(machine),
        Command::Help => HELP.to_string(),
    }
}

fn reject(command: &str, account: Option<&AccountId>, code: &str, message: String) -> String {
    log_rejection(command, account.map(AccountId::as_str), code);
    format!("❌ {message}")
}

fn render_spin(result: &SpinResult) -> String {
    let [r1, r2, r3] = &result.symbols;
    let outcome = if result.is_win() {
        format!(
            "🚀 Mission success! Won {} chips ({}).",
            result.winnings, result.multiplier
        )
    } else {
        format!("Lost {} chips drifting through space.", result.stake)
    };
    format!(
        "🎰 | {r1} | {r2} | {r3} |\n{outcome}\n💰 Balance: {}",
        result.balance
    )
}

fn render_withdrawal(withdrawal: &Withdrawal) -> String {
    let mut out = format!(
        "🏧 Withdrawal request {}\n👤 Player: {}\n🪙 Amount: {} tokens\n💰 Remaining balance: {} tokens",
        withdrawal.id, withdrawal.account, withdrawal.amount, withdrawal.remaining
    );
    if let Some(note) = &withdrawal.note {
        let _ = write!(out, "\n📝 Note: {note}");
    }
    out
}

fn render_pay_table(machine: &SlotMachine) -> String {
    let mut out = String::from("💫 3-of-a-kind pay table (profit multipliers)\n");
    for line in machine.pay_lines() {
        let g = &line.symbol.glyph;
        let _ = writeln!(
            out,
            "{g}{g}{g}  = {} profit  ({:.2}% per reel)",
            line.three_of_a_kind,
            line.probability * 100.0
        );
    }
    let _ = write!(
        out,
        "✨ 2 adjacent matching symbols = {} profit\n\
         • Your bet is deducted first; a win returns your bet plus profit\n\
         • Theoretical return: {:.2}%\n\
         • Minimum withdrawal: {} chips",
        machine.pay_table().adjacent_pair(),
        machine.return_to_player() * 100.0,
        machine.wallet().withdraw_min()
    );
    out
}

const HELP: &str = "\
🌌 Starfarer Slots

  slots <account> <amount>             Spin the reels
  bal <account>                        Check a balance
  withdraw <account> <amount> [note]   Request a cashier payout (chips are deducted immediately)
  addchips <account> <amount>          Cashier credit
  paytable                             Rules and payouts
  help                                 This message";

#[cfg(test)]
mod tests {
    use super::*;
    use starfarer::{MachineConfig, WalletManager};
    use std::sync::Arc;

    #[test]
    fn test_parse_aliases() {
        assert_eq!(
            parse_command("balance 7"),
            Ok(Command::Balance(AccountId::from(7u64)))
        );
        assert_eq!(parse_command("payouts"), Ok(Command::PayTable));
        assert_eq!(parse_command("  help  "), Ok(Command::Help));
    }

    #[test]
    fn test_parse_withdraw_note() {
        assert_eq!(
            parse_command("cashout 9 25 send to my   paypal"),
            Ok(Command::Withdraw {
                account: AccountId::from(9u64),
                amount: 25,
                note: Some("send to my paypal".to_string()),
            })
        );
        assert_eq!(
            parse_command("withdraw 9 25"),
            Ok(Command::Withdraw {
                account: AccountId::from(9u64),
                amount: 25,
                note: None,
            })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_command("slots"),
            Err(ParseError::MissingAccount(USAGE_SLOTS))
        );
        assert_eq!(
            parse_command("addchips 5"),
            Err(ParseError::MissingAmount(USAGE_ADDCHIPS))
        );
        assert_eq!(
            parse_command("slots 5 ten"),
            Err(ParseError::InvalidAmount("ten".to_string()))
        );
        assert!(matches!(
            parse_command("dance"),
            Err(ParseError::UnrecognizedCommand(_))
        ));
    }

    #[test]
    fn test_negative_amount_parses() {
        // Rejected later by the machine, not by the parser
        assert_eq!(
            parse_command("slots 5 -3"),
            Ok(Command::Slots {
                account: AccountId::from(5u64),
                stake: -3
            })
        );
    }

    async fn machine() -> SlotMachine {
        let wallet = Arc::new(WalletManager::in_memory().await.unwrap());
        SlotMachine::new(wallet, &MachineConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_execute_rejections_render_messages() {
        let machine = machine().await;

        let reply = execute(parse_command("slots 1 0").unwrap(), &machine).await;
        assert!(reply.starts_with("❌ Invalid stake"));

        let reply = execute(parse_command("slots 1 5").unwrap(), &machine).await;
        assert_eq!(reply, "❌ You only have 0 chips");

        let reply = execute(parse_command("addchips 1 0").unwrap(), &machine).await;
        assert_eq!(reply, "❌ Invalid amount: 0");
    }

    #[tokio::test]
    async fn test_execute_cashier_flow() {
        let machine = machine().await;

        let reply = execute(parse_command("addchips 1 50").unwrap(), &machine).await;
        assert!(reply.contains("New balance: 50"));

        let reply = execute(parse_command("withdraw 1 20 cash").unwrap(), &machine).await;
        assert!(reply.contains("Remaining balance: 30 tokens"));
        assert!(reply.contains("Note: cash"));

        let reply = execute(parse_command("bal 1").unwrap(), &machine).await;
        assert_eq!(reply, "🛰️ 1 has 30 cosmic chips.");
    }

    #[tokio::test]
    async fn test_pay_table_lists_every_symbol() {
        let machine = machine().await;
        let reply = execute(Command::PayTable, &machine).await;
        assert!(reply.contains("💎💎💎  = x50 profit"));
        assert!(reply.contains("x0.25 profit"));
        assert!(reply.contains("Theoretical return: 84.98%"));
        assert!(reply.contains("Minimum withdrawal: 1 chips"));
    }
}
