//! Interactive cashier and slot machine over a JSON ledger.
//!
//! Runs a single command given on the command line, or reads commands from
//! stdin one per line until EOF.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Error};
use ctrlc::set_handler;
use log::info;
use pico_args::Arguments;
use sf_cli::{
    commands::{execute, parse_command},
    config::CliConfig,
    logging,
};
use starfarer::{
    slots::SlotMachine,
    wallet::{JsonFileStorage, WalletManager},
};
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Play cosmic slots against a persistent chip ledger

USAGE:
  sf_cli [OPTIONS] [COMMAND...]

OPTIONS:
  --ledger     PATH        Ledger file  [default: env LEDGER_PATH or economy.json]
  --machine    PATH        JSON machine definition  [default: env SLOTS_MACHINE or built-in]

FLAGS:
  -h, --help               Print help information

COMMANDS:
  slots <account> <amount>, bal <account>, withdraw <account> <amount> [note],
  addchips <account> <amount>, paytable, help
  With no command, commands are read from stdin one per line.

ENVIRONMENT:
  LEDGER_PATH              Ledger file path
  LEDGER_PERSIST_RETRIES   Extra attempts for a failed ledger write
  WITHDRAW_MIN             Smallest withdrawal accepted
  SLOTS_MACHINE            JSON machine definition
  RUST_LOG                 Log filter (default: info)
";

struct Args {
    ledger: Option<PathBuf>,
    machine: Option<PathBuf>,
    command: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        ledger: pargs.opt_value_from_str("--ledger")?,
        machine: pargs.opt_value_from_str("--machine")?,
        command: pargs
            .finish()
            .into_iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect(),
    };

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    logging::init();

    let config = CliConfig::from_env(args.ledger, args.machine)?;
    let machine_config = config.load_machine()?;

    let storage = Arc::new(JsonFileStorage::new(config.wallet.ledger_path.clone()));
    info!("Opening ledger at {}", storage.path().display());
    let wallet = Arc::new(
        WalletManager::open(storage, &config.wallet)
            .await
            .context("Failed to open ledger")?,
    );
    let machine = SlotMachine::new(wallet, &machine_config)?;
    info!(
        "Machine ready with {} symbols, return to player {:.2}%",
        machine.reel().symbols().len(),
        machine.return_to_player() * 100.0
    );

    if !args.command.is_empty() {
        let line = args.command.join(" ");
        match parse_command(&line) {
            Ok(command) => println!("{}", execute(command, &machine).await),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(2);
            }
        }
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Ok(command) => println!("{}", execute(command, &machine).await),
            Err(e) => println!("{e}"),
        }
    }

    Ok(())
}
