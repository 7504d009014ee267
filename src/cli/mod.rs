use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::application::SessionController;
use crate::domain::{AtmError, Bank, Journal, format_cents};
use crate::io::{ConsoleKeypad, ConsoleScreen, export_journal_json};
use crate::storage::BankSeed;

/// Teller - ATM terminal simulator
#[derive(Parser)]
#[command(name = "teller")]
#[command(about = "Simulates a single ATM: PIN login, balance inquiry, cash withdrawal and transfers")]
#[command(version)]
pub struct Cli {
    /// Seed file with accounts and bill stock (JSON); built-in demo bank if omitted
    #[arg(short, long, global = true)]
    pub seed: Option<PathBuf>,

    /// Enable verbose logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the terminal on stdin/stdout (the default)
    Run {
        /// Write the transaction journal as JSON when input ends
        #[arg(long)]
        journal: Option<PathBuf>,
    },

    /// Validate the seed data and print a summary
    Check,

    /// Print the built-in demo seed as JSON (ignores --seed)
    Seed {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        init_tracing(self.verbose);

        let seed = self.seed.as_deref();
        match self.command.unwrap_or(Commands::Run { journal: None }) {
            Commands::Run { journal } => run_terminal(load_seed(seed)?, journal.as_deref()),
            Commands::Check => run_check_command(&load_seed(seed)?),
            Commands::Seed { output } => run_seed_command(output.as_deref()),
        }
    }
}

fn load_seed(path: Option<&Path>) -> Result<BankSeed> {
    match path {
        Some(path) => BankSeed::load(path),
        None => Ok(BankSeed::demo()),
    }
}

/// Logs go to stderr so they never mix with the terminal on stdout.
/// `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run_terminal(seed: BankSeed, journal: Option<&Path>) -> Result<()> {
    let bank = seed.into_bank().context("Invalid seed data")?;
    info!(
        accounts = bank.accounts.len(),
        cash = bank.cash.total(),
        "Terminal ready"
    );

    let keypad = ConsoleKeypad::new(io::stdin().lock());
    let screen = ConsoleScreen::new(io::stdout());
    let mut controller = SessionController::new(keypad, screen, bank);
    let outcome = controller.run();
    let (bank, receipts) = controller.into_parts();
    finish_run(outcome, &bank, &receipts, journal)
}

/// Write the journal whenever one was asked for, including after a fatal
/// stop, then report how the terminal ended.
fn finish_run(
    outcome: Result<(), AtmError>,
    bank: &Bank,
    journal: &Journal,
    journal_path: Option<&Path>,
) -> Result<()> {
    if let Some(path) = journal_path {
        let file = File::create(path)
            .with_context(|| format!("Failed to create journal file: {}", path.display()))?;
        let snapshot = export_journal_json(bank, journal, BufWriter::new(file))?;
        eprintln!(
            "Wrote {} receipt(s) to {}",
            snapshot.receipts.len(),
            path.display()
        );
    }
    outcome.context("Terminal stopped on an inconsistent ledger")
}

fn run_check_command(seed: &BankSeed) -> Result<()> {
    let summary = seed.summarize().context("Seed data is invalid")?;

    println!("Seed OK");
    println!("  Accounts:      {}", summary.account_count);
    println!("  Total balance: {}", format_cents(summary.total_balance));
    println!("  Cash on hand:  {}", format_cents(summary.cash_total));
    for bills in summary.bills.iter().rev() {
        println!(
            "    {:>10} x {}",
            format_cents(bills.denomination),
            bills.count
        );
    }
    Ok(())
}

fn run_seed_command(output: Option<&Path>) -> Result<()> {
    let seed = BankSeed::demo();
    match output {
        Some(path) => {
            seed.save(path)?;
            eprintln!("Wrote demo seed to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&seed)?),
    }
    Ok(())
}
