use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::domain::{Account, AccountStore, AtmError, Bank, BillCount, CashInventory, Cents};

/// Startup data for the terminal: the accounts it serves and the bills
/// loaded into the dispenser. Read once; nothing is written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankSeed {
    pub accounts: Vec<Account>,
    pub cash: Vec<BillCount>,
}

/// What `BankSeed::summarize` reports about a valid seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub account_count: usize,
    pub total_balance: Cents,
    pub cash_total: Cents,
    pub bills: Vec<BillCount>,
}

impl BankSeed {
    /// Two demo cardholders and a dispenser of 100.00, 50.00 and 20.00 bills.
    pub fn demo() -> Self {
        Self {
            accounts: vec![
                Account::new(12345, 54321, 100_000),
                Account::new(98765, 56789, 20_000),
            ],
            cash: vec![
                BillCount::from((10_000, 50)),
                BillCount::from((5_000, 100)),
                BillCount::from((2_000, 500)),
            ],
        }
    }

    /// Read a seed from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid seed file: {}", path.display()))
    }

    /// Write the seed as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize seed")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write seed file: {}", path.display()))
    }

    /// Build the in-memory bank, enforcing unique ids, non-negative
    /// balances and positive denominations.
    pub fn into_bank(self) -> Result<Bank, AtmError> {
        let accounts = AccountStore::from_accounts(self.accounts)?;
        let cash = CashInventory::new(
            self.cash
                .into_iter()
                .map(|bills| (bills.denomination, bills.count)),
        )?;
        Ok(Bank::new(accounts, cash))
    }

    pub fn summarize(&self) -> Result<SeedSummary, AtmError> {
        let bank = self.clone().into_bank()?;
        Ok(SeedSummary {
            account_count: bank.accounts.len(),
            total_balance: bank.accounts.total_balance(),
            cash_total: bank.cash.total(),
            bills: bank.cash.denominations().map(BillCount::from).collect(),
        })
    }
}

impl Default for BankSeed {
    fn default() -> Self {
        Self::demo()
    }
}
