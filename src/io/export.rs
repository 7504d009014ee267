use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::domain::{Account, AccountId, Bank, BillCount, Cents, Journal, Receipt};

/// End-of-run snapshot: every receipt plus the ledger and dispenser state
/// the terminal finished with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub receipts: Vec<Receipt>,
    pub accounts: Vec<AccountBalance>,
    pub cash: Vec<BillCount>,
    pub total_dispensed: Cents,
}

/// Balance line of the snapshot. PINs are not exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub id: AccountId,
    pub balance: Cents,
}

impl From<&Account> for AccountBalance {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            balance: account.balance,
        }
    }
}

impl JournalSnapshot {
    pub fn capture(bank: &Bank, journal: &Journal) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            receipts: journal.receipts().to_vec(),
            accounts: bank
                .accounts
                .accounts()
                .into_iter()
                .map(AccountBalance::from)
                .collect(),
            cash: bank
                .cash
                .denominations()
                .map(BillCount::from)
                .collect(),
            total_dispensed: journal.total_dispensed(),
        }
    }
}

/// Write the snapshot as pretty-printed JSON.
pub fn export_journal_json<W: Write>(
    bank: &Bank,
    journal: &Journal,
    mut writer: W,
) -> Result<JournalSnapshot> {
    let snapshot = JournalSnapshot::capture(bank, journal);
    serde_json::to_writer_pretty(&mut writer, &snapshot)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(snapshot)
}
