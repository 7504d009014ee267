use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    AccountId, AtmError, Cents, Dispense, Transaction, TransactionKind, TransactionOutcome,
    TransactionStatus,
};

pub type ReceiptId = Uuid;

/// Audit record of one executed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: ReceiptId,
    pub account: AccountId,
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    /// Error message shown to the cardholder, for failed transactions
    pub error: Option<String>,
    /// Bills handed out, for withdrawals
    pub dispensed: Option<Dispense>,
    /// Account balance after a completed transaction
    pub balance_after: Option<Cents>,
    pub recorded_at: DateTime<Utc>,
}

impl Receipt {
    pub fn new(
        transaction: &Transaction,
        result: &Result<TransactionOutcome, AtmError>,
    ) -> Self {
        let (error, dispensed, balance_after) = match result {
            Ok(outcome) => {
                let dispensed = match outcome {
                    TransactionOutcome::Withdrawn { dispensed, .. } => Some(dispensed.clone()),
                    _ => None,
                };
                (None, dispensed, Some(outcome.balance()))
            }
            Err(err) => (Some(err.to_string()), None, None),
        };

        Self {
            id: Uuid::new_v4(),
            account: transaction.account(),
            kind: transaction.kind(),
            status: transaction.status(),
            error,
            dispensed,
            balance_after,
            recorded_at: Utc::now(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TransactionStatus::Completed
    }
}

/// Receipts in the order the transactions ran. Lives as long as the process.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    receipts: Vec<Receipt>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, receipt: Receipt) -> &Receipt {
        self.receipts.push(receipt);
        &self.receipts[self.receipts.len() - 1]
    }

    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    pub fn for_account(&self, account: AccountId) -> impl Iterator<Item = &Receipt> {
        self.receipts.iter().filter(move |r| r.account == account)
    }

    /// Total cash handed out by completed withdrawals.
    pub fn total_dispensed(&self) -> Cents {
        self.receipts
            .iter()
            .filter(|r| r.is_completed())
            .filter_map(|r| match r.kind {
                TransactionKind::Withdrawal { amount } => Some(amount),
                _ => None,
            })
            .sum()
    }

    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }
}
