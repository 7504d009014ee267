use serde::{Deserialize, Serialize};

use super::{AccountId, AtmError, Bank, Cents, Dispense};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

/// What the cardholder asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransactionKind {
    BalanceInquiry,
    Withdrawal { amount: Cents },
    Transfer { target: AccountId, amount: Cents },
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::BalanceInquiry => "balance_inquiry",
            TransactionKind::Withdrawal { .. } => "withdrawal",
            TransactionKind::Transfer { .. } => "transfer",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of a completed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionOutcome {
    Balance {
        balance: Cents,
    },
    Withdrawn {
        amount: Cents,
        dispensed: Dispense,
        balance: Cents,
    },
    Transferred {
        target: AccountId,
        amount: Cents,
        balance: Cents,
    },
}

impl TransactionOutcome {
    /// Balance of the cardholder's account after the transaction.
    pub fn balance(&self) -> Cents {
        match self {
            TransactionOutcome::Balance { balance }
            | TransactionOutcome::Withdrawn { balance, .. }
            | TransactionOutcome::Transferred { balance, .. } => *balance,
        }
    }
}

/// A single operation bound to the authenticated account.
/// Starts `Pending` and moves to `Completed` or `Failed` on execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    account: AccountId,
    kind: TransactionKind,
    status: TransactionStatus,
}

impl Transaction {
    pub fn new(account: AccountId, kind: TransactionKind) -> Self {
        Self {
            account,
            kind,
            status: TransactionStatus::Pending,
        }
    }

    pub fn balance_inquiry(account: AccountId) -> Self {
        Self::new(account, TransactionKind::BalanceInquiry)
    }

    pub fn withdrawal(account: AccountId, amount: Cents) -> Self {
        Self::new(account, TransactionKind::Withdrawal { amount })
    }

    pub fn transfer(account: AccountId, target: AccountId, amount: Cents) -> Self {
        Self::new(account, TransactionKind::Transfer { target, amount })
    }

    pub fn account(&self) -> AccountId {
        self.account
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    /// Run the transaction against the bank. A transaction runs once.
    pub fn execute(&mut self, bank: &mut Bank) -> Result<TransactionOutcome, AtmError> {
        if self.status != TransactionStatus::Pending {
            return Err(AtmError::TransactionClosed);
        }

        let result = match self.kind {
            TransactionKind::BalanceInquiry => bank
                .accounts
                .balance(self.account)
                .map(|balance| TransactionOutcome::Balance { balance }),
            TransactionKind::Withdrawal { amount } => withdraw(bank, self.account, amount),
            TransactionKind::Transfer { target, amount } => {
                transfer(bank, self.account, target, amount)
            }
        };

        self.status = if result.is_ok() {
            TransactionStatus::Completed
        } else {
            TransactionStatus::Failed
        };
        result
    }
}

fn withdraw(bank: &mut Bank, account: AccountId, amount: Cents) -> Result<TransactionOutcome, AtmError> {
    if amount <= 0 {
        return Err(AtmError::InvalidAmount(
            "Amount must be positive".to_string(),
        ));
    }
    let smallest = bank
        .cash
        .smallest_denomination()
        .ok_or(AtmError::InsufficientStock { requested: amount })?;
    if amount % smallest != 0 {
        return Err(AtmError::InvalidAmount(format!(
            "Amount must be a multiple of {}",
            smallest
        )));
    }

    let balance = bank.accounts.debit(account, amount)?;
    match bank.cash.allocate(amount) {
        Ok(dispensed) => Ok(TransactionOutcome::Withdrawn {
            amount,
            dispensed,
            balance,
        }),
        Err(err) => {
            // Give the money back: no debit without bills.
            bank.accounts.credit(account, amount)?;
            Err(err)
        }
    }
}

fn transfer(
    bank: &mut Bank,
    account: AccountId,
    target: AccountId,
    amount: Cents,
) -> Result<TransactionOutcome, AtmError> {
    if target == account {
        return Err(AtmError::InvalidTarget(
            "Cannot transfer to the same account".to_string(),
        ));
    }
    if !bank.accounts.contains(target) {
        return Err(AtmError::UnknownAccount(target));
    }
    if amount <= 0 {
        return Err(AtmError::InvalidAmount(
            "Amount must be positive".to_string(),
        ));
    }

    bank.accounts.transfer(account, target, amount)?;
    Ok(TransactionOutcome::Transferred {
        target,
        amount,
        balance: bank.accounts.balance(account)?,
    })
}
