use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{AtmError, Cents};

pub type AccountId = i64;
pub type Pin = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub pin: Pin,
    /// Balance in cents, never negative once committed
    pub balance: Cents,
}

impl Account {
    pub fn new(id: AccountId, pin: Pin, balance: Cents) -> Self {
        Self { id, pin, balance }
    }

    pub fn pin_matches(&self, pin: Pin) -> bool {
        self.pin == pin
    }
}

/// The ledger of every account the terminal can serve.
/// Balances only change through `credit`, `debit` and `transfer`, and the
/// sum of all balances always fits in `Cents`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountStore {
    accounts: HashMap<AccountId, Account>,
    total: Cents,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a list of accounts, rejecting duplicate ids.
    pub fn from_accounts(accounts: impl IntoIterator<Item = Account>) -> Result<Self, AtmError> {
        let mut store = Self::new();
        for account in accounts {
            store.open(account)?;
        }
        Ok(store)
    }

    /// Add a new account to the store.
    pub fn open(&mut self, account: Account) -> Result<(), AtmError> {
        if self.accounts.contains_key(&account.id) {
            return Err(AtmError::AccountAlreadyExists(account.id));
        }
        if account.balance < 0 {
            return Err(AtmError::InvalidAmount(format!(
                "opening balance of account {} is negative",
                account.id
            )));
        }
        self.total = self
            .total
            .checked_add(account.balance)
            .ok_or_else(total_overflow)?;
        self.accounts.insert(account.id, account);
        Ok(())
    }

    /// True iff the account exists and the PIN matches. Never mutates.
    pub fn authenticate(&self, id: AccountId, pin: Pin) -> bool {
        self.accounts
            .get(&id)
            .is_some_and(|account| account.pin_matches(pin))
    }

    pub fn contains(&self, id: AccountId) -> bool {
        self.accounts.contains_key(&id)
    }

    pub fn balance(&self, id: AccountId) -> Result<Cents, AtmError> {
        self.accounts
            .get(&id)
            .map(|account| account.balance)
            .ok_or(AtmError::UnknownAccount(id))
    }

    /// Add `amount` to the account, returning the new balance.
    pub fn credit(&mut self, id: AccountId, amount: Cents) -> Result<Cents, AtmError> {
        require_positive(amount)?;
        let account = self
            .accounts
            .get_mut(&id)
            .ok_or(AtmError::UnknownAccount(id))?;
        let total = self.total.checked_add(amount).ok_or_else(total_overflow)?;
        account.balance = account
            .balance
            .checked_add(amount)
            .ok_or_else(|| AtmError::InvalidAmount("balance would overflow".to_string()))?;
        self.total = total;
        Ok(account.balance)
    }

    /// Remove `amount` from the account, returning the new balance.
    pub fn debit(&mut self, id: AccountId, amount: Cents) -> Result<Cents, AtmError> {
        require_positive(amount)?;
        let account = self
            .accounts
            .get_mut(&id)
            .ok_or(AtmError::UnknownAccount(id))?;
        if account.balance < amount {
            return Err(AtmError::InsufficientFunds {
                account: id,
                balance: account.balance,
                required: amount,
            });
        }
        account.balance -= amount;
        self.total -= amount;
        Ok(account.balance)
    }

    /// Move `amount` between two accounts. Either both balances change or
    /// neither does: a failed credit undoes the debit before returning.
    pub fn transfer(&mut self, from: AccountId, to: AccountId, amount: Cents) -> Result<(), AtmError> {
        self.debit(from, amount)?;
        if let Err(err) = self.credit(to, amount) {
            self.restore(from, amount);
            return Err(err);
        }
        Ok(())
    }

    // Compensation for a debit that just succeeded, so it cannot overflow.
    fn restore(&mut self, id: AccountId, amount: Cents) {
        if let Some(account) = self.accounts.get_mut(&id) {
            account.balance += amount;
            self.total += amount;
        }
    }

    /// Sum of every balance in the ledger.
    pub fn total_balance(&self) -> Cents {
        self.total
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Accounts ordered by id.
    pub fn accounts(&self) -> Vec<&Account> {
        let mut accounts: Vec<&Account> = self.accounts.values().collect();
        accounts.sort_by_key(|account| account.id);
        accounts
    }
}

fn total_overflow() -> AtmError {
    AtmError::InvalidAmount("total balance would overflow".to_string())
}

fn require_positive(amount: Cents) -> Result<(), AtmError> {
    if amount <= 0 {
        return Err(AtmError::InvalidAmount(
            "Amount must be positive".to_string(),
        ));
    }
    Ok(())
}
