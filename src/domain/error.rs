use thiserror::Error;

use super::{AccountId, Cents};

/// Everything that can go wrong inside the terminal.
///
/// Each variant is raised where it originates (account store, cash inventory
/// or transaction) and travels back to the session controller as a value.
/// The `Display` text is what the cardholder sees on screen.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AtmError {
    #[error("Invalid account number or PIN. Please try again.")]
    InvalidCredentials,

    #[error("You did not enter a valid selection. Try again.")]
    InvalidSelection,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Insufficient funds in account {account}: balance {balance}, required {required}")]
    InsufficientFunds {
        account: AccountId,
        balance: Cents,
        required: Cents,
    },

    #[error("Insufficient cash available in the ATM to dispense {requested}. Please choose a smaller amount.")]
    InsufficientStock { requested: Cents },

    #[error("Invalid target account: {0}")]
    InvalidTarget(String),

    #[error("Account not found: {0}")]
    UnknownAccount(AccountId),

    #[error("Account already exists: {0}")]
    AccountAlreadyExists(AccountId),

    #[error("Transaction has already been executed")]
    TransactionClosed,
}
