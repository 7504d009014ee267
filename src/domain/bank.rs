use super::{AccountStore, CashInventory};

/// The state a transaction runs against: the ledger and the dispenser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bank {
    pub accounts: AccountStore,
    pub cash: CashInventory,
}

impl Bank {
    pub fn new(accounts: AccountStore, cash: CashInventory) -> Self {
        Self { accounts, cash }
    }
}
