use chrono::{DateTime, Utc};

use super::AccountId;

/// One cardholder's visit, from login to exit.
///
/// A fresh session has no account bound. Logging in produces a new value
/// with the account bound; `reset` returns the initial value again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    account: Option<AccountId>,
    started_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the authenticated account.
    pub fn authenticate(self, account: AccountId) -> Self {
        Self {
            account: Some(account),
            started_at: Some(Utc::now()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.account.is_some()
    }

    pub fn account(&self) -> Option<AccountId> {
        self.account
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn reset(self) -> Self {
        Self::new()
    }
}
