use tracing::{debug, error, info, warn};

use crate::domain::{
    AccountId, AtmError, Bank, Journal, Receipt, Session, Transaction, TransactionOutcome,
    format_cents,
};

use super::{InputClosed, Keypad, Screen};

/// Entries of the main menu, keyed by the number the cardholder types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    BalanceInquiry,
    Withdrawal,
    Transfer,
    Exit,
}

impl MenuOption {
    /// Menu entries in display order.
    pub const ALL: [MenuOption; 4] = [
        MenuOption::BalanceInquiry,
        MenuOption::Withdrawal,
        MenuOption::Transfer,
        MenuOption::Exit,
    ];

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(MenuOption::BalanceInquiry),
            2 => Some(MenuOption::Withdrawal),
            3 => Some(MenuOption::Transfer),
            4 => Some(MenuOption::Exit),
            _ => None,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            MenuOption::BalanceInquiry => 1,
            MenuOption::Withdrawal => 2,
            MenuOption::Transfer => 3,
            MenuOption::Exit => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuOption::BalanceInquiry => "View my balance",
            MenuOption::Withdrawal => "Withdraw cash",
            MenuOption::Transfer => "Transfer funds",
            MenuOption::Exit => "Exit",
        }
    }
}

/// Where the terminal is. The session travels with the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated(Session),
    MenuLoop(Session),
    Terminated(Session),
}

#[derive(Debug)]
enum Halt {
    InputClosed,
    Fatal(AtmError),
}

impl From<InputClosed> for Halt {
    fn from(_: InputClosed) -> Self {
        Halt::InputClosed
    }
}

/// Drives the terminal: login, main menu, one transaction per menu pass,
/// and back to login when the cardholder leaves.
pub struct SessionController<K, S> {
    keypad: K,
    screen: S,
    bank: Bank,
    journal: Journal,
    sessions_completed: u64,
}

impl<K: Keypad, S: Screen> SessionController<K, S> {
    pub fn new(keypad: K, screen: S, bank: Bank) -> Self {
        Self {
            keypad,
            screen,
            bank,
            journal: Journal::new(),
            sessions_completed: 0,
        }
    }

    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn keypad(&self) -> &K {
        &self.keypad
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    /// Number of sessions that ended with the cardholder choosing Exit.
    pub fn sessions_completed(&self) -> u64 {
        self.sessions_completed
    }

    pub fn into_parts(self) -> (Bank, Journal) {
        (self.bank, self.journal)
    }

    /// Serve cardholders one after another until the keypad closes.
    ///
    /// Returns `Err` only when the authenticated account disappears from the
    /// ledger mid-session, which means the bank state is corrupt.
    pub fn run(&mut self) -> Result<(), AtmError> {
        let mut state = SessionState::Unauthenticated(Session::new());
        loop {
            state = match self.step(state) {
                Ok(next) => next,
                Err(Halt::InputClosed) => {
                    info!(
                        sessions = self.sessions_completed,
                        transactions = self.journal.len(),
                        "Input closed, shutting down terminal"
                    );
                    return Ok(());
                }
                Err(Halt::Fatal(err)) => {
                    error!(error = %err, "Authenticated account missing from the ledger");
                    return Err(err);
                }
            };
        }
    }

    fn step(&mut self, state: SessionState) -> Result<SessionState, Halt> {
        match state {
            SessionState::Unauthenticated(session) => self.authenticate_user(session),
            SessionState::MenuLoop(session) => self.perform_transactions(session),
            SessionState::Terminated(session) => {
                self.sessions_completed += 1;
                debug!(account = ?session.account(), "Session reset");
                Ok(SessionState::Unauthenticated(session.reset()))
            }
        }
    }

    fn authenticate_user(&mut self, session: Session) -> Result<SessionState, Halt> {
        self.screen.display_line("Welcome!");
        self.screen.display_line("Please insert your card");
        self.screen.display_line("[Enter your account ID]");
        let account = self.keypad.request_account_id()?;
        self.screen.display_line("Please enter your password");
        let pin = self.keypad.request_pin()?;

        match (account, pin) {
            (Some(account), Some(pin)) if self.bank.accounts.authenticate(account, pin) => {
                info!(account, "Cardholder authenticated");
                Ok(SessionState::MenuLoop(session.authenticate(account)))
            }
            _ => {
                warn!(account = ?account, "Authentication failed");
                self.screen
                    .display_error(&AtmError::InvalidCredentials.to_string());
                Ok(SessionState::Unauthenticated(session))
            }
        }
    }

    fn perform_transactions(&mut self, session: Session) -> Result<SessionState, Halt> {
        let Some(account) = session.account() else {
            return Ok(SessionState::Unauthenticated(session.reset()));
        };

        self.display_main_menu();
        let choice = self.keypad.request_menu_choice()?;
        match choice.and_then(MenuOption::from_code) {
            Some(MenuOption::Exit) => {
                info!(account, "Cardholder exited");
                self.screen.display_line("Exiting the system...");
                Ok(SessionState::Terminated(session))
            }
            Some(option) => {
                self.perform(account, option)?;
                Ok(SessionState::MenuLoop(session))
            }
            None => {
                debug!(choice = ?choice, "Invalid menu selection");
                self.screen
                    .display_error(&AtmError::InvalidSelection.to_string());
                Ok(SessionState::MenuLoop(session))
            }
        }
    }

    fn display_main_menu(&mut self) {
        self.screen.display_line("Main menu:");
        for option in MenuOption::ALL {
            self.screen
                .display_line(&format!("{} - {}", option.code(), option.label()));
        }
        self.screen.display_line("Enter a choice:");
    }

    fn perform(&mut self, account: AccountId, option: MenuOption) -> Result<(), Halt> {
        let mut transaction = match self.create_transaction(account, option)? {
            Ok(transaction) => transaction,
            Err(err) => {
                self.screen.display_error(&err.to_string());
                return Ok(());
            }
        };

        let result = transaction.execute(&mut self.bank);
        self.journal.record(Receipt::new(&transaction, &result));

        match result {
            Ok(outcome) => {
                info!(
                    account,
                    kind = %transaction.kind(),
                    balance = outcome.balance(),
                    "Transaction completed"
                );
                self.display_outcome(&outcome);
                Ok(())
            }
            Err(AtmError::UnknownAccount(missing)) if missing == account => {
                Err(Halt::Fatal(AtmError::UnknownAccount(missing)))
            }
            Err(err) => {
                warn!(account, kind = %transaction.kind(), error = %err, "Transaction rejected");
                self.screen.display_error(&err.to_string());
                Ok(())
            }
        }
    }

    fn create_transaction(
        &mut self,
        account: AccountId,
        option: MenuOption,
    ) -> Result<Result<Transaction, AtmError>, InputClosed> {
        let transaction = match option {
            MenuOption::BalanceInquiry => Transaction::balance_inquiry(account),
            MenuOption::Withdrawal => {
                self.screen.display_line("Enter the amount to withdraw:");
                let Some(amount) = self.keypad.request_amount()? else {
                    return Ok(Err(AtmError::InvalidAmount(
                        "No amount entered".to_string(),
                    )));
                };
                Transaction::withdrawal(account, amount)
            }
            MenuOption::Transfer => {
                self.screen
                    .display_line("Enter the account number to transfer to:");
                let Some(target) = self.keypad.request_target_account_id()? else {
                    return Ok(Err(AtmError::InvalidTarget(
                        "No account number entered".to_string(),
                    )));
                };
                self.screen.display_line("Enter the amount to transfer:");
                let Some(amount) = self.keypad.request_amount()? else {
                    return Ok(Err(AtmError::InvalidAmount(
                        "No amount entered".to_string(),
                    )));
                };
                Transaction::transfer(account, target, amount)
            }
            MenuOption::Exit => return Ok(Err(AtmError::InvalidSelection)),
        };
        Ok(Ok(transaction))
    }

    fn display_outcome(&mut self, outcome: &TransactionOutcome) {
        match outcome {
            TransactionOutcome::Balance { balance } => {
                self.screen.display_line("Balance Information:");
                self.screen
                    .display_line(&format!("Total balance: {}", format_cents(*balance)));
            }
            TransactionOutcome::Withdrawn {
                amount,
                dispensed,
                balance,
            } => {
                self.screen.display_line(&format!(
                    "Please take your cash now: {}",
                    format_cents(*amount)
                ));
                for (denomination, count) in dispensed.iter().rev() {
                    self.screen
                        .display_line(&format!("  {} x {}", count, format_cents(*denomination)));
                }
                self.screen
                    .display_line(&format!("Remaining balance: {}", format_cents(*balance)));
            }
            TransactionOutcome::Transferred {
                target,
                amount,
                balance,
            } => {
                self.screen.display_line(&format!(
                    "Transferred {} to account {}.",
                    format_cents(*amount),
                    target
                ));
                self.screen
                    .display_line(&format!("Remaining balance: {}", format_cents(*balance)));
            }
        }
    }
}
