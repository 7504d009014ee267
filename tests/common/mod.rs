// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::collections::VecDeque;

use teller::application::{InputClosed, KeyEntry, Keypad, Screen, SessionController};
use teller::domain::{Account, AccountStore, Bank, CashInventory};

/// Keypad that answers from a prepared script and closes when it runs out.
/// Every request is logged so tests can check what the terminal asked for.
#[derive(Debug, Default)]
pub struct ScriptedKeypad {
    entries: VecDeque<Option<i64>>,
    pub requests: Vec<&'static str>,
}

impl ScriptedKeypad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(mut self, value: i64) -> Self {
        self.entries.push_back(Some(value));
        self
    }

    /// A blank or unreadable entry.
    pub fn garbage(mut self) -> Self {
        self.entries.push_back(None);
        self
    }

    pub fn login(self, account: i64, pin: i64) -> Self {
        self.key(account).key(pin)
    }

    pub fn choose(self, option: i64) -> Self {
        self.key(option)
    }

    pub fn balance(self) -> Self {
        self.choose(1)
    }

    pub fn withdraw(self, amount: i64) -> Self {
        self.choose(2).key(amount)
    }

    pub fn transfer(self, target: i64, amount: i64) -> Self {
        self.choose(3).key(target).key(amount)
    }

    pub fn exit(self) -> Self {
        self.choose(4)
    }

    pub fn remaining(&self) -> usize {
        self.entries.len()
    }

    fn next(&mut self, request: &'static str) -> KeyEntry {
        self.requests.push(request);
        self.entries.pop_front().ok_or(InputClosed)
    }
}

impl Keypad for ScriptedKeypad {
    fn request_account_id(&mut self) -> KeyEntry {
        self.next("account_id")
    }

    fn request_pin(&mut self) -> KeyEntry {
        self.next("pin")
    }

    fn request_menu_choice(&mut self) -> KeyEntry {
        self.next("menu_choice")
    }

    fn request_amount(&mut self) -> KeyEntry {
        self.next("amount")
    }

    fn request_target_account_id(&mut self) -> KeyEntry {
        self.next("target_account_id")
    }
}

/// Screen that keeps everything it was asked to show.
#[derive(Debug, Default)]
pub struct RecordingScreen {
    pub lines: Vec<String>,
    pub errors: Vec<String>,
}

impl RecordingScreen {
    pub fn shows(&self, text: &str) -> bool {
        self.lines.iter().any(|line| line == text)
    }

    pub fn count(&self, text: &str) -> usize {
        self.lines.iter().filter(|line| *line == text).count()
    }
}

impl Screen for RecordingScreen {
    fn display_line(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }

    fn display_error(&mut self, text: &str) {
        self.errors.push(text.to_string());
    }
}

pub type TestController = SessionController<ScriptedKeypad, RecordingScreen>;

/// Two cardholders and the standard dispenser:
/// 12345 / PIN 1234 / 1000 and 54321 / PIN 4321 / 500,
/// bills {100: 5, 50: 10, 20: 10}.
pub fn scenario_bank() -> Bank {
    Bank::new(
        AccountStore::from_accounts([
            Account::new(12345, 1234, 1000),
            Account::new(54321, 4321, 500),
        ])
        .unwrap(),
        CashInventory::new([(100, 5), (50, 10), (20, 10)]).unwrap(),
    )
}

/// Run the terminal over the script until the keypad closes.
pub fn run_script(keypad: ScriptedKeypad) -> TestController {
    run_script_with(scenario_bank(), keypad)
}

pub fn run_script_with(bank: Bank, keypad: ScriptedKeypad) -> TestController {
    let mut controller = SessionController::new(keypad, RecordingScreen::default(), bank);
    controller.run().unwrap();
    controller
}
