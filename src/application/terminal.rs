use thiserror::Error;

/// The input source has nothing more to give (end of input, device gone).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("input source closed")]
pub struct InputClosed;

/// One keypad answer. `Ok(None)` is a blank or malformed entry.
pub type KeyEntry = Result<Option<i64>, InputClosed>;

/// Where the controller gets its numbers from. Every call blocks until the
/// cardholder answers.
pub trait Keypad {
    fn request_account_id(&mut self) -> KeyEntry;
    fn request_pin(&mut self) -> KeyEntry;
    fn request_menu_choice(&mut self) -> KeyEntry;
    /// Amount in cents.
    fn request_amount(&mut self) -> KeyEntry;
    fn request_target_account_id(&mut self) -> KeyEntry;
}

/// Where the controller writes to.
pub trait Screen {
    fn display_line(&mut self, text: &str);
    fn display_error(&mut self, text: &str);
}
