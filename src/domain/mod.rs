mod account;
mod bank;
mod cash;
mod error;
mod journal;
mod money;
mod session;
mod transaction;

pub use account::*;
pub use bank::*;
pub use cash::*;
pub use error::*;
pub use journal::*;
pub use money::*;
pub use session::*;
pub use transaction::*;
