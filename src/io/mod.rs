// Concrete terminal and file output built on the application contracts.

pub mod console;
pub mod export;

pub use console::*;
pub use export::*;
