// Application layer: the session state machine and the two collaborator
// contracts it talks through. Concrete terminals live in `crate::io`.

pub mod controller;
pub mod terminal;

pub use controller::*;
pub use terminal::*;
