mod seed;

pub use seed::*;
