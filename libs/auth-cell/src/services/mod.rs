pub mod account;
pub mod password;

pub use account::*;
pub use password::*;
