pub mod availability;
pub mod blocks;
pub mod slots;

pub use availability::*;
pub use blocks::*;
pub use slots::*;
