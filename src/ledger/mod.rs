//! Ledger module containing the token ledger, staged writes and allowance rules

pub mod allowance;
pub mod changes;
pub mod core;
pub mod shared;

pub use allowance::*;
pub use changes::*;
pub use self::core::*;
pub use shared::*;
