//! # Token Ledger
//!
//! A fixed-supply fungible token ledger with direct transfers, delegated
//! spending through allowances, and an append-only event log.
//!
//! ## Features
//!
//! - **One-time mint**: the whole supply is credited to the creator at creation
//! - **Conservation**: total supply always equals the sum of all balances
//! - **Allowances**: approve a spender and let it transfer on the owner's behalf
//! - **Atomic operations**: every operation commits all of its writes or none
//! - **Events**: `Transfer` and `Approval` records for explorers and UIs
//! - **Storage abstraction**: backend-agnostic design with trait-based storage
//!
//! ## Quick Start
//!
//! ```rust
//! use token_ledger::utils::MemoryStorage;
//! use token_ledger::{Address, Ledger};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), token_ledger::LedgerError> {
//! let alice = Address::repeat_byte(0xaa);
//! let bob = Address::repeat_byte(0xbb);
//!
//! let mut ledger = Ledger::create(MemoryStorage::new(), "Example", "EXT", 18, 1000, alice)
//!     .await?;
//! let amount = ledger.parse_amount("2.5")?;
//! ledger.transfer(alice, bob, amount).await?;
//!
//! assert_eq!(ledger.balance_of(&bob).await?, 2_500_000_000_000_000_000);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod ledger;
pub mod traits;
pub mod types;
pub mod units;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use ledger::*;
pub use traits::*;
pub use types::*;
