//! `pk-store`: the external collaborators the simulation core writes to.
//!
//! | Trait              | Role                                               |
//! |--------------------|----------------------------------------------------|
//! | [`OccupancyStore`] | which `(lot, slot)` pairs are occupied, by whom    |
//! | [`AccountStore`]   | car balances and parked assignments                |
//!
//! Backends:
//!
//! | Feature   | Backend                                                 |
//! |-----------|---------------------------------------------------------|
//! | *(none)*  | [`MemoryStore`], plus the fault-injecting [`FlakyStore`] |
//! | `sqlite`  | `SqliteStore` (single database file)                    |

pub mod error;
pub mod flaky;
pub mod memory;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use error::{StoreError, StoreResult};
pub use flaky::{Fault, FlakyStore};
pub use memory::MemoryStore;
pub use traits::{Account, AccountStore, OccupancyStore};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
