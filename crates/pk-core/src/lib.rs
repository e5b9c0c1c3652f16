//! `pk-core`: foundational types for the `rust_park` simulation.
//!
//! This crate is a dependency of every other `pk-*` crate and has no `pk-*`
//! dependencies of its own.
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `LotId`, `SlotIndex`, `CarId`, `SlotRef`              |
//! | [`config`]      | `ParkingConfig`, `LotSpec`                            |
//! | [`rng`]         | `SimRng`                                              |
//! | [`process`]     | `RandomProcess` (Poisson / exponential / normal)      |
//! | [`error`]       | `CoreError`, `CoreResult`                             |

pub mod config;
pub mod error;
pub mod ids;
pub mod process;
pub mod rng;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{LotSpec, ParkingConfig};
pub use error::{CoreError, CoreResult};
pub use ids::{CarId, LotId, SlotIndex, SlotRef};
pub use process::RandomProcess;
pub use rng::SimRng;
