//! `pk-sim`: the concurrent admission, allocation, and release engine.
//!
//! # Data flow
//!
//! ```text
//! ArrivalScheduler ──spawns──▶ CarLifecycle (one task per car)
//!                                 │ acquire AdmissionGate permit
//!                                 │ SlotAllocator::claim  ──▶ OccupancyStore
//!                                 │ AccountStore: debit, assign
//!                                 │ sleep dwell
//!                                 │ SlotAllocator::release ──▶ OccupancyStore
//!                                 └ permit dropped
//! StatisticsAggregator ──reads──▶ OccupancyStore / SimulationCounters
//! ```
//!
//! Car tasks run on tokio.  The only suspension points are the gate, the
//! dwell sleep, and the scheduler's inter-arrival sleep; every occupancy
//! change happens under its lot's lock without awaiting.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let mut sim = SimBuilder::new(ParkingConfig::default())
//!     .observer(Arc::new(LogObserver))
//!     .build()?;
//! sim.run_ticks(10).await;
//! let summary = sim.drain().await;
//! ```

pub mod allocator;
pub mod builder;
pub mod car;
pub mod counters;
pub mod error;
pub mod gate;
pub mod lifecycle;
pub mod observer;
pub mod scheduler;
pub mod stats;
pub mod tasks;


pub use allocator::{Claim, SlotAllocator, lowest_free_slot};
pub use builder::SimBuilder;
pub use car::{Car, CarState};
pub use counters::{LotGuard, SimulationCounters};
pub use error::{SimError, SimResult, Stage};
pub use gate::{AdmissionGate, AdmissionPermit};
pub use lifecycle::{CarLifecycle, CarOutcome, ParkingContext};
pub use observer::{FanOut, LogObserver, NoopObserver, ParkingObserver};
pub use scheduler::{ArrivalScheduler, TickReport};
pub use stats::{Drift, LotStats, Snapshot, StatisticsAggregator, log_snapshot};
pub use tasks::{CarTasks, RunSummary};
