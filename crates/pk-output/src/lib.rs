//! `pk-output`: simulation output for rust_park.
//!
//! | Piece              | Role                                                     |
//! |--------------------|----------------------------------------------------------|
//! | [`CsvWriter`]      | writes `lot_snapshots.csv` and `car_events.csv`          |
//! | [`OutputObserver`] | `ParkingObserver` that turns car events into rows        |
//! | [`StatsReporter`]  | samples lot occupancy on a fixed cadence into the sink   |
//!
//! # Usage
//!
//! ```rust,ignore
//! let sink = Arc::new(OutputObserver::new(CsvWriter::new(Path::new("./output"))?));
//! let mut sim = SimBuilder::new(config.clone()).observer(sink.clone()).build()?;
//! let reporter = StatsReporter::new(sim.stats(), sink.clone(), &config);
//! tokio::spawn(reporter.run_until(shutdown));
//! sim.run_until(ctrl_c).await;
//! sink.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod reporter;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::OutputObserver;
pub use reporter::StatsReporter;
pub use row::{CarEventRow, EventKind, LotSnapshotRow};
pub use writer::OutputWriter;
