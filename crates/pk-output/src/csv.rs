//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `lot_snapshots.csv`
//! - `car_events.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{CarEventRow, LotSnapshotRow, OutputResult};

pub const SNAPSHOT_HEADER: [&str; 5] = ["elapsed_secs", "lot", "capacity", "occupied", "free"];
pub const EVENT_HEADER: [&str; 6] = ["elapsed_secs", "car", "event", "lot", "slot", "dwell_secs"];

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    events:    Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create the two CSV files in `dir` (which must exist) and write the
    /// header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut snapshots = Writer::from_path(dir.join("lot_snapshots.csv"))?;
        snapshots.write_record(SNAPSHOT_HEADER)?;

        let mut events = Writer::from_path(dir.join("car_events.csv"))?;
        events.write_record(EVENT_HEADER)?;

        Ok(Self { snapshots, events, finished: false })
    }
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[LotSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                format!("{:.3}", row.elapsed_secs),
                row.lot.to_string(),
                row.capacity.to_string(),
                row.occupied.to_string(),
                row.free.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_event(&mut self, row: &CarEventRow) -> OutputResult<()> {
        self.events.write_record(&[
            format!("{:.3}", row.elapsed_secs),
            row.car.to_string(),
            row.kind.as_str().to_owned(),
            opt(row.lot),
            opt(row.slot),
            opt(row.dwell_secs.map(|d| format!("{d:.1}"))),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.events.flush()?;
        Ok(())
    }
}
