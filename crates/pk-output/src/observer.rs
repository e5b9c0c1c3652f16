//! `OutputObserver<W>`: bridges `ParkingObserver` to an `OutputWriter`.

use std::sync::Mutex;

use pk_core::{CarId, LotId, SlotRef};
use pk_sim::{ParkingObserver, SimError, Snapshot};
use tokio::time::Instant;

use crate::row::{CarEventRow, EventKind, LotSnapshotRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`ParkingObserver`] that writes car events to any [`OutputWriter`]
/// backend.  [`StatsReporter`][crate::StatsReporter] writes lot snapshots
/// through the same sink.
///
/// Observer methods have no return value, so write errors are stored
/// internally.  After the run, check for them with
/// [`take_error`][Self::take_error].
pub struct OutputObserver<W: OutputWriter> {
    writer:     Mutex<W>,
    start:      Instant,
    last_error: Mutex<Option<OutputError>>,
}

impl<W: OutputWriter> OutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer: Mutex::new(writer), start: Instant::now(), last_error: Mutex::new(None) }
    }

    /// Take the first stored write error, if any.
    pub fn take_error(&self) -> Option<OutputError> {
        match self.last_error.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => Some(OutputError::Poisoned),
        }
    }

    /// Write one snapshot sample (a row per lot).
    pub fn record_snapshot(&self, snapshot: &Snapshot) -> OutputResult<()> {
        let rows = LotSnapshotRow::from_snapshot(self.elapsed_secs(), snapshot);
        self.with_writer(|w| w.write_snapshots(&rows))
    }

    /// Flush the writer.
    pub fn finish(&self) -> OutputResult<()> {
        self.with_writer(|w| w.finish())
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> OutputResult<W> {
        self.writer.into_inner().map_err(|_| OutputError::Poisoned)
    }

    fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    fn with_writer(&self, f: impl FnOnce(&mut W) -> OutputResult<()>) -> OutputResult<()> {
        let mut writer = self.writer.lock().map_err(|_| OutputError::Poisoned)?;
        f(&mut writer)
    }

    fn write_event(&self, row: CarEventRow) {
        let result = self.with_writer(|w| w.write_event(&row));
        self.store_err(result);
    }

    fn store_err(&self, result: OutputResult<()>) {
        if let Err(e) = result {
            log::warn!("output write failed: {e}");
            if let Ok(mut slot) = self.last_error.lock() {
                // Keep only the first error.
                slot.get_or_insert(e);
            }
        }
    }
}

impl<W: OutputWriter> ParkingObserver for OutputObserver<W> {
    fn on_parked(&self, car: CarId, slot: SlotRef, dwell_secs: f64) {
        let row = CarEventRow::at_slot(self.elapsed_secs(), car, EventKind::Parked, slot, dwell_secs);
        self.write_event(row);
    }

    fn on_lot_full(&self, car: CarId, lot: LotId) {
        self.write_event(CarEventRow::lot_full(self.elapsed_secs(), car, lot));
    }

    fn on_departed(&self, car: CarId, slot: SlotRef, dwell_secs: f64) {
        let row =
            CarEventRow::at_slot(self.elapsed_secs(), car, EventKind::Departed, slot, dwell_secs);
        self.write_event(row);
    }

    fn on_failure(&self, car: CarId, _error: &SimError) {
        self.write_event(CarEventRow::failed(self.elapsed_secs(), car));
    }
}
