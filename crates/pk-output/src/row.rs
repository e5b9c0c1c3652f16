//! Plain data row types written by output backends.

use std::fmt;

use pk_core::{CarId, LotId, SlotRef};
use pk_sim::Snapshot;

/// Occupancy of one lot at one reporter sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LotSnapshotRow {
    /// Real seconds since the output sink was created.
    pub elapsed_secs: f64,
    pub lot:          u16,
    pub capacity:     u32,
    pub occupied:     u32,
    pub free:         u32,
}

impl LotSnapshotRow {
    /// One row per lot, in lot order.
    pub fn from_snapshot(elapsed_secs: f64, snapshot: &Snapshot) -> Vec<Self> {
        snapshot
            .lots
            .values()
            .map(|s| Self {
                elapsed_secs,
                lot: s.lot.get(),
                capacity: s.capacity,
                occupied: s.occupied,
                free: s.free,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Parked,
    LotFull,
    Departed,
    Failed,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Parked => "parked",
            EventKind::LotFull => "lot_full",
            EventKind::Departed => "departed",
            EventKind::Failed => "failed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One car event.  Columns that do not apply to the event kind are empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarEventRow {
    pub elapsed_secs: f64,
    pub car:          u64,
    pub kind:         EventKind,
    pub lot:          Option<u16>,
    pub slot:         Option<u32>,
    pub dwell_secs:   Option<f64>,
}

impl CarEventRow {
    pub fn at_slot(
        elapsed_secs: f64,
        car: CarId,
        kind: EventKind,
        slot: SlotRef,
        dwell_secs: f64,
    ) -> Self {
        Self {
            elapsed_secs,
            car: car.get(),
            kind,
            lot: Some(slot.lot.get()),
            slot: Some(slot.slot.get()),
            dwell_secs: Some(dwell_secs),
        }
    }

    pub fn lot_full(elapsed_secs: f64, car: CarId, lot: LotId) -> Self {
        Self {
            elapsed_secs,
            car: car.get(),
            kind: EventKind::LotFull,
            lot: Some(lot.get()),
            slot: None,
            dwell_secs: None,
        }
    }

    pub fn failed(elapsed_secs: f64, car: CarId) -> Self {
        Self {
            elapsed_secs,
            car: car.get(),
            kind: EventKind::Failed,
            lot: None,
            slot: None,
            dwell_secs: None,
        }
    }
}
