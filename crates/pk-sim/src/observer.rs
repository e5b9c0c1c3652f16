//! Observer trait for car events and statistics snapshots.

use std::sync::Arc;

use pk_core::{CarId, LotId, SlotRef};

use crate::{SimError, Snapshot};

/// Callbacks invoked from car tasks and the arrival scheduler.
///
/// Car tasks run concurrently, so every method takes `&self` and
/// implementations must be `Send + Sync`.  All methods have default no-op
/// implementations so implementors only override what they care about.
pub trait ParkingObserver: Send + Sync {
    /// A batch of `count` cars arrived (possibly zero).
    fn on_arrivals(&self, _count: u32) {}

    /// `car` got an admission permit.
    fn on_admitted(&self, _car: CarId) {}

    /// `car` was allocated `slot` and will stay `dwell_secs`.
    fn on_parked(&self, _car: CarId, _slot: SlotRef, _dwell_secs: f64) {}

    /// `car` found `lot` full and left.
    fn on_lot_full(&self, _car: CarId, _lot: LotId) {}

    /// `car` left `slot` after `dwell_secs`.
    fn on_departed(&self, _car: CarId, _slot: SlotRef, _dwell_secs: f64) {}

    /// An external write failed; the car's task ended early.
    fn on_failure(&self, _car: CarId, _error: &SimError) {}

    /// The scheduler took a statistics snapshot.
    fn on_snapshot(&self, _snapshot: &Snapshot) {}
}

/// An observer that does nothing.
pub struct NoopObserver;

impl ParkingObserver for NoopObserver {}

/// Reports every car event as a log line.
pub struct LogObserver;

impl ParkingObserver for LogObserver {
    fn on_arrivals(&self, count: u32) {
        log::info!("arrivals: {count} car(s) looking for a slot");
    }

    fn on_parked(&self, car: CarId, slot: SlotRef, _dwell_secs: f64) {
        log::info!("car {car} parked: {slot}");
    }

    fn on_lot_full(&self, _car: CarId, lot: LotId) {
        log::info!("no free slots in lot {lot}");
    }

    fn on_departed(&self, car: CarId, slot: SlotRef, dwell_secs: f64) {
        log::info!("car {car} left {slot}, parked for {dwell_secs:.1} s");
    }
}

/// Forwards every callback to each inner observer in order.
#[derive(Default)]
pub struct FanOut {
    observers: Vec<Arc<dyn ParkingObserver>>,
}

impl FanOut {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, observer: Arc<dyn ParkingObserver>) -> Self {
        self.observers.push(observer);
        self
    }
}

impl ParkingObserver for FanOut {
    fn on_arrivals(&self, count: u32) {
        self.observers.iter().for_each(|o| o.on_arrivals(count));
    }

    fn on_admitted(&self, car: CarId) {
        self.observers.iter().for_each(|o| o.on_admitted(car));
    }

    fn on_parked(&self, car: CarId, slot: SlotRef, dwell_secs: f64) {
        self.observers.iter().for_each(|o| o.on_parked(car, slot, dwell_secs));
    }

    fn on_lot_full(&self, car: CarId, lot: LotId) {
        self.observers.iter().for_each(|o| o.on_lot_full(car, lot));
    }

    fn on_departed(&self, car: CarId, slot: SlotRef, dwell_secs: f64) {
        self.observers.iter().for_each(|o| o.on_departed(car, slot, dwell_secs));
    }

    fn on_failure(&self, car: CarId, error: &SimError) {
        self.observers.iter().for_each(|o| o.on_failure(car, error));
    }

    fn on_snapshot(&self, snapshot: &Snapshot) {
        self.observers.iter().for_each(|o| o.on_snapshot(snapshot));
    }
}
