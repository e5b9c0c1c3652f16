//! `SimulationCounters`: per-lot occupied counts.
//!
//! The counters are a cache of the occupancy store, kept for cheap
//! statistics.  Each lot's count sits behind its own mutex, and that mutex
//! doubles as the lot's allocation lock: [`SlotAllocator`][crate::SlotAllocator]
//! holds the guard across the free-slot lookup, the store write, and the
//! counter update, so no two cars can claim slots in the same lot at once.
//!
//! Invariant: after any completed transition, a lot's count equals the number
//! of occupied records the store holds for it.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use pk_core::{LotId, LotSpec};

use crate::{SimError, SimResult};

struct LotCounter {
    capacity: u32,
    occupied: Mutex<u32>,
}

pub struct SimulationCounters {
    lots: BTreeMap<LotId, LotCounter>,
}

/// Exclusive access to one lot's count.  Holding it serialises every
/// occupancy change in that lot.
pub struct LotGuard<'a> {
    lot:      LotId,
    capacity: u32,
    occupied: MutexGuard<'a, u32>,
}

impl SimulationCounters {
    /// All lots start at zero.
    pub fn new(lots: &[LotSpec]) -> Self {
        let lots = lots
            .iter()
            .map(|spec| {
                (spec.id, LotCounter { capacity: spec.capacity, occupied: Mutex::new(0) })
            })
            .collect();
        Self { lots }
    }

    /// Lock `lot` for an occupancy change.
    pub fn lock(&self, lot: LotId) -> SimResult<LotGuard<'_>> {
        let counter = self.lots.get(&lot).ok_or(SimError::UnknownLot(lot))?;
        let occupied = counter.occupied.lock().map_err(|_| SimError::Poisoned(lot))?;
        Ok(LotGuard { lot, capacity: counter.capacity, occupied })
    }

    /// Current cached count for `lot`.
    pub fn occupied(&self, lot: LotId) -> SimResult<u32> {
        Ok(self.lock(lot)?.occupied())
    }

    pub fn capacity(&self, lot: LotId) -> Option<u32> {
        self.lots.get(&lot).map(|c| c.capacity)
    }

    /// `(lot, capacity)` pairs in ascending lot order.
    pub fn lots(&self) -> impl Iterator<Item = (LotId, u32)> + '_ {
        self.lots.iter().map(|(&lot, c)| (lot, c.capacity))
    }
}

impl LotGuard<'_> {
    pub fn lot(&self) -> LotId {
        self.lot
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn occupied(&self) -> u32 {
        *self.occupied
    }

    pub fn free(&self) -> u32 {
        self.capacity.saturating_sub(*self.occupied)
    }

    pub(crate) fn increment(&mut self) {
        debug_assert!(*self.occupied < self.capacity, "lot {} over capacity", self.lot);
        *self.occupied += 1;
    }

    pub(crate) fn decrement(&mut self) {
        debug_assert!(*self.occupied > 0, "lot {} count underflow", self.lot);
        *self.occupied = self.occupied.saturating_sub(1);
    }

    pub(crate) fn set(&mut self, occupied: u32) {
        *self.occupied = occupied;
    }
}
