//! `SlotAllocator`: lowest-free-slot allocation within a lot.
//!
//! # Selection policy
//!
//! - The target lot is chosen uniformly at random, regardless of fill level.
//! - Within that lot, the car gets the smallest index in `[1, capacity]` the
//!   store does not list as occupied.
//!
//! # Atomicity
//!
//! Looking up the free slot and writing the occupancy record happen under the
//! lot's counter lock ([`SlotAllocator::claim`]).  Two cars targeting the
//! same lot can never observe the same free index, whatever runtime flavour
//! the tasks run on.  `allocate` is private so it cannot be called for an
//! index that was not just found free under the same lock.

use std::collections::BTreeSet;
use std::sync::Arc;

use pk_core::{CarId, LotId, LotSpec, SimRng, SlotIndex, SlotRef};
use pk_store::OccupancyStore;

use crate::counters::LotGuard;
use crate::{SimError, SimResult, SimulationCounters, Stage};

/// Result of a claim attempt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Claim {
    /// The slot now belongs to the car.
    Claimed(SlotRef),
    /// Every slot in the lot is occupied.
    Full(LotId),
}

/// Smallest index in `[1, capacity]` not in `occupied`.
pub fn lowest_free_slot(occupied: &BTreeSet<SlotIndex>, capacity: u32) -> Option<SlotIndex> {
    (1..=capacity).map(SlotIndex).find(|idx| !occupied.contains(idx))
}

pub struct SlotAllocator {
    lot_ids:  Vec<LotId>,
    counters: SimulationCounters,
    store:    Arc<dyn OccupancyStore>,
}

impl SlotAllocator {
    pub fn new(lots: &[LotSpec], store: Arc<dyn OccupancyStore>) -> Self {
        let mut lot_ids: Vec<LotId> = lots.iter().map(|l| l.id).collect();
        lot_ids.sort_unstable();
        Self { lot_ids, counters: SimulationCounters::new(lots), store }
    }

    /// Initialise every lot's counter from the store.
    ///
    /// # Errors
    ///
    /// `Config` if the store lists an occupied index outside a lot's
    /// capacity; the counters could never agree with such a store.
    pub fn load_from_store(&self) -> SimResult<()> {
        for &lot in &self.lot_ids {
            let mut guard = self.counters.lock(lot)?;
            let occupied = self.store.list_occupied_slots(lot)?;
            if let Some(bad) = occupied.iter().find(|s| s.0 == 0 || s.0 > guard.capacity()) {
                return Err(SimError::Config(format!(
                    "store holds slot {bad} in lot {lot}, outside capacity {}",
                    guard.capacity()
                )));
            }
            guard.set(occupied.len() as u32);
            log::debug!("lot {lot}: {} slots already occupied", occupied.len());
        }
        Ok(())
    }

    /// Configured lots, ascending.
    pub fn lot_ids(&self) -> &[LotId] {
        &self.lot_ids
    }

    /// Pick a lot uniformly at random.  `None` only if no lots exist.
    pub fn choose_lot(&self, rng: &mut SimRng) -> Option<LotId> {
        rng.choose(&self.lot_ids).copied()
    }

    /// The lowest free slot in `lot` right now.
    ///
    /// Advisory only: without the lot lock the answer may be stale by the
    /// time the caller acts on it.  Allocation goes through [`claim`][Self::claim].
    pub fn find_free_slot(&self, lot: LotId) -> SimResult<Option<SlotIndex>> {
        let capacity = self.counters.capacity(lot).ok_or(SimError::UnknownLot(lot))?;
        let occupied = self.store.list_occupied_slots(lot).map_err(SimError::at(Stage::Lookup))?;
        Ok(lowest_free_slot(&occupied, capacity))
    }

    /// Find the lowest free slot in `lot` and occupy it for `car`, as one
    /// step.  On a failed store write nothing is counted.
    pub fn claim(&self, lot: LotId, car: CarId) -> SimResult<Claim> {
        let mut guard = self.counters.lock(lot)?;
        let occupied = self.store.list_occupied_slots(lot).map_err(SimError::at(Stage::Lookup))?;
        match lowest_free_slot(&occupied, guard.capacity()) {
            None => Ok(Claim::Full(lot)),
            Some(idx) => {
                let slot = SlotRef::new(lot, idx);
                self.allocate(&mut guard, slot, car)?;
                Ok(Claim::Claimed(slot))
            }
        }
    }

    fn allocate(&self, guard: &mut LotGuard<'_>, slot: SlotRef, car: CarId) -> SimResult<()> {
        self.store.set_occupant(slot, Some(car)).map_err(SimError::at(Stage::Occupy))?;
        guard.increment();
        Ok(())
    }

    /// Clear `slot`.  Returns `false` (and changes nothing) if it was
    /// already free.
    pub fn release(&self, slot: SlotRef) -> SimResult<bool> {
        let mut guard = self.counters.lock(slot.lot)?;
        let occupant = self.store.occupant(slot).map_err(SimError::at(Stage::Vacate))?;
        if occupant.is_none() {
            return Ok(false);
        }
        self.store.set_occupant(slot, None).map_err(SimError::at(Stage::Vacate))?;
        guard.decrement();
        Ok(true)
    }

    pub fn counters(&self) -> &SimulationCounters {
        &self.counters
    }

    pub fn store(&self) -> &Arc<dyn OccupancyStore> {
        &self.store
    }
}
