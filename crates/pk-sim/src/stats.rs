//! `StatisticsAggregator`: occupied / free counts per lot.
//!
//! Read-only.  Snapshots are eventually consistent with committed
//! allocations and releases; nothing stronger is promised.

use std::collections::BTreeMap;
use std::sync::Arc;

use pk_core::LotId;

use crate::{ParkingContext, SimResult};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LotStats {
    pub lot:      LotId,
    pub capacity: u32,
    pub occupied: u32,
    pub free:     u32,
}

impl LotStats {
    fn new(lot: LotId, capacity: u32, occupied: u32) -> Self {
        Self { lot, capacity, occupied, free: capacity.saturating_sub(occupied) }
    }
}

/// `lot → (occupied, free)` at one moment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub lots: BTreeMap<LotId, LotStats>,
}

impl Snapshot {
    pub fn get(&self, lot: LotId) -> Option<&LotStats> {
        self.lots.get(&lot)
    }

    pub fn total_occupied(&self) -> u32 {
        self.lots.values().map(|s| s.occupied).sum()
    }

    pub fn total_free(&self) -> u32 {
        self.lots.values().map(|s| s.free).sum()
    }
}

/// A lot whose cached counter disagrees with the store.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Drift {
    pub lot:     LotId,
    pub counter: u32,
    pub store:   u32,
}

/// Cheap, cloneable handle; hand one to any reporter that wants to pull.
#[derive(Clone)]
pub struct StatisticsAggregator {
    ctx: Arc<ParkingContext>,
}

impl StatisticsAggregator {
    pub fn new(ctx: Arc<ParkingContext>) -> Self {
        Self { ctx }
    }

    /// Counts read from the occupancy store, the source of truth.
    pub fn snapshot(&self) -> SimResult<Snapshot> {
        let allocator = &self.ctx.allocator;
        let mut lots = BTreeMap::new();
        for (lot, capacity) in allocator.counters().lots() {
            let occupied = allocator.store().list_occupied_slots(lot)?.len() as u32;
            lots.insert(lot, LotStats::new(lot, capacity, occupied));
        }
        Ok(Snapshot { lots })
    }

    /// Counts read from the in-memory counters.  Never touches the store.
    pub fn cached_snapshot(&self) -> SimResult<Snapshot> {
        let counters = self.ctx.allocator.counters();
        let mut lots = BTreeMap::new();
        for (lot, capacity) in counters.lots() {
            lots.insert(lot, LotStats::new(lot, capacity, counters.occupied(lot)?));
        }
        Ok(Snapshot { lots })
    }

    /// Lots whose counter differs from the store.  Each lot is compared
    /// under its allocation lock, so an in-progress claim cannot show up as
    /// drift.  Expected to be empty.
    pub fn drift(&self) -> SimResult<Vec<Drift>> {
        let allocator = &self.ctx.allocator;
        let mut drifted = Vec::new();
        for (lot, _) in allocator.counters().lots() {
            let guard = allocator.counters().lock(lot)?;
            let store = allocator.store().list_occupied_slots(lot)?.len() as u32;
            if guard.occupied() != store {
                drifted.push(Drift { lot, counter: guard.occupied(), store });
            }
        }
        Ok(drifted)
    }
}

/// Log one line per lot, the way the periodic statistics report reads.
pub fn log_snapshot(snapshot: &Snapshot) {
    log::info!("parking statistics:");
    for s in snapshot.lots.values() {
        log::info!("  lot {}: occupied {}, free {}", s.lot, s.occupied, s.free);
    }
}
