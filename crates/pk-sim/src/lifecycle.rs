//! `CarLifecycle`: one car's admission → allocation → dwell → release.
//!
//! # Sequence
//!
//! ```text
//! acquire permit                    (may wait: gate at capacity)
//! claim lowest free slot            (lot lock held for lookup + write)
//!   └─ lot full → Rejected, done
//! open account, debit fee, assign   (slot and fee returned on failure)
//! sleep dwell                       (simulated time × time_scale)
//! vacate slot, clear assignment
//! drop permit                       (on every path, via RAII)
//! ```
//!
//! No step is retried.  A failed external write ends the car's task; the
//! counters are only touched after the matching store write succeeded, so
//! they never drift from the store.

use std::sync::Arc;

use pk_core::{CarId, LotId, ParkingConfig, SlotRef};
use pk_store::AccountStore;

use crate::{
    AdmissionGate, Car, CarState, Claim, ParkingObserver, SimError, SimResult, SlotAllocator,
    Stage,
};

/// Shared state every car task and the scheduler hold a handle to.
pub struct ParkingContext {
    pub config:    ParkingConfig,
    pub gate:      AdmissionGate,
    pub allocator: SlotAllocator,
    pub accounts:  Arc<dyn AccountStore>,
    pub observer:  Arc<dyn ParkingObserver>,
}

/// How a car's visit ended, when it ended normally.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CarOutcome {
    /// Parked, stayed, and left.
    Departed {
        car:        CarId,
        slot:       SlotRef,
        dwell_secs: f64,
    },
    /// The chosen lot had no free slot.
    Rejected { car: CarId, lot: LotId },
}

pub struct CarLifecycle {
    car: Car,
    ctx: Arc<ParkingContext>,
}

impl CarLifecycle {
    pub fn new(car: Car, ctx: Arc<ParkingContext>) -> Self {
        Self { car, ctx }
    }

    pub fn car(&self) -> &Car {
        &self.car
    }

    /// Drive the car to a terminal state.
    ///
    /// Errors are external-write failures; they are logged and reported to
    /// the observer here, so callers only need to count them.
    pub async fn run(mut self) -> SimResult<CarOutcome> {
        match self.drive().await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                log::error!("car {}: {e}", self.car.id);
                self.car.transition(CarState::Failed);
                self.ctx.observer.on_failure(self.car.id, &e);
                Err(e)
            }
        }
    }

    async fn drive(&mut self) -> SimResult<CarOutcome> {
        let ctx = Arc::clone(&self.ctx);
        let id = self.car.id;

        self.car.transition(CarState::AdmissionPending);
        let _permit = ctx.gate.acquire().await?;
        ctx.observer.on_admitted(id);

        let slot = match ctx.allocator.claim(self.car.lot, id)? {
            Claim::Full(lot) => {
                self.car.transition(CarState::Rejected);
                ctx.observer.on_lot_full(id, lot);
                return Ok(CarOutcome::Rejected { car: id, lot });
            }
            Claim::Claimed(slot) => slot,
        };
        self.car.assign(slot);

        if let Err(e) = self.settle_account(slot) {
            self.compensate(slot);
            return Err(e);
        }

        self.car.transition(CarState::Parked);
        ctx.observer.on_parked(id, slot, self.car.dwell_secs);

        tokio::time::sleep(ctx.config.scaled(self.car.dwell_secs)).await;

        self.depart(slot)?;
        ctx.observer.on_departed(id, slot, self.car.dwell_secs);
        Ok(CarOutcome::Departed { car: id, slot, dwell_secs: self.car.dwell_secs })
    }

    fn settle_account(&self, slot: SlotRef) -> SimResult<()> {
        let accounts = &self.ctx.accounts;
        let id = self.car.id;
        accounts
            .open_account(id, self.ctx.config.initial_balance)
            .map_err(SimError::at(Stage::Debit))?;
        accounts
            .debit_balance(id, self.ctx.config.parking_fee)
            .map_err(SimError::at(Stage::Debit))?;
        if let Err(e) = accounts.set_parked_assignment(id, Some(slot)) {
            self.refund();
            return Err(SimError::at(Stage::Assign)(e));
        }
        Ok(())
    }

    /// Return the fee taken by a debit whose claim is being undone.
    fn refund(&self) {
        let id = self.car.id;
        if let Err(e) = self.ctx.accounts.credit_balance(id, self.ctx.config.parking_fee) {
            log::error!("car {id}: could not refund parking fee: {e}");
        }
    }

    /// Undo a claim whose account step failed.
    fn compensate(&mut self, slot: SlotRef) {
        match self.ctx.allocator.release(slot) {
            Ok(_) => self.car.unassign(),
            Err(e) => log::error!("car {}: could not undo claim on {slot}: {e}", self.car.id),
        }
    }

    fn depart(&mut self, slot: SlotRef) -> SimResult<()> {
        let id = self.car.id;
        if !self.ctx.allocator.release(slot)? {
            log::warn!("car {id}: {slot} was already free at departure");
        }
        self.car.unassign();
        self.ctx
            .accounts
            .set_parked_assignment(id, None)
            .map_err(SimError::at(Stage::Unassign))?;
        self.car.transition(CarState::Departed);
        Ok(())
    }
}
