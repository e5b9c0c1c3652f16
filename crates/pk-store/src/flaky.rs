//! `FlakyStore`: a wrapper that fails selected writes on demand.
//!
//! Used to exercise the external-write-failure paths of the car lifecycle.
//! Each switch can be flipped at any time from any thread.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use pk_core::{CarId, LotId, SlotIndex, SlotRef};

use crate::{Account, AccountStore, OccupancyStore, StoreError, StoreResult};

/// Which write a fault applies to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Fault {
    /// `set_occupant(slot, Some(car))`.
    Occupy,
    /// `set_occupant(slot, None)`.
    Vacate,
    /// `debit_balance`.
    Debit,
    /// `set_parked_assignment`.
    Assign,
}

/// Wraps a backend implementing both collaborator traits.
pub struct FlakyStore<S> {
    inner:    S,
    occupy:   AtomicBool,
    vacate:   AtomicBool,
    debit:    AtomicBool,
    assign:   AtomicBool,
    injected: AtomicUsize,
}

impl<S> FlakyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            occupy:   AtomicBool::new(false),
            vacate:   AtomicBool::new(false),
            debit:    AtomicBool::new(false),
            assign:   AtomicBool::new(false),
            injected: AtomicUsize::new(0),
        }
    }

    /// Turn a fault on or off.
    pub fn set_fault(&self, fault: Fault, on: bool) {
        self.flag(fault).store(on, Ordering::SeqCst);
    }

    /// How many writes have been failed so far.
    pub fn injected(&self) -> usize {
        self.injected.load(Ordering::SeqCst)
    }

    /// The wrapped backend.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn flag(&self, fault: Fault) -> &AtomicBool {
        match fault {
            Fault::Occupy => &self.occupy,
            Fault::Vacate => &self.vacate,
            Fault::Debit  => &self.debit,
            Fault::Assign => &self.assign,
        }
    }

    fn check(&self, fault: Fault) -> StoreResult<()> {
        if self.flag(fault).load(Ordering::SeqCst) {
            self.injected.fetch_add(1, Ordering::SeqCst);
            log::debug!("injecting {fault:?} failure");
            return Err(StoreError::Unavailable(format!("injected {fault:?} failure")));
        }
        Ok(())
    }
}

impl<S: OccupancyStore> OccupancyStore for FlakyStore<S> {
    fn list_occupied_slots(&self, lot: LotId) -> StoreResult<BTreeSet<SlotIndex>> {
        self.inner.list_occupied_slots(lot)
    }

    fn set_occupant(&self, slot: SlotRef, car: Option<CarId>) -> StoreResult<()> {
        self.check(if car.is_some() { Fault::Occupy } else { Fault::Vacate })?;
        self.inner.set_occupant(slot, car)
    }

    fn occupant(&self, slot: SlotRef) -> StoreResult<Option<CarId>> {
        self.inner.occupant(slot)
    }
}

impl<S: AccountStore> AccountStore for FlakyStore<S> {
    fn open_account(&self, car: CarId, balance: u64) -> StoreResult<()> {
        self.inner.open_account(car, balance)
    }

    fn debit_balance(&self, car: CarId, amount: u64) -> StoreResult<u64> {
        self.check(Fault::Debit)?;
        self.inner.debit_balance(car, amount)
    }

    fn credit_balance(&self, car: CarId, amount: u64) -> StoreResult<u64> {
        self.inner.credit_balance(car, amount)
    }

    fn set_parked_assignment(&self, car: CarId, slot: Option<SlotRef>) -> StoreResult<()> {
        self.check(Fault::Assign)?;
        self.inner.set_parked_assignment(car, slot)
    }

    fn account(&self, car: CarId) -> StoreResult<Option<Account>> {
        self.inner.account(car)
    }
}
