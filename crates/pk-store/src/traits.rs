//! Collaborator interfaces the simulation core calls.
//!
//! Both traits take `&self` and are `Send + Sync`: one store instance is
//! shared by every car task.  Calls are treated as instantaneous by the
//! scheduler, so implementations must not block for long.

use std::collections::BTreeSet;

use pk_core::{CarId, LotId, SlotIndex, SlotRef};

use crate::StoreResult;

/// Authoritative record of which slots are occupied and by whom.
pub trait OccupancyStore: Send + Sync {
    /// All slot indices in `lot` whose occupant is set.
    fn list_occupied_slots(&self, lot: LotId) -> StoreResult<BTreeSet<SlotIndex>>;

    /// Set or clear the occupant of `slot`.  Upsert: the record is created
    /// if it does not exist yet.
    fn set_occupant(&self, slot: SlotRef, car: Option<CarId>) -> StoreResult<()>;

    /// The current occupant of `slot`, if any.
    fn occupant(&self, slot: SlotRef) -> StoreResult<Option<CarId>>;
}

/// A car owner's account as seen by the simulation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub car:     CarId,
    pub balance: u64,
    pub parked:  Option<SlotRef>,
}

/// User-account collaborator: balances and parked assignments.
pub trait AccountStore: Send + Sync {
    /// Create (or reset) the account for `car` with `balance` and no
    /// assignment.
    fn open_account(&self, car: CarId, balance: u64) -> StoreResult<()>;

    /// Subtract `amount` from the balance and return the new balance.
    ///
    /// # Errors
    ///
    /// `UnknownAccount` if the car has no account, `InsufficientFunds` if the
    /// balance is lower than `amount` (the balance is left unchanged).
    fn debit_balance(&self, car: CarId, amount: u64) -> StoreResult<u64>;

    /// Add `amount` back to the balance and return the new balance.
    fn credit_balance(&self, car: CarId, amount: u64) -> StoreResult<u64>;

    /// Record (or clear, with `None`) where the car is parked.
    fn set_parked_assignment(&self, car: CarId, slot: Option<SlotRef>) -> StoreResult<()>;

    /// Look up an account.
    fn account(&self, car: CarId) -> StoreResult<Option<Account>>;
}

// ── Shared-handle forwarding ──────────────────────────────────────────────────

impl<T: OccupancyStore + ?Sized> OccupancyStore for std::sync::Arc<T> {
    fn list_occupied_slots(&self, lot: LotId) -> StoreResult<BTreeSet<SlotIndex>> {
        (**self).list_occupied_slots(lot)
    }

    fn set_occupant(&self, slot: SlotRef, car: Option<CarId>) -> StoreResult<()> {
        (**self).set_occupant(slot, car)
    }

    fn occupant(&self, slot: SlotRef) -> StoreResult<Option<CarId>> {
        (**self).occupant(slot)
    }
}

impl<T: AccountStore + ?Sized> AccountStore for std::sync::Arc<T> {
    fn open_account(&self, car: CarId, balance: u64) -> StoreResult<()> {
        (**self).open_account(car, balance)
    }

    fn debit_balance(&self, car: CarId, amount: u64) -> StoreResult<u64> {
        (**self).debit_balance(car, amount)
    }

    fn credit_balance(&self, car: CarId, amount: u64) -> StoreResult<u64> {
        (**self).credit_balance(car, amount)
    }

    fn set_parked_assignment(&self, car: CarId, slot: Option<SlotRef>) -> StoreResult<()> {
        (**self).set_parked_assignment(car, slot)
    }

    fn account(&self, car: CarId) -> StoreResult<Option<Account>> {
        (**self).account(car)
    }
}
