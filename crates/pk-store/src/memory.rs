//! In-memory backend implementing both collaborator traits.
//!
//! Occupancy keeps one record per slot that has ever been written, mirroring
//! a document store where a cleared slot keeps its record with an empty
//! occupant.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Mutex;

use pk_core::{CarId, LotId, SlotIndex, SlotRef};

use crate::{Account, AccountStore, OccupancyStore, StoreError, StoreResult};

/// Occupancy records and accounts held in process memory.
#[derive(Default)]
pub struct MemoryStore {
    records:  Mutex<BTreeMap<SlotRef, Option<CarId>>>,
    accounts: Mutex<HashMap<CarId, Account>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupancy records (occupied or cleared) held.
    pub fn record_count(&self) -> StoreResult<usize> {
        Ok(self.records.lock().map_err(|_| StoreError::Poisoned("occupancy"))?.len())
    }

    /// Number of accounts currently holding a parked assignment.
    pub fn parked_count(&self) -> StoreResult<usize> {
        let accounts = self.accounts.lock().map_err(|_| StoreError::Poisoned("accounts"))?;
        Ok(accounts.values().filter(|a| a.parked.is_some()).count())
    }
}

// ── Occupancy ─────────────────────────────────────────────────────────────────

impl OccupancyStore for MemoryStore {
    fn list_occupied_slots(&self, lot: LotId) -> StoreResult<BTreeSet<SlotIndex>> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned("occupancy"))?;
        Ok(records
            .iter()
            .filter(|(slot, car)| slot.lot == lot && car.is_some())
            .map(|(slot, _)| slot.slot)
            .collect())
    }

    fn set_occupant(&self, slot: SlotRef, car: Option<CarId>) -> StoreResult<()> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned("occupancy"))?;
        records.insert(slot, car);
        Ok(())
    }

    fn occupant(&self, slot: SlotRef) -> StoreResult<Option<CarId>> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned("occupancy"))?;
        Ok(records.get(&slot).copied().flatten())
    }
}

// ── Accounts ──────────────────────────────────────────────────────────────────

impl AccountStore for MemoryStore {
    fn open_account(&self, car: CarId, balance: u64) -> StoreResult<()> {
        let mut accounts = self.accounts.lock().map_err(|_| StoreError::Poisoned("accounts"))?;
        accounts.insert(car, Account { car, balance, parked: None });
        Ok(())
    }

    fn debit_balance(&self, car: CarId, amount: u64) -> StoreResult<u64> {
        let mut accounts = self.accounts.lock().map_err(|_| StoreError::Poisoned("accounts"))?;
        let account = accounts.get_mut(&car).ok_or(StoreError::UnknownAccount(car))?;
        if account.balance < amount {
            return Err(StoreError::InsufficientFunds { car, balance: account.balance, amount });
        }
        account.balance -= amount;
        Ok(account.balance)
    }

    fn credit_balance(&self, car: CarId, amount: u64) -> StoreResult<u64> {
        let mut accounts = self.accounts.lock().map_err(|_| StoreError::Poisoned("accounts"))?;
        let account = accounts.get_mut(&car).ok_or(StoreError::UnknownAccount(car))?;
        account.balance = account.balance.saturating_add(amount);
        Ok(account.balance)
    }

    fn set_parked_assignment(&self, car: CarId, slot: Option<SlotRef>) -> StoreResult<()> {
        let mut accounts = self.accounts.lock().map_err(|_| StoreError::Poisoned("accounts"))?;
        let account = accounts.get_mut(&car).ok_or(StoreError::UnknownAccount(car))?;
        account.parked = slot;
        Ok(())
    }

    fn account(&self, car: CarId) -> StoreResult<Option<Account>> {
        let accounts = self.accounts.lock().map_err(|_| StoreError::Poisoned("accounts"))?;
        Ok(accounts.get(&car).cloned())
    }
}
