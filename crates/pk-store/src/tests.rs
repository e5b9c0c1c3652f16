//! Tests for pk-store backends.

#[cfg(test)]
mod memory_tests {
    use std::collections::BTreeSet;

    use pk_core::{CarId, LotId, SlotIndex, SlotRef};

    use crate::{AccountStore, MemoryStore, OccupancyStore, StoreError};

    fn slot(lot: u16, idx: u32) -> SlotRef {
        SlotRef::new(LotId(lot), SlotIndex(idx))
    }

    #[test]
    fn empty_store_has_no_occupants() {
        let store = MemoryStore::new();
        assert!(store.list_occupied_slots(LotId(1)).unwrap().is_empty());
        assert_eq!(store.occupant(slot(1, 1)).unwrap(), None);
    }

    #[test]
    fn set_occupant_upserts() {
        let store = MemoryStore::new();
        store.set_occupant(slot(1, 3), Some(CarId(9))).unwrap();
        assert_eq!(store.occupant(slot(1, 3)).unwrap(), Some(CarId(9)));
        assert_eq!(store.record_count().unwrap(), 1);

        store.set_occupant(slot(1, 3), Some(CarId(10))).unwrap();
        assert_eq!(store.occupant(slot(1, 3)).unwrap(), Some(CarId(10)));
        assert_eq!(store.record_count().unwrap(), 1);
    }

    #[test]
    fn cleared_record_is_kept_but_not_listed() {
        let store = MemoryStore::new();
        store.set_occupant(slot(2, 1), Some(CarId(1))).unwrap();
        store.set_occupant(slot(2, 1), None).unwrap();
        assert!(store.list_occupied_slots(LotId(2)).unwrap().is_empty());
        assert_eq!(store.record_count().unwrap(), 1);
    }

    #[test]
    fn listing_is_per_lot() {
        let store = MemoryStore::new();
        store.set_occupant(slot(1, 1), Some(CarId(1))).unwrap();
        store.set_occupant(slot(1, 4), Some(CarId(2))).unwrap();
        store.set_occupant(slot(2, 2), Some(CarId(3))).unwrap();
        assert_eq!(
            store.list_occupied_slots(LotId(1)).unwrap(),
            BTreeSet::from([SlotIndex(1), SlotIndex(4)])
        );
        assert_eq!(
            store.list_occupied_slots(LotId(2)).unwrap(),
            BTreeSet::from([SlotIndex(2)])
        );
    }

    #[test]
    fn account_debit_and_assignment() {
        let store = MemoryStore::new();
        store.open_account(CarId(5), 50).unwrap();
        assert_eq!(store.debit_balance(CarId(5), 20).unwrap(), 30);
        store.set_parked_assignment(CarId(5), Some(slot(3, 7))).unwrap();

        let acct = store.account(CarId(5)).unwrap().unwrap();
        assert_eq!(acct.balance, 30);
        assert_eq!(acct.parked, Some(slot(3, 7)));
        assert_eq!(store.parked_count().unwrap(), 1);

        store.set_parked_assignment(CarId(5), None).unwrap();
        assert_eq!(store.parked_count().unwrap(), 0);
    }

    #[test]
    fn credit_restores_debited_fee() {
        let store = MemoryStore::new();
        store.open_account(CarId(2), 50).unwrap();
        store.debit_balance(CarId(2), 50).unwrap();
        assert_eq!(store.credit_balance(CarId(2), 50).unwrap(), 50);
        assert!(matches!(
            store.credit_balance(CarId(3), 1),
            Err(StoreError::UnknownAccount(CarId(3)))
        ));
    }

    #[test]
    fn debit_insufficient_funds_leaves_balance() {
        let store = MemoryStore::new();
        store.open_account(CarId(1), 10).unwrap();
        let err = store.debit_balance(CarId(1), 50).unwrap_err();
        assert!(matches!(err, StoreError::InsufficientFunds { balance: 10, amount: 50, .. }));
        assert_eq!(store.account(CarId(1)).unwrap().unwrap().balance, 10);
    }

    #[test]
    fn unknown_account_errors() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.debit_balance(CarId(1), 1),
            Err(StoreError::UnknownAccount(CarId(1)))
        ));
        assert!(matches!(
            store.set_parked_assignment(CarId(1), None),
            Err(StoreError::UnknownAccount(CarId(1)))
        ));
        assert_eq!(store.account(CarId(1)).unwrap(), None);
    }
}

#[cfg(test)]
mod flaky_tests {
    use std::sync::Arc;

    use pk_core::{CarId, LotId, SlotIndex, SlotRef};

    use crate::{AccountStore, Fault, FlakyStore, MemoryStore, OccupancyStore, StoreError};

    #[test]
    fn faults_only_hit_their_operation() {
        let store = FlakyStore::new(Arc::new(MemoryStore::new()));
        let s = SlotRef::new(LotId(1), SlotIndex(1));

        store.set_fault(Fault::Vacate, true);
        store.set_occupant(s, Some(CarId(1))).unwrap();
        assert!(matches!(store.set_occupant(s, None), Err(StoreError::Unavailable(_))));
        assert_eq!(store.occupant(s).unwrap(), Some(CarId(1)));
        assert_eq!(store.injected(), 1);

        store.set_fault(Fault::Vacate, false);
        store.set_occupant(s, None).unwrap();
        assert_eq!(store.inner().occupant(s).unwrap(), None);
    }

    #[test]
    fn account_faults() {
        let store = FlakyStore::new(MemoryStore::new());
        store.open_account(CarId(1), 50).unwrap();
        store.set_fault(Fault::Debit, true);
        assert!(store.debit_balance(CarId(1), 10).is_err());
        store.set_fault(Fault::Assign, true);
        assert!(store.set_parked_assignment(CarId(1), None).is_err());
        assert_eq!(store.injected(), 2);
        assert_eq!(store.account(CarId(1)).unwrap().unwrap().balance, 50);
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use std::collections::BTreeSet;

    use pk_core::{CarId, LotId, SlotIndex, SlotRef};

    use crate::{AccountStore, OccupancyStore, SqliteStore, StoreError};

    fn slot(lot: u16, idx: u32) -> SlotRef {
        SlotRef::new(LotId(lot), SlotIndex(idx))
    }

    #[test]
    fn occupancy_upsert_and_list() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set_occupant(slot(1, 2), Some(CarId(7))).unwrap();
        store.set_occupant(slot(1, 1), Some(CarId(8))).unwrap();
        store.set_occupant(slot(2, 1), Some(CarId(9))).unwrap();
        store.set_occupant(slot(1, 2), None).unwrap();

        assert_eq!(
            store.list_occupied_slots(LotId(1)).unwrap(),
            BTreeSet::from([SlotIndex(1)])
        );
        assert_eq!(store.occupant(slot(1, 2)).unwrap(), None);
        assert_eq!(store.occupant(slot(2, 1)).unwrap(), Some(CarId(9)));
        assert_eq!(store.occupant(slot(5, 5)).unwrap(), None);
    }

    #[test]
    fn accounts_round_trip() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.open_account(CarId(3), 50).unwrap();
        assert_eq!(store.debit_balance(CarId(3), 50).unwrap(), 0);
        assert!(matches!(
            store.debit_balance(CarId(3), 1),
            Err(StoreError::InsufficientFunds { balance: 0, .. })
        ));
        assert_eq!(store.credit_balance(CarId(3), 20).unwrap(), 20);
        assert!(matches!(
            store.credit_balance(CarId(98), 1),
            Err(StoreError::UnknownAccount(CarId(98)))
        ));
        store.set_parked_assignment(CarId(3), Some(slot(2, 4))).unwrap();
        let acct = store.account(CarId(3)).unwrap().unwrap();
        assert_eq!(acct.parked, Some(slot(2, 4)));

        store.set_parked_assignment(CarId(3), None).unwrap();
        assert_eq!(store.account(CarId(3)).unwrap().unwrap().parked, None);
        assert!(matches!(
            store.set_parked_assignment(CarId(99), None),
            Err(StoreError::UnknownAccount(CarId(99)))
        ));
    }

    #[test]
    fn file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parking.db");
        {
            let store = SqliteStore::open(&path).unwrap();
            store.set_occupant(slot(1, 5), Some(CarId(1))).unwrap();
        }
        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(
            reopened.list_occupied_slots(LotId(1)).unwrap(),
            BTreeSet::from([SlotIndex(5)])
        );
    }
}
