//! SQLite backend (feature `sqlite`).
//!
//! One database file with two tables: `parking` (one row per slot record)
//! and `accounts`.  The connection sits behind a mutex; every call is a
//! single short statement, so contention between car tasks is brief.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, params};

use pk_core::{CarId, LotId, SlotIndex, SlotRef};

use crate::{Account, AccountStore, OccupancyStore, StoreError, StoreResult};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS parking (
        lot    INTEGER NOT NULL,
        slot   INTEGER NOT NULL,
        car_id INTEGER,
        PRIMARY KEY (lot, slot)
    );
    CREATE TABLE IF NOT EXISTS accounts (
        car_id      INTEGER PRIMARY KEY,
        balance     INTEGER NOT NULL,
        parked_lot  INTEGER,
        parked_slot INTEGER
    );";

/// Occupancy and accounts persisted in SQLite.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and initialise the schema.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")?;
        log::debug!("opened occupancy database {}", path.display());
        Self::init(conn)
    }

    /// A private in-memory database, mainly for tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned("sqlite connection"))
    }
}

impl OccupancyStore for SqliteStore {
    fn list_occupied_slots(&self, lot: LotId) -> StoreResult<BTreeSet<SlotIndex>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT slot FROM parking WHERE lot = ?1 AND car_id IS NOT NULL",
        )?;
        let slots = stmt
            .query_map(params![lot.0], |row| row.get::<_, u32>(0))?
            .map(|r| r.map(SlotIndex))
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(slots)
    }

    fn set_occupant(&self, slot: SlotRef, car: Option<CarId>) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO parking (lot, slot, car_id) VALUES (?1, ?2, ?3) \
             ON CONFLICT (lot, slot) DO UPDATE SET car_id = excluded.car_id",
            params![slot.lot.0, slot.slot.0, car.map(|c| c.0)],
        )?;
        Ok(())
    }

    fn occupant(&self, slot: SlotRef) -> StoreResult<Option<CarId>> {
        let conn = self.conn()?;
        let car: Option<Option<u64>> = conn
            .query_row(
                "SELECT car_id FROM parking WHERE lot = ?1 AND slot = ?2",
                params![slot.lot.0, slot.slot.0],
                |row| row.get(0),
            )
            .optional()?;
        Ok(car.flatten().map(CarId))
    }
}

impl AccountStore for SqliteStore {
    fn open_account(&self, car: CarId, balance: u64) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO accounts (car_id, balance, parked_lot, parked_slot) \
             VALUES (?1, ?2, NULL, NULL) \
             ON CONFLICT (car_id) DO UPDATE SET balance = excluded.balance, \
             parked_lot = NULL, parked_slot = NULL",
            params![car.0, balance],
        )?;
        Ok(())
    }

    fn debit_balance(&self, car: CarId, amount: u64) -> StoreResult<u64> {
        let conn = self.conn()?;
        let balance: Option<u64> = conn
            .query_row(
                "SELECT balance FROM accounts WHERE car_id = ?1",
                params![car.0],
                |row| row.get(0),
            )
            .optional()?;
        let balance = balance.ok_or(StoreError::UnknownAccount(car))?;
        if balance < amount {
            return Err(StoreError::InsufficientFunds { car, balance, amount });
        }
        let remaining = balance - amount;
        conn.execute(
            "UPDATE accounts SET balance = ?2 WHERE car_id = ?1",
            params![car.0, remaining],
        )?;
        Ok(remaining)
    }

    fn credit_balance(&self, car: CarId, amount: u64) -> StoreResult<u64> {
        let conn = self.conn()?;
        let balance: Option<u64> = conn
            .query_row(
                "UPDATE accounts SET balance = balance + ?2 WHERE car_id = ?1 RETURNING balance",
                params![car.0, amount],
                |row| row.get(0),
            )
            .optional()?;
        balance.ok_or(StoreError::UnknownAccount(car))
    }

    fn set_parked_assignment(&self, car: CarId, slot: Option<SlotRef>) -> StoreResult<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE accounts SET parked_lot = ?2, parked_slot = ?3 WHERE car_id = ?1",
            params![car.0, slot.map(|s| s.lot.0), slot.map(|s| s.slot.0)],
        )?;
        if updated == 0 {
            return Err(StoreError::UnknownAccount(car));
        }
        Ok(())
    }

    fn account(&self, car: CarId) -> StoreResult<Option<Account>> {
        let conn = self.conn()?;
        let row: Option<(u64, Option<u16>, Option<u32>)> = conn
            .query_row(
                "SELECT balance, parked_lot, parked_slot FROM accounts WHERE car_id = ?1",
                params![car.0],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;
        Ok(row.map(|(balance, lot, slot)| Account {
            car,
            balance,
            parked: match (lot, slot) {
                (Some(lot), Some(slot)) => Some(SlotRef::new(LotId(lot), SlotIndex(slot))),
                _ => None,
            },
        }))
    }
}
