//! `AdmissionGate`: bounds how many cars are in flight at once.
//!
//! A car holds one permit from admission until it departs or is rejected.
//! The permit is an RAII guard: dropping it returns the unit of capacity, so
//! every exit path (success, lot full, failed write, task abort) releases it
//! exactly once.  No ordering is promised among waiters.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::{SimError, SimResult};

/// Counting semaphore with fixed capacity K.  Cheap to clone; clones share
/// the same permits.
#[derive(Clone, Debug)]
pub struct AdmissionGate {
    semaphore: Arc<Semaphore>,
    capacity:  usize,
}

/// Proof of admission.  Returns its permit to the gate on drop.
#[derive(Debug)]
pub struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
}

impl AdmissionGate {
    /// Fails when `capacity` is more permits than a semaphore can hold.
    pub fn new(capacity: usize) -> SimResult<Self> {
        if capacity > Semaphore::MAX_PERMITS {
            return Err(SimError::Config(format!(
                "max_active_cars {capacity} exceeds the limit of {}",
                Semaphore::MAX_PERMITS
            )));
        }
        Ok(Self { semaphore: Arc::new(Semaphore::new(capacity)), capacity })
    }

    /// Wait until a permit is available and take it.
    pub async fn acquire(&self) -> SimResult<AdmissionPermit> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| SimError::GateClosed)?;
        Ok(AdmissionPermit { _permit: permit })
    }

    /// Take a permit only if one is free right now.
    pub fn try_acquire(&self) -> Option<AdmissionPermit> {
        Arc::clone(&self.semaphore)
            .try_acquire_owned()
            .ok()
            .map(|permit| AdmissionPermit { _permit: permit })
    }

    /// K.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits not currently held.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Permits currently held.
    pub fn in_flight(&self) -> usize {
        self.capacity.saturating_sub(self.available())
    }
}
