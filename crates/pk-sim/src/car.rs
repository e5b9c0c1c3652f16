//! One arriving car and its lifecycle states.

use std::fmt;

use pk_core::{CarId, LotId, SlotRef};

/// ```text
/// Arrived → AdmissionPending ─┬→ Rejected
///                             └→ Allocated → Parked → Departed
/// ```
///
/// `Failed` is reachable from any non-terminal state when an external write
/// fails.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CarState {
    Arrived,
    AdmissionPending,
    Rejected,
    Allocated,
    Parked,
    Departed,
    Failed,
}

impl CarState {
    pub fn is_terminal(self) -> bool {
        matches!(self, CarState::Rejected | CarState::Departed | CarState::Failed)
    }

    pub fn can_transition_to(self, next: CarState) -> bool {
        use CarState::*;
        match (self, next) {
            (Arrived, AdmissionPending)
            | (AdmissionPending, Rejected)
            | (AdmissionPending, Allocated)
            | (Allocated, Parked)
            | (Parked, Departed) => true,
            (from, Failed) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for CarState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Ephemeral car: lives exactly as long as its lifecycle task.
#[derive(Clone, Debug)]
pub struct Car {
    pub id:         CarId,
    /// Lot drawn for this car at arrival.
    pub lot:        LotId,
    /// Simulated seconds the car stays parked.  Drawn once at arrival.
    pub dwell_secs: f64,
    state:          CarState,
    assignment:     Option<SlotRef>,
}

impl Car {
    pub fn new(id: CarId, lot: LotId, dwell_secs: f64) -> Self {
        Self { id, lot, dwell_secs, state: CarState::Arrived, assignment: None }
    }

    pub fn state(&self) -> CarState {
        self.state
    }

    /// The slot the car currently holds, if any.
    pub fn assignment(&self) -> Option<SlotRef> {
        self.assignment
    }

    pub(crate) fn transition(&mut self, next: CarState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "car {}: illegal transition {} → {}",
            self.id,
            self.state,
            next
        );
        log::trace!("car {}: {} → {}", self.id, self.state, next);
        self.state = next;
    }

    pub(crate) fn assign(&mut self, slot: SlotRef) {
        self.assignment = Some(slot);
        self.transition(CarState::Allocated);
    }

    pub(crate) fn unassign(&mut self) {
        self.assignment = None;
    }
}
