use std::fmt;

use pk_core::{CoreError, LotId};
use pk_store::StoreError;
use thiserror::Error;

/// The point in a car's lifecycle where an external call failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Reading the lot's occupied slots.
    Lookup,
    /// Writing the occupancy record for a newly claimed slot.
    Occupy,
    /// Opening the account and debiting the parking fee.
    Debit,
    /// Recording the parked assignment.
    Assign,
    /// Clearing the occupancy record on departure.
    Vacate,
    /// Clearing the parked assignment on departure.
    Unassign,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Lookup   => "looking up free slots",
            Stage::Occupy   => "occupying slot",
            Stage::Debit    => "debiting fee",
            Stage::Assign   => "recording assignment",
            Stage::Vacate   => "vacating slot",
            Stage::Unassign => "clearing assignment",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("lot {0} is not configured")]
    UnknownLot(LotId),

    #[error("counter lock for lot {0} poisoned")]
    Poisoned(LotId),

    #[error("external write failed while {stage}: {source}")]
    Store {
        stage:  Stage,
        #[source]
        source: StoreError,
    },

    #[error("store read failed: {0}")]
    StoreRead(#[from] StoreError),

    #[error("admission gate closed")]
    GateClosed,
}

impl SimError {
    pub(crate) fn at(stage: Stage) -> impl FnOnce(StoreError) -> SimError {
        move |source| SimError::Store { stage, source }
    }
}

pub type SimResult<T> = Result<T, SimError>;
