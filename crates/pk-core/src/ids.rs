//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  `Display` prints the bare number so
//! log lines read naturally ("lot 2, slot 14").

use std::fmt;

use serde::{Deserialize, Serialize};

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
        #[serde(transparent)]
        $vis struct $name(pub $inner);

        impl $name {
            /// The raw integer value.
            #[inline(always)]
            pub fn get(self) -> $inner {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$inner> for $name {
            #[inline(always)]
            fn from(n: $inner) -> $name {
                $name(n)
            }
        }
    };
}

typed_id! {
    /// Identifier of a parking lot.  Small positive integer, fixed by config.
    pub struct LotId(u16);
}

typed_id! {
    /// 1-based slot index within a lot, in `[1, capacity]`.
    pub struct SlotIndex(u32);
}

typed_id! {
    /// Identifier of one arriving car.  Unique for the lifetime of a run.
    pub struct CarId(u64);
}

impl SlotIndex {
    /// The lowest valid slot index.
    pub const FIRST: SlotIndex = SlotIndex(1);

    /// The next index up.
    #[inline]
    pub fn next(self) -> SlotIndex {
        SlotIndex(self.0 + 1)
    }
}

// ── SlotRef ───────────────────────────────────────────────────────────────────

/// A fully qualified slot address: `(lot, index)`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct SlotRef {
    pub lot:  LotId,
    pub slot: SlotIndex,
}

impl SlotRef {
    pub fn new(lot: LotId, slot: SlotIndex) -> Self {
        Self { lot, slot }
    }
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lot {}, slot {}", self.lot, self.slot)
    }
}
