//! Seedable simulation RNG.
//!
//! All randomness in a run flows from one `SimRng` seeded by
//! `ParkingConfig::seed`.  Nothing reads ambient global randomness, so the
//! same seed always reproduces the same arrival stream.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

/// Simulation-level RNG, owned by the arrival scheduler.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Pick an element uniformly.  `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.0)
    }
}
