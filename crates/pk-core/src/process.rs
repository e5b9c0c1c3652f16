//! `RandomProcess`: the arrival, gap, and dwell distributions.
//!
//! | Draw                         | Distribution                          |
//! |------------------------------|---------------------------------------|
//! | arrival batch size           | Poisson(`arrival_batch_mean`)         |
//! | inter-arrival gap (s)        | Exponential(`arrival_rate`)           |
//! | dwell duration (s)           | Normal(mean, stddev), floored         |
//!
//! Draws advance the RNG and nothing else.

use rand_distr::{Distribution, Exp, Normal, Poisson};

use crate::{CoreError, CoreResult, ParkingConfig, SimRng};

/// Seedable source of every random quantity the simulation needs.
pub struct RandomProcess {
    rng:         SimRng,
    batch:       Poisson<f64>,
    gap:         Exp<f64>,
    dwell:       Normal<f64>,
    dwell_floor: f64,
}

impl RandomProcess {
    /// Build from `config`, seeding the RNG from `config.seed`.
    pub fn new(config: &ParkingConfig) -> CoreResult<Self> {
        Self::with_rng(config, SimRng::new(config.seed))
    }

    /// Build from `config` with an explicitly supplied RNG.
    pub fn with_rng(config: &ParkingConfig, rng: SimRng) -> CoreResult<Self> {
        let batch = Poisson::new(config.arrival_batch_mean)
            .map_err(|e| CoreError::Config(format!("arrival_batch_mean: {e}")))?;
        let gap = Exp::new(config.arrival_rate)
            .map_err(|e| CoreError::Config(format!("arrival_rate: {e}")))?;
        let dwell = Normal::new(config.dwell_mean_secs, config.dwell_stddev_secs)
            .map_err(|e| CoreError::Config(format!("dwell distribution: {e}")))?;
        if !(config.dwell_floor_secs.is_finite() && config.dwell_floor_secs > 0.0) {
            return Err(CoreError::Config("dwell_floor_secs must be positive".into()));
        }
        Ok(Self { rng, batch, gap, dwell, dwell_floor: config.dwell_floor_secs })
    }

    /// Number of cars arriving together this tick.  Zero is common.
    pub fn next_arrival_batch_size(&mut self) -> u32 {
        self.batch.sample(self.rng.inner()) as u32
    }

    /// Seconds until the next arrival batch.  Always positive.
    pub fn next_inter_arrival_gap(&mut self) -> f64 {
        self.gap.sample(self.rng.inner()).max(f64::MIN_POSITIVE)
    }

    /// Seconds a car stays parked.  Never below the configured floor.
    pub fn next_dwell_duration(&mut self) -> f64 {
        self.dwell.sample(self.rng.inner()).max(self.dwell_floor)
    }

    /// Access the underlying RNG (lot choice draws from the same stream).
    pub fn rng(&mut self) -> &mut SimRng {
        &mut self.rng
    }
}
