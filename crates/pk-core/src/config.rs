//! Simulation configuration.
//!
//! Supplied once at startup, never reloaded.  Every field has a default so a
//! config file only needs to name what it changes:
//!
//! ```toml
//! max_active_cars = 10
//! seed            = 7
//!
//! [[lots]]
//! id       = 1
//! capacity = 12
//! ```

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult, LotId};

// ── LotSpec ───────────────────────────────────────────────────────────────────

/// One configured lot: its id and fixed capacity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotSpec {
    pub id:       LotId,
    pub capacity: u32,
}

impl LotSpec {
    pub fn new(id: u16, capacity: u32) -> Self {
        Self { id: LotId(id), capacity }
    }
}

// ── ParkingConfig ─────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParkingConfig {
    /// Lots and their capacities.  Default: `{1: 32, 2: 20, 3: 26}`.
    pub lots: Vec<LotSpec>,

    /// Admission limit K: cars simultaneously between admission and
    /// departure.  Default: 30.
    pub max_active_cars: usize,

    /// Poisson mean of the arrival batch size.  Default: 3.
    pub arrival_batch_mean: f64,

    /// Exponential rate of the inter-arrival gap, per second.  Default: 1/30.
    pub arrival_rate: f64,

    /// Normal mean of the dwell duration, seconds.  Default: 30.
    pub dwell_mean_secs: f64,

    /// Normal standard deviation of the dwell duration, seconds.  Default: 10.
    pub dwell_stddev_secs: f64,

    /// Lower bound applied to every dwell draw, seconds.  Default: 5.
    pub dwell_floor_secs: f64,

    /// Amount debited from a car's account when it parks.  Default: 50.
    pub parking_fee: u64,

    /// Balance a car's account is opened with.  Default: 50.
    pub initial_balance: u64,

    /// Master RNG seed.  The same seed always produces the same draws.
    pub seed: u64,

    /// Real seconds slept per simulated second.  1.0 runs in real time;
    /// 0.1 runs ten times faster.
    pub time_scale: f64,

    /// Cadence of the pull-based statistics reporter, simulated seconds.
    pub stats_interval_secs: f64,
}

impl Default for ParkingConfig {
    fn default() -> Self {
        Self {
            lots:                vec![LotSpec::new(1, 32), LotSpec::new(2, 20), LotSpec::new(3, 26)],
            max_active_cars:     30,
            arrival_batch_mean:  3.0,
            arrival_rate:        1.0 / 30.0,
            dwell_mean_secs:     30.0,
            dwell_stddev_secs:   10.0,
            dwell_floor_secs:    5.0,
            parking_fee:         50,
            initial_balance:     50,
            seed:                42,
            time_scale:          1.0,
            stats_interval_secs: 1.0,
        }
    }
}

impl ParkingConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(text: &str) -> CoreResult<Self> {
        let config: ParkingConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML config file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check every startup invariant.  A config that fails here must not be
    /// used to start a simulation.
    pub fn validate(&self) -> CoreResult<()> {
        if self.lots.is_empty() {
            return Err(CoreError::Config("at least one lot must be configured".into()));
        }
        let mut seen = BTreeSet::new();
        for lot in &self.lots {
            if lot.id.0 == 0 {
                return Err(CoreError::Config("lot ids must be positive".into()));
            }
            if lot.capacity == 0 {
                return Err(CoreError::Config(format!("lot {} has zero capacity", lot.id)));
            }
            if !seen.insert(lot.id) {
                return Err(CoreError::DuplicateLot(lot.id));
            }
        }
        if self.max_active_cars == 0 {
            return Err(CoreError::Config("max_active_cars must be positive".into()));
        }
        require_positive("arrival_batch_mean", self.arrival_batch_mean)?;
        require_positive("arrival_rate", self.arrival_rate)?;
        require_positive("dwell_floor_secs", self.dwell_floor_secs)?;
        require_positive("time_scale", self.time_scale)?;
        require_positive("stats_interval_secs", self.stats_interval_secs)?;
        if !self.dwell_mean_secs.is_finite() {
            return Err(CoreError::Config("dwell_mean_secs must be finite".into()));
        }
        if !self.dwell_stddev_secs.is_finite() || self.dwell_stddev_secs < 0.0 {
            return Err(CoreError::Config(
                "dwell_stddev_secs must be finite and non-negative".into(),
            ));
        }
        Ok(())
    }

    /// Configured lot ids in ascending order.
    pub fn lot_ids(&self) -> Vec<LotId> {
        let mut ids: Vec<LotId> = self.lots.iter().map(|l| l.id).collect();
        ids.sort_unstable();
        ids
    }

    /// Capacity of `lot`, or `None` if it is not configured.
    pub fn capacity(&self, lot: LotId) -> Option<u32> {
        self.lots.iter().find(|l| l.id == lot).map(|l| l.capacity)
    }

    /// Sum of all lot capacities.
    pub fn total_capacity(&self) -> u64 {
        self.lots.iter().map(|l| l.capacity as u64).sum()
    }

    /// Convert a simulated duration into the real duration to sleep for.
    pub fn scaled(&self, simulated_secs: f64) -> Duration {
        Duration::try_from_secs_f64((simulated_secs * self.time_scale).max(0.0))
            .unwrap_or(Duration::MAX)
    }
}

fn require_positive(name: &str, value: f64) -> CoreResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CoreError::Config(format!("{name} must be a positive finite number, got {value}")))
    }
}
