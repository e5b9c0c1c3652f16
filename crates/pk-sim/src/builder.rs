//! Fluent builder for an [`ArrivalScheduler`] and the shared context.

use std::sync::Arc;

use pk_core::{ParkingConfig, RandomProcess, SimRng};
use pk_store::{AccountStore, MemoryStore, OccupancyStore};

use crate::{
    AdmissionGate, ArrivalScheduler, NoopObserver, ParkingContext, ParkingObserver, SimResult,
    SlotAllocator,
};

/// # Optional inputs (have defaults)
///
/// | Method                 | Default                                  |
/// |------------------------|------------------------------------------|
/// | `.occupancy_store(s)`  | shared fresh `MemoryStore`               |
/// | `.account_store(s)`    | same `MemoryStore` as occupancy          |
/// | `.store(s)`            | sets both from one backend               |
/// | `.observer(o)`         | `NoopObserver`                           |
/// | `.rng(r)`              | `SimRng::new(config.seed)`               |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config)
///     .store(Arc::new(SqliteStore::open(path)?))
///     .observer(Arc::new(LogObserver))
///     .build()?;
/// sim.run_until(tokio::signal::ctrl_c().map(|_| ())).await;
/// ```
pub struct SimBuilder {
    config:    ParkingConfig,
    occupancy: Option<Arc<dyn OccupancyStore>>,
    accounts:  Option<Arc<dyn AccountStore>>,
    observer:  Option<Arc<dyn ParkingObserver>>,
    rng:       Option<SimRng>,
}

impl SimBuilder {
    pub fn new(config: ParkingConfig) -> Self {
        Self { config, occupancy: None, accounts: None, observer: None, rng: None }
    }

    pub fn occupancy_store(mut self, store: Arc<dyn OccupancyStore>) -> Self {
        self.occupancy = Some(store);
        self
    }

    pub fn account_store(mut self, store: Arc<dyn AccountStore>) -> Self {
        self.accounts = Some(store);
        self
    }

    /// Use one backend for both collaborators.
    pub fn store<S>(self, store: Arc<S>) -> Self
    where
        S: OccupancyStore + AccountStore + 'static,
    {
        let occupancy: Arc<dyn OccupancyStore> = store.clone();
        let accounts: Arc<dyn AccountStore> = store;
        self.occupancy_store(occupancy).account_store(accounts)
    }

    pub fn observer(mut self, observer: Arc<dyn ParkingObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Override the RNG (otherwise seeded from `config.seed`).
    pub fn rng(mut self, rng: SimRng) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Validate the config, load initial occupancy from the store, and
    /// return a ready-to-run scheduler.
    pub fn build(self) -> SimResult<ArrivalScheduler> {
        self.config.validate()?;

        let memory = Arc::new(MemoryStore::new());
        let occupancy = self.occupancy.unwrap_or_else(|| memory.clone());
        let accounts = self.accounts.unwrap_or(memory);

        let allocator = SlotAllocator::new(&self.config.lots, occupancy);
        allocator.load_from_store()?;

        let rng = self.rng.unwrap_or_else(|| SimRng::new(self.config.seed));
        let process = RandomProcess::with_rng(&self.config, rng)?;

        let ctx = ParkingContext {
            gate: AdmissionGate::new(self.config.max_active_cars)?,
            allocator,
            accounts,
            observer: self.observer.unwrap_or_else(|| Arc::new(NoopObserver)),
            config: self.config,
        };
        Ok(ArrivalScheduler::new(Arc::new(ctx), process))
    }
}
