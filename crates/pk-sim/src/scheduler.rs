//! `ArrivalScheduler`: the arrival loop.
//!
//! Each tick:
//!
//! 1. draw a Poisson batch size and spawn one car task per arrival;
//! 2. sleep an exponential inter-arrival gap;
//! 3. take and log a statistics snapshot.
//!
//! The loop only ends on external cancellation
//! ([`run_until`][ArrivalScheduler::run_until]).  In-flight cars are
//! abandoned in place when the scheduler is dropped.

use std::future::Future;
use std::sync::Arc;

use pk_core::{CarId, LotId, RandomProcess};

use crate::stats::log_snapshot;
use crate::{
    Car, CarLifecycle, CarTasks, ParkingContext, RunSummary, Snapshot, StatisticsAggregator,
};

/// What happened during one scheduler tick.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub spawned:  Vec<CarId>,
    pub gap_secs: f64,
    /// `None` if the store could not be read.
    pub snapshot: Option<Snapshot>,
}

pub struct ArrivalScheduler {
    ctx:      Arc<ParkingContext>,
    process:  RandomProcess,
    tasks:    CarTasks,
    stats:    StatisticsAggregator,
    next_car: u64,
    ticks:    u64,
}

impl ArrivalScheduler {
    pub fn new(ctx: Arc<ParkingContext>, process: RandomProcess) -> Self {
        let stats = StatisticsAggregator::new(Arc::clone(&ctx));
        Self { ctx, process, tasks: CarTasks::new(), stats, next_car: 1, ticks: 0 }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run ticks until `shutdown` resolves.
    pub async fn run_until<F: Future<Output = ()>>(&mut self, shutdown: F) {
        tokio::pin!(shutdown);
        loop {
            let stopped = tokio::select! {
                _ = &mut shutdown => true,
                _ = self.tick() => false,
            };
            if stopped {
                log::info!(
                    "simulation stopped after {} tick(s), {} car(s) in flight",
                    self.ticks,
                    self.tasks.len()
                );
                return;
            }
        }
    }

    /// Run exactly `n` ticks.  Useful for tests and incremental stepping.
    pub async fn run_ticks(&mut self, n: u64) -> Vec<TickReport> {
        let mut reports = Vec::with_capacity(n as usize);
        for _ in 0..n {
            reports.push(self.tick().await);
        }
        reports
    }

    /// One arrival / gap / snapshot cycle.
    pub async fn tick(&mut self) -> TickReport {
        self.tasks.reap();

        let batch = self.process.next_arrival_batch_size();
        self.ctx.observer.on_arrivals(batch);
        let spawned = self.spawn_batch(batch);

        let gap_secs = self.process.next_inter_arrival_gap();
        tokio::time::sleep(self.ctx.config.scaled(gap_secs)).await;

        let snapshot = match self.stats.snapshot() {
            Ok(snapshot) => {
                log_snapshot(&snapshot);
                self.ctx.observer.on_snapshot(&snapshot);
                Some(snapshot)
            }
            Err(e) => {
                log::warn!("statistics snapshot failed: {e}");
                None
            }
        };

        self.ticks += 1;
        TickReport { spawned, gap_secs, snapshot }
    }

    /// Spawn `count` cars, each with a uniformly chosen lot and a fresh
    /// dwell draw.
    pub fn spawn_batch(&mut self, count: u32) -> Vec<CarId> {
        let mut spawned = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let Some(lot) = self.ctx.allocator.choose_lot(self.process.rng()) else {
                log::error!("no lots configured; dropping arrivals");
                break;
            };
            let dwell = self.process.next_dwell_duration();
            spawned.push(self.spawn_car(lot, dwell));
        }
        spawned
    }

    /// Spawn one car bound for `lot` with a fixed dwell.
    pub fn spawn_car(&mut self, lot: LotId, dwell_secs: f64) -> CarId {
        let id = CarId(self.next_car);
        self.next_car += 1;
        let car = Car::new(id, lot, dwell_secs);
        self.tasks.spawn(CarLifecycle::new(car, Arc::clone(&self.ctx)));
        id
    }

    /// Wait for every in-flight car to finish and return the totals.
    pub async fn drain(&mut self) -> RunSummary {
        self.tasks.join_all().await
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// A handle for pulling statistics on an independent cadence.
    pub fn stats(&self) -> StatisticsAggregator {
        self.stats.clone()
    }

    pub fn context(&self) -> &Arc<ParkingContext> {
        &self.ctx
    }

    pub fn tasks(&self) -> &CarTasks {
        &self.tasks
    }

    /// Reap finished car tasks, then report the run totals.
    pub fn summary(&mut self) -> RunSummary {
        self.tasks.reap();
        self.tasks.summary()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
