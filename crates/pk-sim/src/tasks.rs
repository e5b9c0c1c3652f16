//! `CarTasks`: the supervised set of in-flight car tasks.
//!
//! The scheduler spawns cars fire-and-forget, but every task lands in a
//! `JoinSet` so finished tasks can be reaped, tests can await the whole set,
//! and dropping the set aborts whatever is still running.

use tokio::task::{JoinError, JoinSet};

use crate::{CarLifecycle, CarOutcome, SimResult};

/// Totals over every car task reaped so far.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub spawned:  u64,
    pub departed: u64,
    pub rejected: u64,
    pub failed:   u64,
}

impl RunSummary {
    /// Tasks spawned but not yet reaped.
    pub fn pending(&self) -> u64 {
        self.spawned - self.departed - self.rejected - self.failed
    }
}

#[derive(Default)]
pub struct CarTasks {
    set:     JoinSet<SimResult<CarOutcome>>,
    summary: RunSummary,
}

impl CarTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `lifecycle` on the runtime.  Must be called from within a
    /// tokio runtime.
    pub fn spawn(&mut self, lifecycle: CarLifecycle) {
        self.summary.spawned += 1;
        self.set.spawn(lifecycle.run());
    }

    /// Collect every task that has already finished, without waiting.
    /// Returns how many were reaped.
    pub fn reap(&mut self) -> usize {
        let mut reaped = 0;
        while let Some(result) = self.set.try_join_next() {
            self.record(result);
            reaped += 1;
        }
        if reaped > 0 {
            log::debug!("reaped {reaped} finished car task(s), {} in flight", self.set.len());
        }
        reaped
    }

    /// Wait for every in-flight car to finish.
    pub async fn join_all(&mut self) -> RunSummary {
        while let Some(result) = self.set.join_next().await {
            self.record(result);
        }
        self.summary
    }

    /// Tasks not yet reaped (running or finished-but-uncollected).
    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Totals as of the last reap. Tasks that finished since then still
    /// count as pending.
    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    fn record(&mut self, result: Result<SimResult<CarOutcome>, JoinError>) {
        match result {
            Ok(Ok(CarOutcome::Departed { .. })) => self.summary.departed += 1,
            Ok(Ok(CarOutcome::Rejected { .. })) => self.summary.rejected += 1,
            // Already logged by the task itself.
            Ok(Err(_)) => self.summary.failed += 1,
            Err(e) => {
                log::error!("car task did not complete: {e}");
                self.summary.failed += 1;
            }
        }
    }
}
