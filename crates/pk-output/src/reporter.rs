//! `StatsReporter`: samples lot occupancy on its own cadence.
//!
//! The reporter pulls [`StatisticsAggregator::snapshot`] rather than being
//! pushed by the simulation, so it never slows car tasks down.  It stands in
//! for the live display: each sample becomes a row per lot in the output
//! sink.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use pk_core::ParkingConfig;
use pk_sim::StatisticsAggregator;
use tokio::time::MissedTickBehavior;

use crate::writer::OutputWriter;
use crate::{OutputObserver, OutputResult};

pub struct StatsReporter<W: OutputWriter> {
    stats:    StatisticsAggregator,
    sink:     Arc<OutputObserver<W>>,
    interval: Duration,
}

impl<W: OutputWriter> StatsReporter<W> {
    /// Sample every `stats_interval_secs` simulated seconds.
    pub fn new(
        stats: StatisticsAggregator,
        sink: Arc<OutputObserver<W>>,
        config: &ParkingConfig,
    ) -> Self {
        Self { stats, sink, interval: config.scaled(config.stats_interval_secs) }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Take one sample and write it.  A failed store read is logged and
    /// skipped; only write errors are returned.
    pub fn report_once(&self) -> OutputResult<bool> {
        match self.stats.snapshot() {
            Ok(snapshot) => {
                self.sink.record_snapshot(&snapshot)?;
                Ok(true)
            }
            Err(e) => {
                log::warn!("statistics sample skipped: {e}");
                Ok(false)
            }
        }
    }

    /// Sample until `shutdown` resolves or a write fails.  Returns the
    /// number of samples written.
    pub async fn run_until<F: Future<Output = ()>>(self, shutdown: F) -> OutputResult<u64> {
        // A zero period would make `interval` panic.
        let period = self.interval.max(Duration::from_millis(1));
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut written = 0;
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    if self.report_once()? {
                        written += 1;
                    }
                }
            }
        }
        log::debug!("statistics reporter stopped after {written} sample(s)");
        Ok(written)
    }
}
