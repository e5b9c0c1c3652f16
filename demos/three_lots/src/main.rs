//! three_lots: runs the parking simulation against three lots until Ctrl-C.
//!
//! Cars arrive in Poisson batches, wait for one of `max_active_cars`
//! admission permits, take the lowest free slot of a randomly chosen lot,
//! stay a while, and leave.  Every event is logged; lot occupancy is sampled
//! once per `stats_interval_secs` into `lot_snapshots.csv` and car events go
//! to `car_events.csv`.
//!
//! ```text
//! RUST_LOG=debug cargo run -p three_lots -- --config demos/three_lots/parking.toml --duration 60
//! ```

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};
use tokio::sync::oneshot;

use pk_core::ParkingConfig;
use pk_output::{CsvWriter, OutputObserver, StatsReporter};
use pk_sim::{FanOut, LogObserver, SimBuilder, log_snapshot};
use pk_store::SqliteStore;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(about = "Concurrent parking-lot simulation")]
struct Args {
    /// TOML config file.  Every field is optional; missing ones use defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the config's RNG seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Override the config's time scale (real seconds per simulated second).
    #[arg(long)]
    time_scale: Option<f64>,

    /// Directory for the CSV output files.
    #[arg(long, default_value = "output/three_lots")]
    output: PathBuf,

    /// SQLite database for occupancy and accounts.  In-memory when omitted.
    #[arg(long)]
    db: Option<PathBuf>,

    /// Stop after this many real seconds instead of waiting for Ctrl-C.
    #[arg(long)]
    duration: Option<f64>,
}

fn load_config(args: &Args) -> Result<ParkingConfig> {
    let mut config = match &args.config {
        Some(path) => ParkingConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ParkingConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(scale) = args.time_scale {
        config.time_scale = scale;
    }
    config.validate()?;
    Ok(config)
}

/// Resolves on Ctrl-C, or after `duration` real seconds if given.
fn shutdown_signal(duration: Option<f64>) -> impl Future<Output = ()> {
    async move {
        let timer = async {
            match duration.and_then(|d| Duration::try_from_secs_f64(d).ok()) {
                Some(d) => tokio::time::sleep(d).await,
                None => std::future::pending().await,
            }
        };
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    log::error!("cannot listen for Ctrl-C: {e}");
                    std::future::pending::<()>().await;
                }
            }
            _ = timer => {}
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = load_config(&args)?;

    // 1. Output sink.
    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let sink = Arc::new(OutputObserver::new(CsvWriter::new(&args.output)?));
    let observer = FanOut::new().with(Arc::new(LogObserver)).with(sink.clone());

    // 2. Simulation, on SQLite if asked.
    let builder = SimBuilder::new(config.clone()).observer(Arc::new(observer));
    let builder = match &args.db {
        Some(path) => {
            let store = SqliteStore::open(path)
                .with_context(|| format!("opening database {}", path.display()))?;
            builder.store(Arc::new(store))
        }
        None => builder,
    };
    let mut sim = builder.build()?;

    log::info!(
        "{} lot(s), {} slot(s), at most {} car(s) in flight, seed {}, time scale {}",
        config.lots.len(),
        config.total_capacity(),
        config.max_active_cars,
        config.seed,
        config.time_scale
    );
    log_snapshot(&sim.stats().snapshot()?);

    // 3. Reporter and arrival loop.
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let reporter = StatsReporter::new(sim.stats(), sink.clone(), &config);
    let reporter = tokio::spawn(reporter.run_until(async move {
        let _ = stop_rx.await;
    }));

    let t0 = Instant::now();
    sim.run_until(shutdown_signal(args.duration)).await;
    let _ = stop_tx.send(());
    let samples = reporter.await??;

    // 4. Summary.
    let summary = sim.summary();
    log_snapshot(&sim.stats().snapshot()?);
    sink.finish()?;
    if let Some(e) = sink.take_error() {
        log::error!("output error: {e}");
    }
    log::info!(
        "ran {:.1} s: {} car(s) spawned, {} departed, {} rejected, {} failed, {} abandoned",
        t0.elapsed().as_secs_f64(),
        summary.spawned,
        summary.departed,
        summary.rejected,
        summary.failed,
        summary.pending()
    );
    log::info!("{samples} statistics sample(s) written to {}", args.output.display());
    Ok(())
}
