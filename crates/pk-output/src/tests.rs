//! Tests for pk-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use pk_core::{CarId, LotId, SlotIndex, SlotRef};

    use crate::csv::CsvWriter;
    use crate::row::{CarEventRow, EventKind, LotSnapshotRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn records(dir: &TempDir, file: &str) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(dir.path().join(file)).unwrap();
        rdr.records().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("lot_snapshots.csv").exists());
        assert!(dir.path().join("car_events.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("lot_snapshots.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["elapsed_secs", "lot", "capacity", "occupied", "free"]);

        let mut rdr = csv::Reader::from_path(dir.path().join("car_events.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["elapsed_secs", "car", "event", "lot", "slot", "dwell_secs"]);
    }

    #[test]
    fn snapshot_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let row = |lot, occupied| LotSnapshotRow {
            elapsed_secs: 1.5,
            lot,
            capacity: 10,
            occupied,
            free: 10 - occupied,
        };
        w.write_snapshots(&[row(1, 3), row(2, 10)]).unwrap();
        w.finish().unwrap();

        let rows = records(&dir, "lot_snapshots.csv");
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "1.500");
        assert_eq!(&rows[0][3], "3");
        assert_eq!(&rows[1][1], "2");
        assert_eq!(&rows[1][4], "0"); // free
    }

    #[test]
    fn event_rows_leave_missing_columns_empty() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let slot = SlotRef::new(LotId(3), SlotIndex(7));
        w.write_event(&CarEventRow::at_slot(0.0, CarId(4), EventKind::Parked, slot, 31.0)).unwrap();
        w.write_event(&CarEventRow::lot_full(0.0, CarId(5), LotId(2))).unwrap();
        w.write_event(&CarEventRow::failed(0.0, CarId(6))).unwrap();
        w.finish().unwrap();

        let rows = records(&dir, "car_events.csv");
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][2], "parked");
        assert_eq!(&rows[0][3], "3");
        assert_eq!(&rows[0][4], "7");
        assert_eq!(&rows[0][5], "31.0");
        assert_eq!(&rows[1][2], "lot_full");
        assert_eq!(&rows[1][3], "2");
        assert_eq!(&rows[1][4], "");
        assert_eq!(&rows[2][2], "failed");
        assert_eq!(&rows[2][3], "");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn missing_directory_is_error() {
        let dir = tmp();
        assert!(CsvWriter::new(&dir.path().join("nope")).is_err());
    }
}

#[cfg(test)]
mod observer_tests {
    use std::sync::Arc;

    use pk_core::{CarId, LotId, LotSpec, ParkingConfig};
    use pk_sim::{ParkingObserver, SimBuilder};

    use crate::row::{CarEventRow, EventKind, LotSnapshotRow};
    use crate::writer::OutputWriter;
    use crate::{CsvWriter, OutputError, OutputObserver, OutputResult};

    /// Collects rows in memory; optionally fails every event write.
    #[derive(Default)]
    struct VecWriter {
        events:    Vec<CarEventRow>,
        snapshots: Vec<LotSnapshotRow>,
        fail:      bool,
    }

    impl OutputWriter for VecWriter {
        fn write_snapshots(&mut self, rows: &[LotSnapshotRow]) -> OutputResult<()> {
            self.snapshots.extend_from_slice(rows);
            Ok(())
        }

        fn write_event(&mut self, row: &CarEventRow) -> OutputResult<()> {
            if self.fail {
                return Err(OutputError::Io(std::io::Error::other("disk full")));
            }
            self.events.push(*row);
            Ok(())
        }

        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    fn two_slot_config() -> ParkingConfig {
        ParkingConfig { lots: vec![LotSpec::new(1, 2)], max_active_cars: 10, ..Default::default() }
    }

    #[tokio::test(start_paused = true)]
    async fn car_events_recorded() {
        let sink = Arc::new(OutputObserver::new(VecWriter::default()));
        let mut sim = SimBuilder::new(two_slot_config()).observer(sink.clone()).build().unwrap();
        for _ in 0..3 {
            sim.spawn_car(LotId(1), 20.0);
        }
        sim.drain().await;
        drop(sim);

        let sink = Arc::into_inner(sink).unwrap();
        assert!(sink.take_error().is_none());
        let w = sink.into_writer().unwrap();
        let count = |k: EventKind| w.events.iter().filter(|e| e.kind == k).count();
        assert_eq!(count(EventKind::Parked), 2);
        assert_eq!(count(EventKind::Departed), 2);
        assert_eq!(count(EventKind::LotFull), 1);

        let departed = w.events.iter().find(|e| e.kind == EventKind::Departed).unwrap();
        assert!(departed.elapsed_secs >= 20.0);
    }

    #[test]
    fn first_write_error_is_kept() {
        let sink = OutputObserver::new(VecWriter { fail: true, ..Default::default() });
        sink.on_lot_full(CarId(1), LotId(1));
        sink.on_lot_full(CarId(2), LotId(1));
        assert!(matches!(sink.take_error(), Some(OutputError::Io(_))));
        assert!(sink.take_error().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn csv_sink_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(OutputObserver::new(CsvWriter::new(dir.path()).unwrap()));
        let mut sim = SimBuilder::new(two_slot_config()).observer(sink.clone()).build().unwrap();
        sim.spawn_car(LotId(1), 10.0);
        sim.drain().await;
        sink.record_snapshot(&sim.stats().snapshot().unwrap()).unwrap();
        sink.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("car_events.csv")).unwrap();
        let kinds: Vec<String> = rdr.records().map(|r| r.unwrap()[2].to_owned()).collect();
        assert_eq!(kinds, ["parked", "departed"]);

        let mut rdr = csv::Reader::from_path(dir.path().join("lot_snapshots.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][3], "0");
    }
}

#[cfg(test)]
mod reporter_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use pk_core::{LotId, ParkingConfig};
    use pk_sim::SimBuilder;

    use crate::row::{CarEventRow, LotSnapshotRow};
    use crate::writer::OutputWriter;
    use crate::{OutputObserver, OutputResult, StatsReporter};

    #[derive(Default)]
    struct Samples(Vec<LotSnapshotRow>);

    impl OutputWriter for Samples {
        fn write_snapshots(&mut self, rows: &[LotSnapshotRow]) -> OutputResult<()> {
            self.0.extend_from_slice(rows);
            Ok(())
        }

        fn write_event(&mut self, _row: &CarEventRow) -> OutputResult<()> {
            Ok(())
        }

        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    #[test]
    fn interval_follows_time_scale() {
        let config = ParkingConfig { time_scale: 0.5, stats_interval_secs: 4.0, ..Default::default() };
        let sim = SimBuilder::new(config.clone()).build().unwrap();
        let sink = Arc::new(OutputObserver::new(Samples::default()));
        let reporter = StatsReporter::new(sim.stats(), sink, &config);
        assert_eq!(reporter.interval(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn samples_on_cadence_until_shutdown() {
        let config = ParkingConfig::default();
        let mut sim = SimBuilder::new(config.clone()).build().unwrap();
        sim.spawn_car(LotId(2), 60.0);

        let sink = Arc::new(OutputObserver::new(Samples::default()));
        let reporter = StatsReporter::new(sim.stats(), sink.clone(), &config);

        // First sample is immediate, then one per second: t = 0..=5.
        let written = reporter
            .run_until(tokio::time::sleep(Duration::from_millis(5_500)))
            .await
            .unwrap();
        assert_eq!(written, 6);

        sim.drain().await;
        drop(sim);
        let samples = Arc::into_inner(sink).unwrap().into_writer().unwrap().0;
        assert_eq!(samples.len(), 6 * 3);
        let lot2: Vec<_> = samples.iter().filter(|r| r.lot == 2).collect();
        assert_eq!(lot2.len(), 6);
        // The car parks once its task first runs, before the t = 1 sample.
        assert!(lot2[1..].iter().all(|r| r.occupied == 1 && r.free == 19));
    }
}
