//! Unit tests for pk-core primitives.

#[cfg(test)]
mod ids {
    use crate::{CarId, LotId, SlotIndex, SlotRef};

    #[test]
    fn ordering() {
        assert!(LotId(1) < LotId(2));
        assert!(SlotIndex(3) > SlotIndex(2));
        assert!(CarId(0) < CarId(1));
    }

    #[test]
    fn display_is_bare_number() {
        assert_eq!(LotId(7).to_string(), "7");
        assert_eq!(SlotRef::new(LotId(2), SlotIndex(14)).to_string(), "lot 2, slot 14");
    }

    #[test]
    fn slot_index_next() {
        assert_eq!(SlotIndex::FIRST.next(), SlotIndex(2));
    }
}

#[cfg(test)]
mod config {
    use std::time::Duration;

    use crate::{CoreError, LotId, LotSpec, ParkingConfig};

    #[test]
    fn defaults_match_reference_setup() {
        let cfg = ParkingConfig::default();
        assert_eq!(cfg.lot_ids(), vec![LotId(1), LotId(2), LotId(3)]);
        assert_eq!(cfg.capacity(LotId(1)), Some(32));
        assert_eq!(cfg.capacity(LotId(2)), Some(20));
        assert_eq!(cfg.capacity(LotId(3)), Some(26));
        assert_eq!(cfg.total_capacity(), 78);
        assert_eq!(cfg.max_active_cars, 30);
        assert_eq!(cfg.dwell_floor_secs, 5.0);
        cfg.validate().unwrap();
    }

    #[test]
    fn toml_overrides_only_named_fields() {
        let cfg = ParkingConfig::from_toml_str(
            r#"
            max_active_cars = 10
            seed = 7

            [[lots]]
            id = 1
            capacity = 2
            "#,
        )
        .unwrap();
        assert_eq!(cfg.lots, vec![LotSpec::new(1, 2)]);
        assert_eq!(cfg.max_active_cars, 10);
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.arrival_batch_mean, 3.0);
    }

    #[test]
    fn unknown_field_is_parse_error() {
        let err = ParkingConfig::from_toml_str("max_cars = 3").unwrap_err();
        assert!(matches!(err, CoreError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn zero_capacity_rejected() {
        let cfg = ParkingConfig { lots: vec![LotSpec::new(1, 0)], ..Default::default() };
        assert!(matches!(cfg.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn duplicate_lot_rejected() {
        let cfg = ParkingConfig {
            lots: vec![LotSpec::new(1, 3), LotSpec::new(1, 4)],
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(CoreError::DuplicateLot(LotId(1)))));
    }

    #[test]
    fn empty_lots_and_zero_k_rejected() {
        let no_lots = ParkingConfig { lots: vec![], ..Default::default() };
        assert!(no_lots.validate().is_err());

        let no_k = ParkingConfig { max_active_cars: 0, ..Default::default() };
        assert!(no_k.validate().is_err());
    }

    #[test]
    fn non_positive_rates_rejected() {
        for cfg in [
            ParkingConfig { arrival_rate: 0.0, ..Default::default() },
            ParkingConfig { arrival_batch_mean: -1.0, ..Default::default() },
            ParkingConfig { dwell_floor_secs: 0.0, ..Default::default() },
            ParkingConfig { time_scale: f64::NAN, ..Default::default() },
            ParkingConfig { dwell_stddev_secs: -0.5, ..Default::default() },
        ] {
            assert!(cfg.validate().is_err(), "accepted {cfg:?}");
        }
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parking.toml");
        std::fs::write(&path, "time_scale = 0.5\n").unwrap();
        let cfg = ParkingConfig::load(&path).unwrap();
        assert_eq!(cfg.time_scale, 0.5);
        assert!(matches!(
            ParkingConfig::load(&dir.path().join("missing.toml")),
            Err(CoreError::Io(_))
        ));
    }

    #[test]
    fn scaled_applies_time_scale() {
        let cfg = ParkingConfig { time_scale: 0.1, ..Default::default() };
        assert_eq!(cfg.scaled(30.0), Duration::from_secs(3));
        assert_eq!(cfg.scaled(-1.0), Duration::ZERO);
    }
}

#[cfg(test)]
mod process {
    use crate::{LotId, ParkingConfig, RandomProcess, SimRng};

    #[test]
    fn dwell_never_below_floor() {
        let cfg = ParkingConfig::default();
        let mut p = RandomProcess::new(&cfg).unwrap();
        let below = (0..10_000).filter(|_| p.next_dwell_duration() < 5.0).count();
        assert_eq!(below, 0);
    }

    #[test]
    fn dwell_floor_binds_with_wide_spread() {
        // Mean 5, stddev 10: roughly half the raw draws are below the floor.
        let cfg = ParkingConfig { dwell_mean_secs: 5.0, ..Default::default() };
        let mut p = RandomProcess::new(&cfg).unwrap();
        let draws: Vec<f64> = (0..1_000).map(|_| p.next_dwell_duration()).collect();
        assert!(draws.iter().all(|&d| d >= 5.0));
        assert!(draws.iter().filter(|&&d| d == 5.0).count() > 300);
    }

    #[test]
    fn batch_mean_is_close_to_lambda() {
        let cfg = ParkingConfig::default();
        let mut p = RandomProcess::new(&cfg).unwrap();
        let n = 20_000;
        let total: u64 = (0..n).map(|_| p.next_arrival_batch_size() as u64).sum();
        let mean = total as f64 / n as f64;
        assert!((mean - 3.0).abs() < 0.1, "mean = {mean}");
    }

    #[test]
    fn batch_size_zero_occurs() {
        let cfg = ParkingConfig::default();
        let mut p = RandomProcess::new(&cfg).unwrap();
        assert!((0..1_000).any(|_| p.next_arrival_batch_size() == 0));
    }

    #[test]
    fn gap_is_positive_with_expected_mean() {
        let cfg = ParkingConfig::default();
        let mut p = RandomProcess::new(&cfg).unwrap();
        let n = 20_000;
        let gaps: Vec<f64> = (0..n).map(|_| p.next_inter_arrival_gap()).collect();
        assert!(gaps.iter().all(|&g| g > 0.0));
        let mean = gaps.iter().sum::<f64>() / n as f64;
        assert!((mean - 30.0).abs() < 1.5, "mean = {mean}");
    }

    #[test]
    fn same_seed_same_stream() {
        let cfg = ParkingConfig::default();
        let mut a = RandomProcess::new(&cfg).unwrap();
        let mut b = RandomProcess::new(&cfg).unwrap();
        for _ in 0..100 {
            assert_eq!(a.next_arrival_batch_size(), b.next_arrival_batch_size());
            assert_eq!(a.next_inter_arrival_gap(), b.next_inter_arrival_gap());
            assert_eq!(a.next_dwell_duration(), b.next_dwell_duration());
        }
    }

    #[test]
    fn different_seed_different_stream() {
        let cfg = ParkingConfig::default();
        let mut a = RandomProcess::with_rng(&cfg, SimRng::new(1)).unwrap();
        let mut b = RandomProcess::with_rng(&cfg, SimRng::new(2)).unwrap();
        let da: Vec<f64> = (0..10).map(|_| a.next_dwell_duration()).collect();
        let db: Vec<f64> = (0..10).map(|_| b.next_dwell_duration()).collect();
        assert_ne!(da, db);
    }

    #[test]
    fn choose_is_roughly_uniform() {
        let lots = [LotId(1), LotId(2), LotId(3)];
        let mut rng = SimRng::new(9);
        let mut hits = [0usize; 3];
        for _ in 0..9_000 {
            let lot = rng.choose(&lots).unwrap();
            hits[(lot.0 - 1) as usize] += 1;
        }
        for h in hits {
            assert!((2_700..3_300).contains(&h), "hits = {hits:?}");
        }
        assert!(rng.choose::<LotId>(&[]).is_none());
    }
}
