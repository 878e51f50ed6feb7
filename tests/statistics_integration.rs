//! Integration tests for the statistic store, engine and service.

use std::sync::Arc;
use std::thread;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use stratus::clock::{Clock, ManualClock};
use stratus::statistics::{StatisticStore, StatisticsEngine, StatisticsService};
use stratus::types::config::{StatisticsConfig, UnparsableDatePolicy};
use stratus::types::stats::StatSample;
use stratus::StratusError;

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 15, 9, 30, 0).unwrap()))
}

fn service_with(config: StatisticsConfig) -> (StatisticsService, Arc<ManualClock>) {
    let clock = clock();
    let store = Arc::new(StatisticStore::with_clock(&config, clock.clone()));
    (StatisticsService::new(store, &config), clock)
}

fn service() -> (StatisticsService, Arc<ManualClock>) {
    service_with(StatisticsConfig::default())
}

fn days_ago(clock: &ManualClock, days: i64) -> NaiveDate {
    clock.today() - Duration::days(days)
}

mod store_tests {
    use super::*;

    #[test]
    fn test_record_is_idempotent() {
        let (service, clock) = service();
        let store = service.store();

        assert!(store.record("Rome", clock.today(), 20.0).unwrap());
        assert!(!store.record("ROME", clock.today(), 35.0).unwrap());

        let records = store.records("rome");
        assert_eq!(records, vec![StatSample::new(20.0, clock.today())]);
    }

    #[test]
    fn test_sufficiency_window() {
        let (service, clock) = service();
        let store = service.store();

        store.record("A", days_ago(&clock, 0), 20.0).unwrap();
        store.record("A", days_ago(&clock, 3), 20.0).unwrap();
        assert!(!store.is_sufficient("A"));

        store.record("A", days_ago(&clock, 1), 20.0).unwrap();
        assert!(store.is_sufficient("A"));
    }

    #[test]
    fn test_window_edges_are_inclusive() {
        let (service, clock) = service();
        let store = service.store();

        store.record("B", days_ago(&clock, 2), 20.0).unwrap();
        store.record("B", days_ago(&clock, 0), 21.0).unwrap();
        assert!(store.is_sufficient("B"));

        // Tomorrow turns the oldest sample stale.
        clock.advance(Duration::days(1));
        assert!(!store.is_sufficient("B"));
    }

    #[test]
    fn test_records_keep_full_history() {
        let (service, clock) = service();
        let store = service.store();

        for days in [30, 0, 10] {
            store.record("C", days_ago(&clock, days), days as f64).unwrap();
        }

        let dates: Vec<NaiveDate> = store.records("C").iter().map(|s| s.date).collect();
        assert_eq!(
            dates,
            vec![days_ago(&clock, 30), days_ago(&clock, 10), days_ago(&clock, 0)]
        );
    }

    #[test]
    fn test_unparsable_date_policy() {
        let (rejecting, _) = service();
        let err = rejecting.store().record_raw("D", "15/06/2024", 20.0).unwrap_err();
        assert!(matches!(err, StratusError::InvalidDate(_)));
        assert!(rejecting.store().is_empty());

        let (lenient, clock) = service_with(StatisticsConfig {
            date_policy: UnparsableDatePolicy::AssumeToday,
            ..StatisticsConfig::default()
        });
        assert!(lenient.store().record_raw("D", "15/06/2024", 20.0).unwrap());
        assert_eq!(lenient.store().records("D")[0].date, clock.today());
    }

    #[test]
    fn test_concurrent_records_keep_first_writer() {
        let (service, clock) = service();
        let store = service.store().clone();
        let today = clock.today();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                thread::spawn(move || store.record("E", today, i as f64).unwrap())
            })
            .collect();

        let inserted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|inserted| *inserted)
            .count();

        assert_eq!(inserted, 1);
        assert_eq!(store.records("E").len(), 1);
    }
}

mod engine_tests {
    use super::*;

    #[test]
    fn test_median() {
        assert_eq!(StatisticsEngine::median(&[1.0, 2.0, 3.0, 4.0]).unwrap(), 2.5);
        assert_eq!(StatisticsEngine::median(&[3.0, 1.0, 2.0]).unwrap(), 2.0);
    }

    #[test]
    fn test_mode_prefers_smallest_tie() {
        assert_eq!(StatisticsEngine::mode(&[1.0, 1.0, 2.0, 2.0, 3.0]).unwrap(), 1.0);
        assert_eq!(StatisticsEngine::mode(&[3.0, 2.0, 3.0]).unwrap(), 3.0);
    }

    #[test]
    fn test_population_std_dev() {
        let sd = StatisticsEngine::std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((sd - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(matches!(
            StatisticsEngine::mean(&[]),
            Err(StratusError::EmptySamples(_))
        ));
        assert!(StatisticsEngine::mode(&[]).is_err());
    }
}

mod service_tests {
    use super::*;

    #[test]
    fn test_insufficient_data_gate() {
        let (service, clock) = service();
        service.store().record("Rome", clock.today(), 20.0).unwrap();

        let err = service.get_statistics("Rome").unwrap_err();
        assert!(err.is_insufficient_data());
        assert!(err.to_string().contains("not enough data yet for this location"));

        assert!(service.get_statistics("Nowhere").unwrap_err().is_insufficient_data());
    }

    #[test]
    fn test_statistics_flag_the_outlier() {
        let (service, clock) = service();
        let store = service.store();
        let temperatures = [20.0, 21.0, 19.0, 20.0, 85.0, 20.0];
        for (i, t) in temperatures.iter().enumerate() {
            store.record("Lima", days_ago(&clock, 5 - i as i64), *t).unwrap();
        }

        let result = service.get_statistics("lima").unwrap();
        assert_eq!(result.count, 6);
        assert_eq!(result.min, 19.0);
        assert_eq!(result.max, 85.0);
        assert_eq!(result.median, 20.0);
        assert_eq!(result.mode, 20.0);

        let anomalies = result.anomaly.unwrap();
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].temperature, 85.0);
        assert_eq!(anomalies[0].date, days_ago(&clock, 1));
    }

    #[test]
    fn test_flat_history_has_no_anomalies() {
        let (service, clock) = service();
        for days in 0..4 {
            service.store().record("Oslo", days_ago(&clock, days), 20.0).unwrap();
        }

        let result = service.get_statistics("Oslo").unwrap();
        assert_eq!(result.std_dev, 0.0);
        assert!(result.anomaly.is_none());

        let json = serde_json::to_value(&result).unwrap();
        assert!(json["anomaly"].is_null());
    }

    #[test]
    fn test_threshold_is_configurable() {
        let (service, clock) = service_with(StatisticsConfig {
            anomaly_threshold: 1.0,
            ..StatisticsConfig::default()
        });
        for (days, t) in [(2, 10.0), (1, 20.0), (0, 30.0)] {
            service.store().record("Nice", days_ago(&clock, days), t).unwrap();
        }

        // sd = 8.16, so both extremes sit beyond one deviation.
        let anomalies = service.get_statistics("Nice").unwrap().anomaly.unwrap();
        assert_eq!(anomalies.len(), 2);
        assert_eq!(anomalies[0].temperature, 10.0);
    }
}
