//! Statistics query: sufficiency gate, then the engine over the full history.

use std::sync::Arc;

use crate::types::config::StatisticsConfig;
use crate::types::stats::StatResult;
use crate::{StratusError, StratusResult};

use super::engine::StatisticsEngine;
use super::store::StatisticStore;

/// Answers statistics queries from a [`StatisticStore`].
///
/// Never touches the entity caches.
pub struct StatisticsService {
    store: Arc<StatisticStore>,
    anomaly_threshold: f64,
}

impl StatisticsService {
    pub fn new(store: Arc<StatisticStore>, config: &StatisticsConfig) -> Self {
        Self {
            store,
            anomaly_threshold: config.anomaly_threshold,
        }
    }

    pub fn store(&self) -> &Arc<StatisticStore> {
        &self.store
    }

    /// Computes statistics for `location`.
    ///
    /// Fails with [`StratusError::InsufficientData`] unless the store holds
    /// enough recent samples; no partial result is ever produced.
    pub fn get_statistics(&self, location: &str) -> StratusResult<StatResult> {
        if !self.store.is_sufficient(location) {
            tracing::info!(location = %location, "statistics refused: insufficient data");
            return Err(StratusError::InsufficientData(location.to_string()));
        }

        let samples = self.store.records(location);
        let temps: Vec<f64> = samples.iter().map(|s| s.temperature).collect();

        let (min, max) = temps
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &t| {
                (lo.min(t), hi.max(t))
            });

        let mean = StatisticsEngine::mean(&temps)?;
        let std_dev = StatisticsEngine::std_dev(&temps)?;
        let median = StatisticsEngine::median(&temps)?;
        let mode = StatisticsEngine::mode(&temps)?;

        let anomalies =
            StatisticsEngine::detect_anomalies(&samples, mean, std_dev, self.anomaly_threshold)?;

        tracing::info!(
            location = %location,
            count = temps.len(),
            anomalies = anomalies.len(),
            "statistics computed"
        );

        Ok(StatResult {
            min,
            max,
            count: samples.len(),
            mean,
            std_dev,
            median,
            mode,
            anomaly: if anomalies.is_empty() {
                None
            } else {
                Some(anomalies)
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn setup() -> (NaiveDate, StatisticsService) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap(),
        ));
        let today = clock.now().date_naive();
        let config = StatisticsConfig::default();
        let store = Arc::new(StatisticStore::with_clock(&config, clock));
        (today, StatisticsService::new(store, &config))
    }

    #[test]
    fn test_refuses_without_samples() {
        let (_, service) = setup();
        let err = service.get_statistics("Rome").unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_refuses_with_one_recent_sample() {
        let (today, service) = setup();
        service.store().record("Rome", today, 20.0).unwrap();
        service
            .store()
            .record("Rome", today - Duration::days(10), 15.0)
            .unwrap();

        assert!(matches!(
            service.get_statistics("Rome"),
            Err(StratusError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_statistics_cover_full_history() {
        let (today, service) = setup();
        for (offset, temp) in [(0, 4.0), (1, 3.0), (5, 1.0), (9, 2.0)] {
            service
                .store()
                .record("Rome", today - Duration::days(offset), temp)
                .unwrap();
        }

        let result = service.get_statistics("rome").unwrap();
        assert_eq!(result.count, 4);
        assert_eq!(result.min, 1.0);
        assert_eq!(result.max, 4.0);
        assert_eq!(result.mean, 2.5);
        assert_eq!(result.median, 2.5);
        assert_eq!(result.mode, 1.0);
        assert!((result.std_dev - 1.25f64.sqrt()).abs() < 1e-12);
        assert!(result.anomaly.is_none());
    }

    #[test]
    fn test_reports_anomalies() {
        let (today, service) = setup();
        for (offset, temp) in [20.0, 21.0, 19.0, 20.0, 85.0, 20.0].iter().enumerate() {
            service
                .store()
                .record("Rome", today - Duration::days(offset as i64), *temp)
                .unwrap();
        }

        let result = service.get_statistics("Rome").unwrap();
        let anomalies = result.anomaly.unwrap();
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].temperature, 85.0);
        assert_eq!(anomalies[0].date, today - Duration::days(4));
    }

    #[test]
    fn test_no_anomaly_serializes_as_null() {
        let (today, service) = setup();
        service.store().record("Rome", today, 20.0).unwrap();
        service
            .store()
            .record("Rome", today - Duration::days(1), 20.0)
            .unwrap();

        let result = service.get_statistics("Rome").unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["anomaly"].is_null());
        assert_eq!(json["stdDev"], 0.0);
    }
}
