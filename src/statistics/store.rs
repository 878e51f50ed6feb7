//! Ledger of daily mean temperatures, keyed by (location, date).

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use parking_lot::RwLock;

use crate::cache::normalize_key;
use crate::clock::{Clock, SystemClock};
use crate::types::config::{StatisticsConfig, UnparsableDatePolicy};
use crate::types::stats::StatSample;
use crate::{StratusError, StratusResult};

/// Date format accepted by [`StatisticStore::record_raw`].
pub const SAMPLE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Largest accepted temperature magnitude; keeps sums over a history finite.
pub const MAX_ABS_TEMPERATURE: f64 = 1e6;

/// Date of a stored sample.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum SampleDate {
    Day(NaiveDate),
    /// Kept verbatim under [`UnparsableDatePolicy::AssumeToday`].
    Unparsed(String),
}

impl SampleDate {
    fn resolve(&self, today: NaiveDate) -> NaiveDate {
        match self {
            SampleDate::Day(date) => *date,
            SampleDate::Unparsed(_) => today,
        }
    }
}

/// Append-only store of statistic samples.
///
/// The first sample recorded for a location-day wins; later ones for the same
/// key are dropped. Nothing is ever removed.
pub struct StatisticStore {
    locations: RwLock<HashMap<String, HashMap<SampleDate, f64>>>,
    clock: Arc<dyn Clock>,
    window_days: i64,
    min_samples: usize,
    date_policy: UnparsableDatePolicy,
}

impl StatisticStore {
    /// Creates an empty store on the wall clock.
    pub fn new(config: &StatisticsConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates an empty store on the given clock.
    pub fn with_clock(config: &StatisticsConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            locations: RwLock::new(HashMap::new()),
            clock,
            window_days: config.window_days,
            min_samples: config.min_samples,
            date_policy: config.date_policy,
        }
    }

    /// Records the mean temperature of `location` on `date`.
    ///
    /// Returns `false` when a sample for that location-day already exists; the
    /// stored value is left untouched.
    pub fn record(&self, location: &str, date: NaiveDate, temperature: f64) -> StratusResult<bool> {
        self.insert(location, SampleDate::Day(date), temperature)
    }

    /// Like [`record`](Self::record), with the date given as `YYYY-MM-DD`.
    pub fn record_raw(&self, location: &str, date: &str, temperature: f64) -> StratusResult<bool> {
        match NaiveDate::parse_from_str(date.trim(), SAMPLE_DATE_FORMAT) {
            Ok(parsed) => self.insert(location, SampleDate::Day(parsed), temperature),
            Err(_) => match self.date_policy {
                UnparsableDatePolicy::Reject => Err(StratusError::InvalidDate(date.to_string())),
                UnparsableDatePolicy::AssumeToday => {
                    tracing::warn!(location = %location, date = %date, "storing sample with unparsable date");
                    self.insert(location, SampleDate::Unparsed(date.to_string()), temperature)
                }
            },
        }
    }

    fn insert(&self, location: &str, date: SampleDate, temperature: f64) -> StratusResult<bool> {
        let location = normalize_key(location);
        if location.is_empty() {
            return Err(StratusError::InvalidLocation);
        }

        if !temperature.is_finite() || temperature.abs() > MAX_ABS_TEMPERATURE {
            return Err(StratusError::InvalidSample(format!(
                "temperature must be finite and within ±{}, got {}",
                MAX_ABS_TEMPERATURE, temperature
            )));
        }

        let mut locations = self.locations.write();
        match locations.entry(location.clone()).or_default().entry(date) {
            Entry::Occupied(_) => {
                tracing::debug!(location = %location, "sample already recorded for this day");
                Ok(false)
            }
            Entry::Vacant(slot) => {
                slot.insert(temperature);
                tracing::info!(location = %location, temperature, "sample recorded");
                Ok(true)
            }
        }
    }

    /// True when at least `min_samples` samples fall inside
    /// `[today - window_days, today]`.
    pub fn is_sufficient(&self, location: &str) -> bool {
        let location = normalize_key(location);
        let today = self.clock.today();
        let start = Duration::try_days(self.window_days)
            .and_then(|window| today.checked_sub_signed(window))
            .unwrap_or(NaiveDate::MIN);

        let locations = self.locations.read();
        let Some(samples) = locations.get(&location) else {
            return false;
        };

        let mut in_window = 0;
        for date in samples.keys() {
            let date = date.resolve(today);
            if date >= start && date <= today {
                in_window += 1;
                if in_window >= self.min_samples {
                    return true;
                }
            }
        }

        false
    }

    /// Full history of `location`, oldest first.
    pub fn records(&self, location: &str) -> Vec<StatSample> {
        let location = normalize_key(location);
        let today = self.clock.today();

        let mut samples: Vec<StatSample> = {
            let locations = self.locations.read();
            locations
                .get(&location)
                .map(|samples| {
                    samples
                        .iter()
                        .map(|(date, temperature)| StatSample::new(*temperature, date.resolve(today)))
                        .collect()
                })
                .unwrap_or_default()
        };

        samples.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.temperature.total_cmp(&b.temperature))
        });
        samples
    }

    /// Normalized names of every location with at least one sample.
    pub fn locations(&self) -> Vec<String> {
        let mut names: Vec<String> = self.locations.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Total number of samples across all locations.
    pub fn len(&self) -> usize {
        self.locations.read().values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for StatisticStore {
    fn default() -> Self {
        Self::new(&StatisticsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn store_with(policy: UnparsableDatePolicy) -> StatisticStore {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap(),
        ));
        let config = StatisticsConfig {
            date_policy: policy,
            ..StatisticsConfig::default()
        };
        StatisticStore::with_clock(&config, clock)
    }

    fn store() -> StatisticStore {
        store_with(UnparsableDatePolicy::Reject)
    }

    #[test]
    fn test_first_sample_wins() {
        let store = store();
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        assert!(store.record("Rome", day, 10.0).unwrap());
        assert!(!store.record("Rome", day, 99.0).unwrap());

        let records = store.records("Rome");
        assert_eq!(records, vec![StatSample::new(10.0, day)]);
    }

    #[test]
    fn test_location_is_normalized() {
        let store = store();
        store.record("new york", today(), 21.0).unwrap();

        assert_eq!(store.records("NEW YORK").len(), 1);
        assert_eq!(store.records(" New York ").len(), 1);
        assert_eq!(store.locations(), vec!["NEW+YORK".to_string()]);
    }

    #[test]
    fn test_locations_do_not_leak_by_suffix() {
        let store = store();
        store.record("New Rome", today(), 30.0).unwrap();
        store.record("Rome", today(), 20.0).unwrap();

        let records = store.records("Rome");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].temperature, 20.0);
    }

    #[test]
    fn test_sufficiency_window() {
        let store = store();
        store.record("Rome", today(), 20.0).unwrap();
        store.record("Rome", today() - Duration::days(3), 18.0).unwrap();
        assert!(!store.is_sufficient("Rome"));

        store.record("Rome", today() - Duration::days(1), 19.0).unwrap();
        assert!(store.is_sufficient("Rome"));
    }

    #[test]
    fn test_window_start_is_inclusive() {
        let store = store();
        store.record("Rome", today(), 20.0).unwrap();
        store.record("Rome", today() - Duration::days(2), 18.0).unwrap();
        assert!(store.is_sufficient("Rome"));
    }

    #[test]
    fn test_future_samples_do_not_count() {
        let store = store();
        store.record("Rome", today(), 20.0).unwrap();
        store.record("Rome", today() + Duration::days(1), 18.0).unwrap();
        assert!(!store.is_sufficient("Rome"));
    }

    #[test]
    fn test_unknown_location_is_insufficient() {
        assert!(!store().is_sufficient("Atlantis"));
        assert!(store().records("Atlantis").is_empty());
    }

    #[test]
    fn test_records_sorted_by_date() {
        let store = store();
        for offset in [4, 0, 2, 1, 3] {
            store
                .record("Rome", today() - Duration::days(offset), offset as f64)
                .unwrap();
        }

        let dates: Vec<NaiveDate> = store.records("Rome").iter().map(|s| s.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
    }

    #[test]
    fn test_record_raw_parses_iso_dates() {
        let store = store();
        assert!(store.record_raw("Rome", "2024-06-14", 19.5).unwrap());

        let records = store.records("Rome");
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2024, 6, 14).unwrap());
    }

    #[test]
    fn test_record_raw_rejects_bad_date() {
        let store = store();
        let result = store.record_raw("Rome", "14/06/2024", 19.5);

        assert!(matches!(result, Err(StratusError::InvalidDate(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_assume_today_policy_counts_as_fresh() {
        let store = store_with(UnparsableDatePolicy::AssumeToday);
        store.record_raw("Rome", "garbage", 19.5).unwrap();
        store.record("Rome", today() - Duration::days(30), 12.0).unwrap();
        assert!(!store.is_sufficient("Rome"));

        store.record_raw("Rome", "also garbage", 20.5).unwrap();
        assert!(store.is_sufficient("Rome"));

        let records = store.records("Rome");
        assert_eq!(records.last().unwrap().date, today());
    }

    #[test]
    fn test_rejects_invalid_samples() {
        let store = store();
        assert!(matches!(
            store.record("Rome", today(), f64::NAN),
            Err(StratusError::InvalidSample(_))
        ));
        assert!(matches!(
            store.record("   ", today(), 20.0),
            Err(StratusError::InvalidLocation)
        ));
        assert!(matches!(
            store.record("Rome", today(), f64::MAX),
            Err(StratusError::InvalidSample(_))
        ));
        assert!(store.record("Rome", today(), -MAX_ABS_TEMPERATURE).unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_huge_window_reaches_back_to_the_first_day() {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap(),
        ));
        let config = StatisticsConfig {
            window_days: 100_000_000,
            ..StatisticsConfig::default()
        };
        let store = StatisticStore::with_clock(&config, clock);

        store.record("Rome", today(), 20.0).unwrap();
        store.record("Rome", NaiveDate::from_ymd_opt(1900, 1, 1).unwrap(), 18.0).unwrap();
        assert!(store.is_sufficient("Rome"));
    }
}
