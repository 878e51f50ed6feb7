//! Statistic samples and query results.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day's mean temperature for a location, as read back from the store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatSample {
    pub temperature: f64,
    pub date: NaiveDate,
}

impl StatSample {
    pub fn new(temperature: f64, date: NaiveDate) -> Self {
        Self { temperature, date }
    }
}

/// A sample flagged as statistically deviant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub date: NaiveDate,
    pub temperature: f64,
}

impl From<&StatSample> for Anomaly {
    fn from(sample: &StatSample) -> Self {
        Self {
            date: sample.date,
            temperature: sample.temperature,
        }
    }
}

/// Descriptive statistics over a location's full history.
///
/// `anomaly` is `None` when nothing deviates, so it serializes as `null`
/// rather than an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatResult {
    pub min: f64,
    pub max: f64,
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub median: f64,
    pub mode: f64,
    pub anomaly: Option<Vec<Anomaly>>,
}

/// Input row for bulk sample loading (CLI and RPC boundary).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleInput {
    pub location: String,
    pub date: String,
    pub temperature: f64,
}
