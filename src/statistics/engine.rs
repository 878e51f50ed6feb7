//! Descriptive statistics over temperature samples.
//!
//! Every routine requires at least one sample. An empty input is a caller bug
//! and yields [`StratusError::EmptySamples`] instead of a made-up number.

use crate::types::stats::{Anomaly, StatSample};
use crate::{StratusError, StratusResult};

/// Default multiple of the standard deviation used to flag anomalies.
pub const DEFAULT_ANOMALY_THRESHOLD: f64 = 2.0;

/// Pure, stateless statistics routines.
pub struct StatisticsEngine;

impl StatisticsEngine {
    /// Arithmetic mean.
    pub fn mean(samples: &[f64]) -> StratusResult<f64> {
        Self::require(samples, "mean")?;
        Ok(samples.iter().sum::<f64>() / samples.len() as f64)
    }

    /// Population standard deviation (divides by N).
    pub fn std_dev(samples: &[f64]) -> StratusResult<f64> {
        let mean = Self::mean(samples).map_err(|_| StratusError::EmptySamples("std_dev"))?;
        let variance =
            samples.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / samples.len() as f64;
        Ok(variance.sqrt())
    }

    /// Middle value; mean of the two middle values for an even count.
    pub fn median(samples: &[f64]) -> StratusResult<f64> {
        Self::require(samples, "median")?;

        let sorted = Self::sorted(samples);
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
        } else {
            Ok(sorted[mid])
        }
    }

    /// Most frequent value. Ties go to the smallest of the tied values.
    pub fn mode(samples: &[f64]) -> StratusResult<f64> {
        Self::require(samples, "mode")?;

        let sorted = Self::sorted(samples);
        let mut best = sorted[0];
        let mut best_count = 0;

        // Equal values are adjacent once sorted; the first run to reach a
        // count is the smallest value with it.
        let mut start = 0;
        while start < sorted.len() {
            let mut end = start + 1;
            while end < sorted.len() && sorted[end] == sorted[start] {
                end += 1;
            }

            if end - start > best_count {
                best = sorted[start];
                best_count = end - start;
            }
            start = end;
        }

        Ok(best)
    }

    /// Samples deviating from `mean` by more than `threshold` standard
    /// deviations, in input order.
    ///
    /// A zero standard deviation means every value is identical, so nothing
    /// is anomalous.
    pub fn detect_anomalies(
        samples: &[StatSample],
        mean: f64,
        std_dev: f64,
        threshold: f64,
    ) -> StratusResult<Vec<Anomaly>> {
        if samples.is_empty() {
            return Err(StratusError::EmptySamples("detect_anomalies"));
        }

        if std_dev <= 0.0 {
            return Ok(Vec::new());
        }

        let limit = threshold * std_dev;
        Ok(samples
            .iter()
            .filter(|sample| (sample.temperature - mean).abs() > limit)
            .map(Anomaly::from)
            .collect())
    }

    fn require(samples: &[f64], operation: &'static str) -> StratusResult<()> {
        if samples.is_empty() {
            Err(StratusError::EmptySamples(operation))
        } else {
            Ok(())
        }
    }

    fn sorted(samples: &[f64]) -> Vec<f64> {
        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        sorted
    }
}
