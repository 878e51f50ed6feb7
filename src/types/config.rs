//! Configuration for Stratus.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{StratusError, StratusResult};

/// Environment variable overriding `cache.ttl_hours`.
pub const ENV_CACHE_TTL: &str = "STRATUS_CACHE_TTL";

/// Environment variable overriding `general.log_level`.
pub const ENV_LOG_LEVEL: &str = "STRATUS_LOG_LEVEL";

/// Upper bound accepted for `statistics.window_days` (about a century).
pub const MAX_WINDOW_DAYS: i64 = 36_500;

/// Main configuration for Stratus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Entity cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Statistics settings.
    #[serde(default)]
    pub statistics: StatisticsConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

/// Entity cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entry time to live in hours, shared by every entity cache.
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_ttl_hours(),
        }
    }
}

fn default_ttl_hours() -> u32 {
    1
}

/// How the statistic store treats sample dates that do not parse.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnparsableDatePolicy {
    /// Refuse the sample with `InvalidDate`.
    #[default]
    Reject,
    /// Keep the sample and date it "today" on every read.
    AssumeToday,
}

/// Statistics settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsConfig {
    /// Multiple of the standard deviation beyond which a sample is an anomaly.
    #[serde(default = "default_anomaly_threshold")]
    pub anomaly_threshold: f64,

    /// Length in days of the trailing sufficiency window.
    #[serde(default = "default_window_days")]
    pub window_days: i64,

    /// Samples required inside the window before statistics are served.
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,

    /// Handling of unparsable sample dates.
    #[serde(default)]
    pub date_policy: UnparsableDatePolicy,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            anomaly_threshold: default_anomaly_threshold(),
            window_days: default_window_days(),
            min_samples: default_min_samples(),
            date_policy: UnparsableDatePolicy::default(),
        }
    }
}

fn default_anomaly_threshold() -> f64 {
    2.0
}

fn default_window_days() -> i64 {
    2
}

fn default_min_samples() -> usize {
    2
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> StratusResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> StratusResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Creates default configuration.
    pub fn default_config() -> Self {
        Self {
            general: GeneralConfig::default(),
            cache: CacheConfig::default(),
            statistics: StatisticsConfig::default(),
        }
    }

    /// Applies `STRATUS_*` environment overrides on top of the loaded values.
    pub fn apply_env_overrides(&mut self) -> StratusResult<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> StratusResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_CACHE_TTL) {
            self.cache.ttl_hours = raw.trim().parse().map_err(|_| {
                StratusError::config(format!("{} must be a positive integer, got '{}'", ENV_CACHE_TTL, raw))
            })?;
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.general.log_level = level.trim().to_lowercase();
        }

        self.validate()
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> StratusResult<()> {
        if self.cache.ttl_hours == 0 {
            return Err(StratusError::config("cache.ttl_hours must be at least 1"));
        }

        let k = self.statistics.anomaly_threshold;
        if !k.is_finite() || k <= 0.0 {
            return Err(StratusError::config(format!(
                "statistics.anomaly_threshold must be a positive number, got {}",
                k
            )));
        }

        let window = self.statistics.window_days;
        if !(0..=MAX_WINDOW_DAYS).contains(&window) {
            return Err(StratusError::config(format!(
                "statistics.window_days must be between 0 and {}, got {}",
                MAX_WINDOW_DAYS, window
            )));
        }

        if self.statistics.min_samples == 0 {
            return Err(StratusError::config("statistics.min_samples must be at least 1"));
        }

        if !matches!(self.general.log_format.as_str(), "text" | "json") {
            return Err(StratusError::config(format!(
                "general.log_format must be 'text' or 'json', got '{}'",
                self.general.log_format
            )));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
