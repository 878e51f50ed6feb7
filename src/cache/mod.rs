//! Per-entity TTL caches.
//!
//! Every weather entity gets its own [`EntityCache`] with its own lock, so a
//! write to the wind cache never blocks a read of the forecast cache and keys
//! never collide across entity types.

mod entity;

use std::sync::Arc;

use serde::Serialize;

use crate::clock::{Clock, SystemClock};
use crate::types::weather::{
    CurrentConditions, DailyForecast, HourlyForecast, Metrics, MoonPhase, Wind,
};

pub use entity::{normalize_key, CacheStats, EntityCache};

/// Key under which the location-independent moon phase is cached.
pub const MOON_KEY: &str = "moon";

/// One cache per entity type.
pub struct EntityCaches {
    pub current: EntityCache<CurrentConditions>,
    pub metrics: EntityCache<Metrics>,
    pub wind: EntityCache<Wind>,
    pub daily_forecast: EntityCache<DailyForecast>,
    pub hourly_forecast: EntityCache<HourlyForecast>,
    pub moon: EntityCache<MoonPhase>,
}

/// Statistics of every entity cache.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EntityCachesStats {
    pub current: CacheStats,
    pub metrics: CacheStats,
    pub wind: CacheStats,
    pub daily_forecast: CacheStats,
    pub hourly_forecast: CacheStats,
    pub moon: CacheStats,
}

impl EntityCaches {
    /// Creates empty caches on the wall clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates empty caches sharing one clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            current: EntityCache::with_clock(clock.clone()),
            metrics: EntityCache::with_clock(clock.clone()),
            wind: EntityCache::with_clock(clock.clone()),
            daily_forecast: EntityCache::with_clock(clock.clone()),
            hourly_forecast: EntityCache::with_clock(clock.clone()),
            moon: EntityCache::with_clock(clock),
        }
    }

    pub fn stats(&self) -> EntityCachesStats {
        EntityCachesStats {
            current: self.current.stats(),
            metrics: self.metrics.stats(),
            wind: self.wind.stats(),
            daily_forecast: self.daily_forecast.stats(),
            hourly_forecast: self.hourly_forecast.stats(),
            moon: self.moon.stats(),
        }
    }

    /// Sweeps every cache; see [`EntityCache::purge_expired`].
    pub fn purge_expired(&self, ttl_hours: u32) -> usize {
        self.current.purge_expired(ttl_hours)
            + self.metrics.purge_expired(ttl_hours)
            + self.wind.purge_expired(ttl_hours)
            + self.daily_forecast.purge_expired(ttl_hours)
            + self.hourly_forecast.purge_expired(ttl_hours)
            + self.moon.purge_expired(ttl_hours)
    }
}

impl Default for EntityCaches {
    fn default() -> Self {
        Self::new()
    }
}
