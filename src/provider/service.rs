//! Cache-or-fetch flow for every weather entity.

use std::future::Future;
use std::sync::Arc;

use crate::cache::{normalize_key, EntityCache, EntityCaches, MOON_KEY};
use crate::clock::{Clock, SystemClock};
use crate::statistics::StatisticStore;
use crate::types::config::CacheConfig;
use crate::types::weather::{
    City, CurrentConditions, DailyForecast, HourlyForecast, Metrics, MoonPhase, Wind,
};
use crate::{StratusError, StratusResult};

use super::WeatherProvider;

/// Serves weather entities from the caches, falling back to the provider.
///
/// Current-conditions fetches also append the day's mean temperature to the
/// statistic store. The cache write and the sample write are independent: a
/// rejected sample does not fail the request.
pub struct WeatherService<P> {
    provider: P,
    caches: Arc<EntityCaches>,
    store: Arc<StatisticStore>,
    clock: Arc<dyn Clock>,
    ttl_hours: u32,
}

impl<P: WeatherProvider> WeatherService<P> {
    pub fn new(
        provider: P,
        caches: Arc<EntityCaches>,
        store: Arc<StatisticStore>,
        config: &CacheConfig,
    ) -> Self {
        Self::with_clock(provider, caches, store, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        provider: P,
        caches: Arc<EntityCaches>,
        store: Arc<StatisticStore>,
        config: &CacheConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            provider,
            caches,
            store,
            clock,
            ttl_hours: config.ttl_hours,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn caches(&self) -> &Arc<EntityCaches> {
        &self.caches
    }

    /// Current conditions of `location`.
    pub async fn current(&self, location: &str) -> StratusResult<CurrentConditions> {
        let key = Self::location_key(location)?;
        if let Some(cached) = self.caches.current.get(&key, self.ttl_hours) {
            return Ok(cached);
        }

        let city = self.provider.geocode(location).await?;
        let reading = self.provider.current(&city).await?;
        self.caches.current.put(&key, reading.conditions.clone());

        let today = self.clock.today();
        if let Err(e) = self
            .store
            .record(&key, today, reading.mean_daily_temperature)
        {
            tracing::warn!(location = %key, error = %e, "failed to record statistic sample");
        }

        Ok(reading.conditions)
    }

    pub async fn metrics(&self, location: &str) -> StratusResult<Metrics> {
        self.cached(&self.caches.metrics, location, |city| async move {
            self.provider.metrics(&city).await
        })
        .await
    }

    pub async fn wind(&self, location: &str) -> StratusResult<Wind> {
        self.cached(&self.caches.wind, location, |city| async move {
            self.provider.wind(&city).await
        })
        .await
    }

    pub async fn daily_forecast(&self, location: &str) -> StratusResult<DailyForecast> {
        self.cached(&self.caches.daily_forecast, location, |city| async move {
            self.provider.daily_forecast(&city).await
        })
        .await
    }

    pub async fn hourly_forecast(&self, location: &str) -> StratusResult<HourlyForecast> {
        self.cached(&self.caches.hourly_forecast, location, |city| async move {
            self.provider.hourly_forecast(&city).await
        })
        .await
    }

    /// Moon phase, cached under a fixed key.
    pub async fn moon(&self) -> StratusResult<MoonPhase> {
        if let Some(cached) = self.caches.moon.get(MOON_KEY, self.ttl_hours) {
            return Ok(cached);
        }

        let moon = self.provider.moon().await?;
        self.caches.moon.put(MOON_KEY, moon.clone());
        Ok(moon)
    }

    async fn cached<T, F, Fut>(
        &self,
        cache: &EntityCache<T>,
        location: &str,
        fetch: F,
    ) -> StratusResult<T>
    where
        T: Clone,
        F: FnOnce(City) -> Fut,
        Fut: Future<Output = StratusResult<T>>,
    {
        let key = Self::location_key(location)?;
        if let Some(cached) = cache.get(&key, self.ttl_hours) {
            return Ok(cached);
        }

        let city = self.provider.geocode(location).await?;
        tracing::debug!(provider = %self.provider.name(), city = %city.name, "fetching from upstream");

        let value = fetch(city).await?;
        cache.put(&key, value.clone());
        Ok(value)
    }

    fn location_key(location: &str) -> StratusResult<String> {
        let key = normalize_key(location);
        if key.is_empty() {
            return Err(StratusError::InvalidLocation);
        }
        Ok(key)
    }
}
