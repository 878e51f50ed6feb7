//! Upstream weather provider and the cache-or-fetch service in front of it.
//!
//! The provider itself (HTTP calls, geocoding, payload decoding) lives outside
//! this crate; it only has to implement [`WeatherProvider`].

mod service;

use async_trait::async_trait;

use crate::types::weather::{
    City, CurrentReading, DailyForecast, HourlyForecast, Metrics, MoonPhase, Wind,
};
use crate::StratusResult;

pub use service::WeatherService;

/// Source of fresh weather data.
///
/// Implementations report failures as [`crate::StratusError::Upstream`].
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Returns the provider name.
    fn name(&self) -> &str;

    /// Resolves a location name to coordinates.
    async fn geocode(&self, location: &str) -> StratusResult<City>;

    /// Current conditions plus the day's mean temperature.
    async fn current(&self, city: &City) -> StratusResult<CurrentReading>;

    async fn metrics(&self, city: &City) -> StratusResult<Metrics>;

    async fn wind(&self, city: &City) -> StratusResult<Wind>;

    async fn daily_forecast(&self, city: &City) -> StratusResult<DailyForecast>;

    async fn hourly_forecast(&self, city: &City) -> StratusResult<HourlyForecast>;

    /// Moon phase; not tied to a location.
    async fn moon(&self) -> StratusResult<MoonPhase>;
}
