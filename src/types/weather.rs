//! Weather entities returned by the upstream provider and held in the entity caches.
//!
//! Values are kept in provider units (metric). Display formatting belongs to
//! whatever layer renders them.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// A geocoded location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Current conditions of a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    pub date: NaiveDate,
    pub temperature: f64,
    pub min: f64,
    pub max: f64,
    pub condition: String,
    pub feels_like: f64,
    #[serde(default)]
    pub alerts: Vec<WeatherAlert>,
}

/// An active weather alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherAlert {
    pub event: String,
    pub start: chrono::NaiveDateTime,
    pub end: chrono::NaiveDateTime,
    pub description: String,
}

/// What a current-conditions fetch yields: the conditions plus the day's
/// mean temperature, which feeds the statistic store.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentReading {
    pub conditions: CurrentConditions,
    pub mean_daily_temperature: f64,
}

/// Humidity, pressure and similar miscellaneous values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    /// Relative humidity, percent.
    pub humidity: f64,
    /// Sea level pressure, hPa.
    pub pressure: f64,
    pub dew_point: f64,
    pub uv_index: f64,
    /// Visibility, km.
    pub visibility: f64,
}

/// Wind of a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wind {
    /// Meteorological direction the wind blows from, degrees.
    pub direction_degrees: f64,
    /// Speed, m/s.
    pub speed: f64,
}

/// Forecast for a single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecastEntry {
    pub date: NaiveDate,
    pub min: f64,
    pub max: f64,
    pub condition: String,
    pub feels_like: f64,
    pub wind: Wind,
    pub rain_probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DailyForecast {
    pub forecast: Vec<DailyForecastEntry>,
}

/// Forecast for a single hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyForecastEntry {
    pub time: NaiveTime,
    pub temperature: f64,
    pub condition: String,
    pub wind: Wind,
    pub rain_probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HourlyForecast {
    pub forecast: Vec<HourlyForecastEntry>,
}

/// Moon phase; the same for every location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoonPhase {
    pub phase: String,
    /// Lunation progress, percent.
    pub percentage: f64,
}
