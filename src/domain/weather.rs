use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::metrics::{self, Banding};
use crate::error::WeatherError;

mod conditions;
mod conversions;

pub use conditions::*;
pub use conversions::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TempUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedUnit {
    #[default]
    Kmh,
    Mph,
}

/// Display units, applied only when formatting. Snapshots always hold
/// metric values so toggling never needs a re-fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnitPreference {
    pub temp: TempUnit,
    pub speed: SpeedUnit,
}

impl UnitPreference {
    pub fn toggle_temp(&mut self) {
        self.temp = match self.temp {
            TempUnit::Celsius => TempUnit::Fahrenheit,
            TempUnit::Fahrenheit => TempUnit::Celsius,
        };
    }

    pub fn toggle_speed(&mut self) {
        self.speed = match self.speed {
            SpeedUnit::Kmh => SpeedUnit::Mph,
            SpeedUnit::Mph => SpeedUnit::Kmh,
        };
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl Location {
    /// Validated constructor; rejects non-finite or out-of-range coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, WeatherError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(WeatherError::InvalidInput(format!(
                "latitude {latitude} outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherError::InvalidInput(format!(
                "longitude {longitude} outside [-180, 180]"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
            name: None,
            country: None,
            region: None,
        })
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>, country: Option<String>) -> Self {
        self.name = Some(name.into());
        self.country = country;
        self
    }

    #[must_use]
    pub fn display_name(&self) -> String {
        match (&self.name, &self.country) {
            (Some(name), Some(country)) => format!("{name}, {country}"),
            (Some(name), None) => name.clone(),
            _ => format!("{:.4}, {:.4}", self.latitude, self.longitude),
        }
    }
}

/// Provider condition group (`main`, e.g. "Rain") plus its free-text detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub main: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

impl WeatherCondition {
    #[must_use]
    pub fn theme(&self) -> ConditionTheme {
        condition_theme(&self.main)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherAlert {
    pub event: String,
    pub description: String,
    pub sender: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub name: String,
    pub country: Option<String>,
    pub temperature_c: f32,
    pub feels_like_c: f32,
    pub humidity: f32,
    pub pressure_hpa: f32,
    pub visibility_m: Option<f32>,
    pub wind_speed_kmh: f32,
    pub wind_direction_deg: f32,
    pub cloud_cover: Option<f32>,
    pub condition: WeatherCondition,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
    pub utc_offset_secs: i32,
    pub alerts: Vec<WeatherAlert>,
}

impl CurrentConditions {
    #[must_use]
    pub fn utc_offset(&self) -> FixedOffset {
        offset_from_secs(self.utc_offset_secs)
    }
}

/// One 3-hour provider record. `timestamp` carries the location's UTC
/// offset, so `timestamp.date_naive()` is the local calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub timestamp: DateTime<FixedOffset>,
    pub temperature_c: f32,
    pub feels_like_c: f32,
    pub condition: WeatherCondition,
    /// Probability of precipitation in `[0, 1]`.
    pub precipitation_probability: f32,
    pub humidity: f32,
    pub wind_speed_kmh: f32,
    pub wind_direction_deg: f32,
}

impl ForecastSample {
    #[must_use]
    pub fn precipitation_percent(&self) -> f32 {
        self.precipitation_probability * 100.0
    }
}

/// Hourly points are forecast samples carried forward untouched.
pub type HourlyPoint = ForecastSample;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub min_temp_c: f32,
    pub max_temp_c: f32,
    pub avg_feels_like_c: f32,
    pub representative_weather: WeatherCondition,
    /// Mean probability of precipitation as a percentage.
    pub avg_precipitation_probability: f32,
    pub avg_humidity: f32,
    pub sample_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirComponents {
    pub co: Option<f32>,
    pub no: Option<f32>,
    pub no2: Option<f32>,
    pub o3: Option<f32>,
    pub so2: Option<f32>,
    pub pm2_5: Option<f32>,
    pub pm10: Option<f32>,
    pub nh3: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualityReading {
    /// Provider index, nominally 1 (good) to 5 (very poor).
    pub aqi: u8,
    pub components: AirComponents,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UvSource {
    Measured,
    Heuristic,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UvIndex {
    pub value: f32,
    pub source: UvSource,
}

impl UvIndex {
    #[must_use]
    pub fn measured(value: f32) -> Self {
        Self {
            value,
            source: UvSource::Measured,
        }
    }

    /// A value someone else already estimated, such as the proxy's
    /// `uvIndex`.
    #[must_use]
    pub fn estimated(value: f32) -> Self {
        Self {
            value,
            source: UvSource::Heuristic,
        }
    }

    /// Latitude/hour estimate; see [`metrics::heuristic_uv`].
    #[must_use]
    pub fn heuristic(latitude: f64, hour_utc: u32) -> Self {
        Self {
            value: metrics::heuristic_uv(latitude, hour_utc),
            source: UvSource::Heuristic,
        }
    }

    #[must_use]
    pub fn is_estimate(&self) -> bool {
        self.source == UvSource::Heuristic
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: Location,
    pub current: CurrentConditions,
    pub hourly: Vec<HourlyPoint>,
    pub daily: Vec<DailySummary>,
    pub air_quality: Option<AirQualityReading>,
    pub uv_index: UvIndex,
    pub alerts: Vec<WeatherAlert>,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    #[must_use]
    pub fn current_temp(&self, units: TempUnit) -> f32 {
        to_display_temp(self.current.temperature_c, units)
    }

    /// `None` when humidity is not positive, where the Magnus formula is undefined.
    #[must_use]
    pub fn dew_point_c(&self) -> Option<f32> {
        (self.current.humidity > 0.0)
            .then(|| metrics::dew_point(self.current.temperature_c, self.current.humidity))
    }

    #[must_use]
    pub fn day_progress(&self, now: DateTime<Utc>) -> Option<f32> {
        let sunrise = self.current.sunrise?;
        let sunset = self.current.sunset?;
        Some(metrics::day_progress_fraction(now, sunrise, sunset))
    }

    #[must_use]
    pub fn aqi_band(&self) -> Option<Banding> {
        self.air_quality
            .as_ref()
            .map(|reading| metrics::aqi_band(i32::from(reading.aqi)))
    }

    #[must_use]
    pub fn uv_band(&self) -> Banding {
        metrics::uvi_band(self.uv_index.value)
    }
}
