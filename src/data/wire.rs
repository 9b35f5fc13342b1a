//! JSON bodies exchanged with the proxy and the upstream provider.

use serde::{Deserialize, Serialize};

use crate::domain::weather::{
    AirComponents, AirQualityReading, CurrentConditions, ForecastSample, Location,
    WeatherAlert, WeatherCondition, ms_to_kmh, unix_to_local, unix_to_utc,
};
use crate::error::WeatherError;

const DEFAULT_ALERT_EVENT: &str = "Weather Alert";
const DEFAULT_ALERT_DESCRIPTION: &str = "No details available";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionBody {
    #[serde(default)]
    pub main: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

impl From<ConditionBody> for WeatherCondition {
    fn from(body: ConditionBody) -> Self {
        Self {
            main: body.main,
            description: body.description,
            icon: body.icon,
        }
    }
}

fn unknown_condition() -> ConditionBody {
    ConditionBody {
        main: "Unknown".to_string(),
        description: "unknown".to_string(),
        icon: String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertBody {
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "sender_name", skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
}

impl From<AlertBody> for WeatherAlert {
    fn from(body: AlertBody) -> Self {
        Self {
            event: body
                .event
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| DEFAULT_ALERT_EVENT.to_string()),
            description: body
                .description
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| DEFAULT_ALERT_DESCRIPTION.to_string()),
            sender: body.sender,
            start: body.start.and_then(unix_to_utc),
            end: body.end.and_then(unix_to_utc),
        }
    }
}

/// Normalized current weather as served by `/weather`: metric
/// temperatures, wind in km/h, unix-second sun times and the location's
/// UTC offset in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeatherBody {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    pub temp: f32,
    pub feels_like: f32,
    pub humidity: f32,
    pub pressure: f32,
    #[serde(default)]
    pub visibility: Option<f32>,
    pub wind_speed: f32,
    #[serde(default)]
    pub wind_deg: f32,
    #[serde(default)]
    pub clouds: Option<f32>,
    pub weather: ConditionBody,
    #[serde(default)]
    pub sunrise: Option<i64>,
    #[serde(default)]
    pub sunset: Option<i64>,
    #[serde(default)]
    pub timezone: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alerts: Vec<AlertBody>,
}

impl From<CurrentWeatherBody> for CurrentConditions {
    fn from(body: CurrentWeatherBody) -> Self {
        Self {
            name: body.name,
            country: body.country,
            temperature_c: body.temp,
            feels_like_c: body.feels_like,
            humidity: body.humidity,
            pressure_hpa: body.pressure,
            visibility_m: body.visibility,
            wind_speed_kmh: body.wind_speed,
            wind_direction_deg: body.wind_deg,
            cloud_cover: body.clouds,
            condition: body.weather.into(),
            sunrise: body.sunrise.and_then(unix_to_utc),
            sunset: body.sunset.and_then(unix_to_utc),
            utc_offset_secs: body.timezone,
            alerts: body.alerts.into_iter().map(WeatherAlert::from).collect(),
        }
    }
}

/// Provider current-weather payload, before normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderCurrent {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sys: ProviderSys,
    pub main: ProviderMain,
    #[serde(default)]
    pub visibility: Option<f32>,
    #[serde(default)]
    pub wind: WindBody,
    #[serde(default)]
    pub clouds: Option<CloudsBody>,
    #[serde(default)]
    pub weather: Vec<ConditionBody>,
    #[serde(default)]
    pub timezone: i32,
    #[serde(default)]
    pub alerts: Vec<AlertBody>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderSys {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub sunrise: Option<i64>,
    #[serde(default)]
    pub sunset: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderMain {
    pub temp: f32,
    pub feels_like: f32,
    #[serde(default)]
    pub humidity: f32,
    #[serde(default)]
    pub pressure: f32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindBody {
    #[serde(default)]
    pub speed: f32,
    #[serde(default)]
    pub deg: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloudsBody {
    #[serde(default)]
    pub all: f32,
}

impl ProviderCurrent {
    #[must_use]
    pub fn normalize(self) -> CurrentWeatherBody {
        let weather = self
            .weather
            .into_iter()
            .next()
            .unwrap_or_else(unknown_condition);
        CurrentWeatherBody {
            name: self.name,
            country: self.sys.country,
            temp: self.main.temp,
            feels_like: self.main.feels_like,
            humidity: self.main.humidity,
            pressure: self.main.pressure,
            visibility: self.visibility,
            wind_speed: ms_to_kmh(self.wind.speed),
            wind_deg: self.wind.deg,
            clouds: self.clouds.map(|c| c.all),
            weather,
            sunrise: self.sys.sunrise,
            sunset: self.sys.sunset,
            timezone: self.timezone,
            alerts: self.alerts,
        }
    }
}

/// `/forecast` body: the provider's 5-day/3-hour list, passed through.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastBody {
    pub list: Vec<ForecastItem>,
    #[serde(default)]
    pub city: Option<CityBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastItem {
    pub dt: i64,
    pub main: ForecastMain,
    #[serde(default)]
    pub weather: Vec<ConditionBody>,
    #[serde(default)]
    pub pop: f32,
    #[serde(default)]
    pub wind: WindBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastMain {
    pub temp: f32,
    pub feels_like: f32,
    #[serde(default)]
    pub humidity: f32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CityBody {
    #[serde(default)]
    pub timezone: i32,
}

impl ForecastBody {
    /// Samples in provider order, stamped with the city's UTC offset so the
    /// local calendar day can be read straight off each timestamp. Records
    /// with an unrepresentable `dt` are skipped.
    #[must_use]
    pub fn into_samples(self) -> Vec<ForecastSample> {
        let offset = self.city.map(|c| c.timezone).unwrap_or_default();
        self.list
            .into_iter()
            .filter_map(|item| {
                let timestamp = unix_to_local(item.dt, offset)?;
                let condition = item
                    .weather
                    .into_iter()
                    .next()
                    .unwrap_or_else(unknown_condition)
                    .into();
                Some(ForecastSample {
                    timestamp,
                    temperature_c: item.main.temp,
                    feels_like_c: item.main.feels_like,
                    condition,
                    precipitation_probability: item.pop.clamp(0.0, 1.0),
                    humidity: item.main.humidity,
                    wind_speed_kmh: ms_to_kmh(item.wind.speed),
                    wind_direction_deg: item.wind.deg,
                })
            })
            .collect()
    }
}

/// `/air-quality` body. `airQuality` is the provider's first pollution
/// record or null.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirQualityBody {
    #[serde(default)]
    pub air_quality: Option<PollutionEntry>,
    #[serde(default)]
    pub uv_index: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollutionEntry {
    #[serde(default)]
    pub main: PollutionMain,
    #[serde(default)]
    pub components: AirComponents,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PollutionMain {
    #[serde(default)]
    pub aqi: Option<u8>,
}

impl From<PollutionEntry> for AirQualityReading {
    fn from(entry: PollutionEntry) -> Self {
        Self {
            aqi: entry.main.aqi.filter(|aqi| *aqi > 0).unwrap_or(1),
            components: entry.components,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl TryFrom<GeocodeEntry> for Location {
    type Error = WeatherError;

    fn try_from(entry: GeocodeEntry) -> Result<Self, Self::Error> {
        let mut location = Location::new(entry.lat, entry.lon)?;
        if !entry.name.is_empty() {
            location = location.named(entry.name, entry.country);
        }
        location.region = entry.state;
        Ok(location)
    }
}
