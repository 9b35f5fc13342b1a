use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::data::gateway::{AirQualityPayload, ProviderGateway};
use crate::data::wire::{AirQualityBody, CurrentWeatherBody, ForecastBody, GeocodeEntry};
use crate::domain::weather::{
    AirQualityReading, CurrentConditions, ForecastSample, Location, UvIndex,
};
use crate::error::WeatherError;

pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:3000/api";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// reqwest-backed client for the proxy endpoints.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl Default for HttpGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpGateway {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_GATEWAY_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: http_client(REQUEST_TIMEOUT),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, WeatherError> {
        let url = format!("{}/{endpoint}", self.base_url);
        debug!(endpoint, "gateway request");

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!(endpoint, status = status.as_u16(), "gateway returned non-success");
            return Err(WeatherError::Upstream {
                status: status.as_u16(),
            });
        }
        Ok(response.json().await?)
    }
}

/// Shared builder for outbound clients. Falls back to reqwest defaults when
/// the TLS backend cannot be configured with a timeout.
pub(crate) fn http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

fn coords(latitude: f64, longitude: f64) -> [(&'static str, String); 2] {
    [("lat", latitude.to_string()), ("lon", longitude.to_string())]
}

impl ProviderGateway for HttpGateway {
    async fn current_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentConditions, WeatherError> {
        let body: CurrentWeatherBody = self
            .get_json("weather", &coords(latitude, longitude))
            .await?;
        Ok(body.into())
    }

    async fn forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<ForecastSample>, WeatherError> {
        let body: ForecastBody = self
            .get_json("forecast", &coords(latitude, longitude))
            .await?;
        Ok(body.into_samples())
    }

    async fn air_quality(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<AirQualityPayload, WeatherError> {
        let body: AirQualityBody = self
            .get_json("air-quality", &coords(latitude, longitude))
            .await?;
        // The proxy never has a measured UV source; its value is always the
        // latitude/hour estimate.
        Ok(AirQualityPayload {
            reading: body.air_quality.map(AirQualityReading::from),
            uv_index: body.uv_index.map(UvIndex::estimated),
        })
    }

    async fn geocode(&self, query: &str) -> Result<Vec<Location>, WeatherError> {
        let entries: Vec<GeocodeEntry> = self
            .get_json("geocode", &[("q", query.to_string())])
            .await?;
        Ok(into_locations(entries))
    }

    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<Location>, WeatherError> {
        let entries: Vec<GeocodeEntry> = self
            .get_json("geocode", &coords(latitude, longitude))
            .await?;
        Ok(into_locations(entries))
    }
}

/// Entries with out-of-range coordinates are dropped rather than failing
/// the whole lookup.
fn into_locations(entries: Vec<GeocodeEntry>) -> Vec<Location> {
    entries
        .into_iter()
        .filter_map(|entry| Location::try_from(entry).ok())
        .collect()
}
