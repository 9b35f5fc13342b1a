use std::future::Future;

use crate::domain::weather::{
    AirQualityReading, CurrentConditions, ForecastSample, Location, UvIndex,
};
use crate::error::WeatherError;

/// What the air-quality endpoint returned. Both halves may be missing:
/// the provider can omit the pollution record and still report a UV value.
/// The UV value carries its provenance; gateways tag it as they know it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AirQualityPayload {
    pub reading: Option<AirQualityReading>,
    pub uv_index: Option<UvIndex>,
}

/// The proxy endpoints the snapshot builder depends on.
///
/// Implementations map non-2xx responses to [`WeatherError::Upstream`] and
/// transport failures to [`WeatherError::Network`]; they never retry.
pub trait ProviderGateway: Send + Sync {
    fn current_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> impl Future<Output = Result<CurrentConditions, WeatherError>> + Send;

    /// Raw 3-hour samples in provider order.
    fn forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> impl Future<Output = Result<Vec<ForecastSample>, WeatherError>> + Send;

    fn air_quality(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> impl Future<Output = Result<AirQualityPayload, WeatherError>> + Send;

    /// Candidate locations for a free-text query. An empty list is a valid
    /// answer; callers decide whether that means "not found".
    fn geocode(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Location>, WeatherError>> + Send;

    fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> impl Future<Output = Result<Vec<Location>, WeatherError>> + Send;
}
