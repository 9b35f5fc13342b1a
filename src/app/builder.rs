use std::sync::Arc;

use chrono::{DateTime, Timelike, Utc};
use tracing::{debug, info, warn};

use crate::data::gateway::ProviderGateway;
use crate::domain::aggregate::{bucket_daily, bucket_hourly};
use crate::domain::weather::{Location, UvIndex, WeatherSnapshot};
use crate::error::WeatherError;

/// Where the caller wants weather for.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Coordinates(Location),
    Text(String),
}

/// Receives the display name of every location a snapshot was built for.
pub trait RecentSearchSink: Send + Sync {
    fn record(&self, display_name: &str);
}

/// Resolves locations and merges the three provider datasets into one
/// [`WeatherSnapshot`].
pub struct WeatherSnapshotBuilder<G> {
    gateway: G,
    recent_searches: Option<Arc<dyn RecentSearchSink>>,
}

impl<G: ProviderGateway> WeatherSnapshotBuilder<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            recent_searches: None,
        }
    }

    #[must_use]
    pub fn with_recent_searches(mut self, sink: Arc<dyn RecentSearchSink>) -> Self {
        self.recent_searches = Some(sink);
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub async fn resolve_location(&self, query: LocationQuery) -> Result<Location, WeatherError> {
        match query {
            LocationQuery::Coordinates(location) => {
                Location::new(location.latitude, location.longitude)?;
                Ok(location)
            }
            LocationQuery::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Err(WeatherError::InvalidInput(
                        "location query is empty".to_string(),
                    ));
                }
                debug!(query = text, "geocoding");
                self.gateway
                    .geocode(text)
                    .await?
                    .into_iter()
                    .next()
                    .ok_or_else(|| WeatherError::LocationNotFound(text.to_string()))
            }
        }
    }

    /// Names a coordinate pair using the first reverse-geocoding match.
    pub async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Location, WeatherError> {
        Location::new(latitude, longitude)?;
        self.gateway
            .reverse_geocode(latitude, longitude)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                WeatherError::LocationNotFound(format!("{latitude:.4}, {longitude:.4}"))
            })
    }

    pub async fn fetch(&self, query: LocationQuery) -> Result<WeatherSnapshot, WeatherError> {
        let location = self.resolve_location(query).await?;
        self.build_snapshot(location).await
    }

    pub async fn build_snapshot(&self, location: Location) -> Result<WeatherSnapshot, WeatherError> {
        self.build_snapshot_at(location, Utc::now()).await
    }

    /// Fetches current weather, forecast and air quality concurrently and
    /// merges them once all three have settled.
    ///
    /// Current weather and forecast failures abort the build (current is
    /// reported first when both fail). An air-quality failure is absorbed:
    /// the reading becomes `None` and the UV index falls back to the
    /// heuristic for `now`.
    pub async fn build_snapshot_at(
        &self,
        location: Location,
        now: DateTime<Utc>,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let (lat, lon) = (location.latitude, location.longitude);
        debug!(lat, lon, "fetching snapshot");

        let (current, forecast, air_quality) = futures::join!(
            self.gateway.current_weather(lat, lon),
            self.gateway.forecast(lat, lon),
            self.gateway.air_quality(lat, lon)
        );
        let current = current?;
        let forecast = forecast?;

        let heuristic = || UvIndex::heuristic(lat, now.hour());
        let (air_quality, uv_index) = match air_quality {
            Ok(payload) => (
                payload.reading,
                payload.uv_index.unwrap_or_else(heuristic),
            ),
            Err(err) => {
                warn!(error = %err, "air quality unavailable, estimating UV");
                (None, heuristic())
            }
        };

        let location = if location.name.is_none() && !current.name.is_empty() {
            let country = current.country.clone();
            location.named(current.name.clone(), country)
        } else {
            location
        };

        let snapshot = WeatherSnapshot {
            hourly: bucket_hourly(&forecast),
            daily: bucket_daily(&forecast),
            alerts: current.alerts.clone(),
            location,
            current,
            air_quality,
            uv_index,
            fetched_at: now,
        };

        let display_name = snapshot.location.display_name();
        info!(
            location = %display_name,
            days = snapshot.daily.len(),
            uv_estimated = snapshot.uv_index.is_estimate(),
            "snapshot ready"
        );
        if let Some(sink) = &self.recent_searches {
            sink.record(&display_name);
        }
        Ok(snapshot)
    }
}
