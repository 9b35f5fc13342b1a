use std::num::NonZeroUsize;
use std::time::Duration;

use chrono::{Timelike, Utc};
use lru::LruCache;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::data::gateway::{AirQualityPayload, ProviderGateway};
use crate::domain::weather::{CurrentConditions, ForecastSample, Location, UvIndex};
use crate::error::WeatherError;

pub const CURRENT_TTL: Duration = Duration::from_secs(10 * 60);
pub const FORECAST_TTL: Duration = Duration::from_secs(30 * 60);
pub const AIR_QUALITY_TTL: Duration = Duration::from_secs(60 * 60);
const DEFAULT_CAPACITY: usize = 32;

/// Coordinates rounded to four decimals (~11 m), so a location reached via
/// geocoding and via a favorite share one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CoordKey {
    lat_e4: i64,
    lon_e4: i64,
}

impl CoordKey {
    fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            lat_e4: (latitude * 10_000.0).round() as i64,
            lon_e4: (longitude * 10_000.0).round() as i64,
        }
    }
}

struct Timed<T> {
    value: T,
    stored_at: Instant,
}

struct TtlCache<T> {
    ttl: Duration,
    entries: Mutex<LruCache<CoordKey, Timed<T>>>,
}

impl<T: Clone> TtlCache<T> {
    fn new(ttl: Duration, capacity: NonZeroUsize) -> Self {
        Self {
            ttl,
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    async fn get(&self, key: CoordKey) -> Option<T> {
        let mut entries = self.entries.lock().await;
        let fresh = entries
            .get(&key)
            .map(|entry| (entry.stored_at.elapsed() < self.ttl).then(|| entry.value.clone()));
        match fresh {
            Some(Some(value)) => Some(value),
            Some(None) => {
                entries.pop(&key);
                None
            }
            None => None,
        }
    }

    async fn put(&self, key: CoordKey, value: T) {
        self.entries.lock().await.put(
            key,
            Timed {
                value,
                stored_at: Instant::now(),
            },
        );
    }
}

/// Gateway decorator that remembers successful responses per endpoint and
/// location. Failures are never cached and geocoding always goes through.
pub struct CachingGateway<G> {
    inner: G,
    current: TtlCache<CurrentConditions>,
    forecast: TtlCache<Vec<ForecastSample>>,
    air_quality: TtlCache<AirQualityPayload>,
}

impl<G: ProviderGateway> CachingGateway<G> {
    pub fn new(inner: G) -> Self {
        Self::with_capacity(inner, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(inner: G, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            current: TtlCache::new(CURRENT_TTL, capacity),
            forecast: TtlCache::new(FORECAST_TTL, capacity),
            air_quality: TtlCache::new(AIR_QUALITY_TTL, capacity),
        }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }
}

impl<G: ProviderGateway> ProviderGateway for CachingGateway<G> {
    async fn current_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentConditions, WeatherError> {
        let key = CoordKey::new(latitude, longitude);
        if let Some(hit) = self.current.get(key).await {
            debug!(endpoint = "weather", "cache hit");
            return Ok(hit);
        }
        let value = self.inner.current_weather(latitude, longitude).await?;
        self.current.put(key, value.clone()).await;
        Ok(value)
    }

    async fn forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<ForecastSample>, WeatherError> {
        let key = CoordKey::new(latitude, longitude);
        if let Some(hit) = self.forecast.get(key).await {
            debug!(endpoint = "forecast", "cache hit");
            return Ok(hit);
        }
        let value = self.inner.forecast(latitude, longitude).await?;
        self.forecast.put(key, value.clone()).await;
        Ok(value)
    }

    async fn air_quality(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<AirQualityPayload, WeatherError> {
        let key = CoordKey::new(latitude, longitude);
        if let Some(mut hit) = self.air_quality.get(key).await {
            debug!(endpoint = "air-quality", "cache hit");
            // An estimated UV follows the clock; only the reading keeps for
            // the whole TTL.
            if hit.uv_index.is_some_and(|uv| uv.is_estimate()) {
                hit.uv_index = Some(UvIndex::heuristic(latitude, Utc::now().hour()));
            }
            return Ok(hit);
        }
        let value = self.inner.air_quality(latitude, longitude).await?;
        self.air_quality.put(key, value.clone()).await;
        Ok(value)
    }

    async fn geocode(&self, query: &str) -> Result<Vec<Location>, WeatherError> {
        self.inner.geocode(query).await
    }

    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<Location>, WeatherError> {
        self.inner.reverse_geocode(latitude, longitude).await
    }
}
