use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

use crate::data::gateway::{AirQualityPayload, ProviderGateway};
use crate::domain::aggregate::{bucket_daily, bucket_hourly};
use crate::domain::weather::{
    AirComponents, AirQualityReading, CurrentConditions, ForecastSample, Location, UvIndex,
    WeatherCondition, WeatherSnapshot,
};
use crate::error::WeatherError;

pub(crate) const BENIN_OFFSET_SECS: i32 = 3_600;

pub(crate) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 12, 12, 0, 0)
        .single()
        .expect("valid fixture instant")
}

pub(crate) fn benin_location() -> Location {
    Location::new(6.335, 5.627)
        .expect("valid fixture coordinates")
        .named("Benin City", Some("NG".to_string()))
}

pub(crate) fn condition(main: &str, description: &str, icon: &str) -> WeatherCondition {
    WeatherCondition {
        main: main.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
    }
}

pub(crate) fn sample_current() -> CurrentConditions {
    CurrentConditions {
        name: "Benin City".to_string(),
        country: Some("NG".to_string()),
        temperature_c: 24.0,
        feels_like_c: 25.5,
        humidity: 70.0,
        pressure_hpa: 1011.0,
        visibility_m: Some(9_000.0),
        wind_speed_kmh: 12.0,
        wind_direction_deg: 225.0,
        cloud_cover: Some(40.0),
        condition: condition("Clouds", "scattered clouds", "03d"),
        sunrise: Some(fixed_now() - chrono::Duration::hours(5)),
        sunset: Some(fixed_now() + chrono::Duration::hours(7)),
        utc_offset_secs: BENIN_OFFSET_SECS,
        alerts: Vec::new(),
    }
}

/// `count` 3-hour samples starting at local midnight of 2026-02-12 (UTC+1).
pub(crate) fn sample_forecast(count: usize) -> Vec<ForecastSample> {
    let offset = FixedOffset::east_opt(BENIN_OFFSET_SECS).expect("valid offset");
    let start = offset
        .with_ymd_and_hms(2026, 2, 12, 0, 0, 0)
        .single()
        .expect("valid fixture start");
    (0..count)
        .map(|idx| {
            let step = i64::try_from(idx).expect("small index");
            ForecastSample {
                timestamp: start + chrono::Duration::hours(step * 3),
                temperature_c: 22.0 + (idx % 8) as f32,
                feels_like_c: 23.0 + (idx % 8) as f32,
                condition: condition("Clouds", "broken clouds", "04d"),
                precipitation_probability: 0.1,
                humidity: 65.0,
                wind_speed_kmh: 10.0,
                wind_direction_deg: 200.0,
            }
        })
        .collect()
}

pub(crate) fn sample_air_quality() -> AirQualityReading {
    AirQualityReading {
        aqi: 2,
        components: AirComponents {
            pm2_5: Some(11.2),
            pm10: Some(20.5),
            ..AirComponents::default()
        },
    }
}

pub(crate) fn sample_snapshot() -> WeatherSnapshot {
    let forecast = sample_forecast(40);
    WeatherSnapshot {
        location: benin_location(),
        current: sample_current(),
        hourly: bucket_hourly(&forecast),
        daily: bucket_daily(&forecast),
        air_quality: Some(sample_air_quality()),
        uv_index: UvIndex::measured(5.0),
        alerts: Vec::new(),
        fetched_at: fixed_now(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct CallCounts {
    pub current: usize,
    pub forecast: usize,
    pub air_quality: usize,
    pub geocode: usize,
    pub reverse_geocode: usize,
}

/// In-memory gateway with canned responses and per-endpoint call counters.
pub(crate) struct ScriptedGateway {
    current: Result<CurrentConditions, WeatherError>,
    forecast: Result<Vec<ForecastSample>, WeatherError>,
    air_quality: Result<AirQualityPayload, WeatherError>,
    places: Vec<Location>,
    delays: Vec<(f64, Duration)>,
    current_calls: AtomicUsize,
    forecast_calls: AtomicUsize,
    air_quality_calls: AtomicUsize,
    geocode_calls: AtomicUsize,
    reverse_calls: AtomicUsize,
}

impl ScriptedGateway {
    pub(crate) fn healthy() -> Self {
        Self {
            current: Ok(sample_current()),
            forecast: Ok(sample_forecast(40)),
            air_quality: Ok(AirQualityPayload {
                reading: Some(sample_air_quality()),
                uv_index: Some(UvIndex::measured(6.2)),
            }),
            places: vec![benin_location()],
            delays: Vec::new(),
            current_calls: AtomicUsize::new(0),
            forecast_calls: AtomicUsize::new(0),
            air_quality_calls: AtomicUsize::new(0),
            geocode_calls: AtomicUsize::new(0),
            reverse_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_current_error(mut self, err: WeatherError) -> Self {
        self.current = Err(err);
        self
    }

    pub(crate) fn with_forecast_error(mut self, err: WeatherError) -> Self {
        self.forecast = Err(err);
        self
    }

    pub(crate) fn with_air_quality(mut self, payload: AirQualityPayload) -> Self {
        self.air_quality = Ok(payload);
        self
    }

    pub(crate) fn with_air_quality_error(mut self, err: WeatherError) -> Self {
        self.air_quality = Err(err);
        self
    }

    pub(crate) fn with_places(mut self, places: Vec<Location>) -> Self {
        self.places = places;
        self
    }

    /// Current-weather calls for `latitude` sleep before answering.
    pub(crate) fn with_delay(mut self, latitude: f64, delay: Duration) -> Self {
        self.delays.push((latitude, delay));
        self
    }

    pub(crate) fn calls(&self) -> CallCounts {
        CallCounts {
            current: self.current_calls.load(Ordering::SeqCst),
            forecast: self.forecast_calls.load(Ordering::SeqCst),
            air_quality: self.air_quality_calls.load(Ordering::SeqCst),
            geocode: self.geocode_calls.load(Ordering::SeqCst),
            reverse_geocode: self.reverse_calls.load(Ordering::SeqCst),
        }
    }

    fn delay_for(&self, latitude: f64) -> Option<Duration> {
        self.delays
            .iter()
            .find_map(|(lat, delay)| ((lat - latitude).abs() < 1e-9).then_some(*delay))
    }
}

impl ProviderGateway for ScriptedGateway {
    async fn current_weather(
        &self,
        latitude: f64,
        _longitude: f64,
    ) -> Result<CurrentConditions, WeatherError> {
        self.current_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay_for(latitude) {
            tokio::time::sleep(delay).await;
        }
        self.current.clone()
    }

    async fn forecast(
        &self,
        _latitude: f64,
        _longitude: f64,
    ) -> Result<Vec<ForecastSample>, WeatherError> {
        self.forecast_calls.fetch_add(1, Ordering::SeqCst);
        self.forecast.clone()
    }

    async fn air_quality(
        &self,
        _latitude: f64,
        _longitude: f64,
    ) -> Result<AirQualityPayload, WeatherError> {
        self.air_quality_calls.fetch_add(1, Ordering::SeqCst);
        self.air_quality.clone()
    }

    async fn geocode(&self, _query: &str) -> Result<Vec<Location>, WeatherError> {
        self.geocode_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.places.clone())
    }

    async fn reverse_geocode(
        &self,
        _latitude: f64,
        _longitude: f64,
    ) -> Result<Vec<Location>, WeatherError> {
        self.reverse_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.places.iter().take(1).cloned().collect())
    }
}
