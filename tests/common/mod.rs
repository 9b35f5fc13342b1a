#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{Value, json};
use weatherverse::{
    data::http::HttpGateway,
    domain::weather::{Location, WeatherSnapshot},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

pub const BENIN_LAT: f64 = 6.335;
pub const BENIN_LON: f64 = 5.627;
pub const BENIN_OFFSET_SECS: i32 = 3_600;

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 12, 12, 0, 0)
        .single()
        .expect("valid instant")
}

/// 2026-02-12 00:00 at UTC+1.
pub fn local_midnight() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 11, 23, 0, 0)
        .single()
        .expect("valid instant")
}

pub fn benin_location() -> Location {
    Location::new(BENIN_LAT, BENIN_LON)
        .expect("valid coordinates")
        .named("Benin City", Some("NG".to_string()))
}

/// Normalized `/weather` body, as the proxy serves it.
pub fn current_weather_json() -> Value {
    json!({
        "name": "Benin City",
        "country": "NG",
        "temp": 24.0,
        "feelsLike": 25.5,
        "humidity": 70.0,
        "pressure": 1011.0,
        "visibility": 9000.0,
        "windSpeed": 12.0,
        "windDeg": 225.0,
        "clouds": 40.0,
        "weather": {"main": "Clouds", "description": "scattered clouds", "icon": "03d"},
        "sunrise": (fixed_now() - Duration::hours(5)).timestamp(),
        "sunset": (fixed_now() + Duration::hours(7)).timestamp(),
        "timezone": BENIN_OFFSET_SECS
    })
}

/// Raw provider current-weather payload (wind in m/s).
pub fn provider_current_json() -> Value {
    json!({
        "name": "Benin City",
        "sys": {
            "country": "NG",
            "sunrise": (fixed_now() - Duration::hours(5)).timestamp(),
            "sunset": (fixed_now() + Duration::hours(7)).timestamp()
        },
        "main": {"temp": 24.0, "feels_like": 25.5, "humidity": 70, "pressure": 1011},
        "visibility": 9000,
        "wind": {"speed": 5.0, "deg": 225},
        "clouds": {"all": 40},
        "weather": [{"main": "Clouds", "description": "scattered clouds", "icon": "03d"}],
        "timezone": BENIN_OFFSET_SECS
    })
}

pub fn forecast_item(dt: i64, temp: f32, main: &str, pop: f32) -> Value {
    json!({
        "dt": dt,
        "main": {"temp": temp, "feels_like": temp + 1.0, "humidity": 65},
        "weather": [{"main": main, "description": main.to_lowercase(), "icon": "04d"}],
        "pop": pop,
        "wind": {"speed": 3.0, "deg": 200}
    })
}

/// `samples` 3-hour records starting at local midnight; temperatures cycle
/// through 20..28 within each day.
pub fn forecast_json(samples: usize) -> Value {
    let start = local_midnight().timestamp();
    let list: Vec<Value> = (0..samples)
        .map(|idx| {
            let step = i64::try_from(idx).expect("small index");
            forecast_item(start + step * 3 * 3_600, 20.0 + (idx % 8) as f32, "Clouds", 0.2)
        })
        .collect();
    json!({"list": list, "city": {"name": "Benin City", "timezone": BENIN_OFFSET_SECS}})
}

/// Proxy `/air-quality` body.
pub fn air_quality_json(aqi: u8, uv_index: f32) -> Value {
    json!({
        "airQuality": {
            "main": {"aqi": aqi},
            "components": {"co": 201.9, "no2": 0.8, "o3": 68.7, "pm2_5": 11.2, "pm10": 20.5}
        },
        "uvIndex": uv_index
    })
}

/// Raw provider air-pollution payload.
pub fn provider_pollution_json(aqi: u8) -> Value {
    json!({
        "coord": {"lon": BENIN_LON, "lat": BENIN_LAT},
        "list": [{
            "main": {"aqi": aqi},
            "components": {"co": 201.9, "pm2_5": 11.2, "pm10": 20.5},
            "dt": fixed_now().timestamp()
        }]
    })
}

pub fn geocode_json() -> Value {
    json!([
        {"name": "Benin City", "country": "NG", "state": "Edo", "lat": BENIN_LAT, "lon": BENIN_LON},
        {"name": "Benin", "country": "US", "state": "Texas", "lat": 31.5, "lon": -97.1}
    ])
}

pub fn gateway_for(server: &MockServer) -> HttpGateway {
    HttpGateway::with_base_url(format!("{}/api", server.uri()))
}

pub async fn mount_json(server: &MockServer, route: &str, status: u16, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Mounts all gateway endpoints with healthy responses.
pub async fn mount_healthy_gateway(server: &MockServer) {
    mount_json(server, "/api/weather", 200, current_weather_json()).await;
    mount_json(server, "/api/forecast", 200, forecast_json(40)).await;
    mount_json(server, "/api/air-quality", 200, air_quality_json(2, 6.2)).await;
    mount_json(server, "/api/geocode", 200, geocode_json()).await;
}

pub fn assert_consistent(snapshot: &WeatherSnapshot) {
    assert!(snapshot.hourly.len() <= 8);
    assert!(snapshot.daily.len() <= 5);
    for day in &snapshot.daily {
        assert!(day.min_temp_c <= day.max_temp_c, "{day:?}");
    }
}
