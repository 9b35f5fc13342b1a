use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{Timelike, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use super::ProxyState;
use super::error::ProxyError;
use crate::data::wire::{CurrentWeatherBody, ProviderCurrent};
use crate::domain::metrics::heuristic_uv;

type Params = HashMap<String, String>;

const WEATHER_PATH: &str = "/data/2.5/weather";
const FORECAST_PATH: &str = "/data/2.5/forecast";
const AIR_POLLUTION_PATH: &str = "/data/2.5/air_pollution";
const DIRECT_GEOCODE_PATH: &str = "/geo/1.0/direct";
const REVERSE_GEOCODE_PATH: &str = "/geo/1.0/reverse";

/// OPTIONS is answered with an empty 200, anything but GET with 405.
fn preflight(method: &Method) -> Option<Response> {
    if *method == Method::OPTIONS {
        return Some(StatusCode::OK.into_response());
    }
    if *method != Method::GET {
        return Some(ProxyError::MethodNotAllowed.into_response());
    }
    None
}

fn param<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn coordinates(params: &Params) -> Option<(f64, f64)> {
    let lat = param(params, "lat")?.parse::<f64>().ok()?;
    let lon = param(params, "lon")?.parse::<f64>().ok()?;
    (lat.is_finite() && lon.is_finite()).then_some((lat, lon))
}

fn required_coordinates(params: &Params) -> Result<(f64, f64), ProxyError> {
    coordinates(params).ok_or(ProxyError::MissingCoordinates)
}

fn api_key(state: &ProxyState) -> Result<&str, ProxyError> {
    state.config.api_key.as_deref().ok_or_else(|| {
        error!("provider API key is not configured");
        ProxyError::MissingApiKey
    })
}

fn transport_failure(err: reqwest::Error) -> ProxyError {
    // Drop the URL: it carries the credential in its query string.
    error!(error = %err.without_url(), "upstream request failed");
    ProxyError::Internal
}

/// Sends `GET {upstream}{path}` with `appid` appended and returns the raw
/// response, whatever its status.
async fn upstream_get(
    state: &ProxyState,
    path: &str,
    key: &str,
    query: &[(&str, String)],
) -> Result<reqwest::Response, ProxyError> {
    let url = format!("{}{path}", state.config.upstream_url);
    debug!(path, "forwarding to provider");
    state
        .client
        .get(&url)
        .query(query)
        .query(&[("appid", key)])
        .send()
        .await
        .map_err(transport_failure)
}

async fn reject_upstream(
    response: reqwest::Response,
    message: &'static str,
) -> ProxyError {
    let status = response.status();
    let detail = response.text().await.unwrap_or_default();
    error!(status = status.as_u16(), detail = %detail, "{}", message);
    ProxyError::Upstream {
        status: StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY),
        message,
    }
}

fn coordinate_query(lat: f64, lon: f64) -> Vec<(&'static str, String)> {
    vec![("lat", lat.to_string()), ("lon", lon.to_string())]
}

pub async fn weather(
    State(state): State<ProxyState>,
    method: Method,
    Query(params): Query<Params>,
) -> Response {
    if let Some(response) = preflight(&method) {
        return response;
    }
    current_weather(&state, &params).await.into_response()
}

async fn current_weather(
    state: &ProxyState,
    params: &Params,
) -> Result<Json<CurrentWeatherBody>, ProxyError> {
    let (lat, lon) = required_coordinates(params)?;
    let key = api_key(state)?;

    let mut query = coordinate_query(lat, lon);
    query.push(("units", "metric".to_string()));
    let response = upstream_get(state, WEATHER_PATH, key, &query).await?;
    if !response.status().is_success() {
        return Err(reject_upstream(response, "Weather API error").await);
    }
    let current: ProviderCurrent = response.json().await.map_err(transport_failure)?;
    Ok(Json(current.normalize()))
}

pub async fn forecast(
    State(state): State<ProxyState>,
    method: Method,
    Query(params): Query<Params>,
) -> Response {
    if let Some(response) = preflight(&method) {
        return response;
    }
    forecast_passthrough(&state, &params).await.into_response()
}

async fn forecast_passthrough(
    state: &ProxyState,
    params: &Params,
) -> Result<Json<Value>, ProxyError> {
    let (lat, lon) = required_coordinates(params)?;
    let key = api_key(state)?;

    let mut query = coordinate_query(lat, lon);
    query.push(("units", "metric".to_string()));
    let response = upstream_get(state, FORECAST_PATH, key, &query).await?;
    if !response.status().is_success() {
        return Err(reject_upstream(response, "Forecast API error").await);
    }
    Ok(Json(response.json().await.map_err(transport_failure)?))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AirQualityResponse {
    air_quality: Option<Value>,
    uv_index: f32,
}

pub async fn air_quality(
    State(state): State<ProxyState>,
    method: Method,
    Query(params): Query<Params>,
) -> Response {
    if let Some(response) = preflight(&method) {
        return response;
    }
    match air_quality_with_uv(&state, &params).await {
        Ok(body) => body.into_response(),
        Err(ProxyError::MissingCoordinates) => ProxyError::MissingCoordinates.into_response(),
        Err(err) => err.with_air_fallback().into_response(),
    }
}

/// Provider pollution reading (first list entry) plus the estimated UV
/// index. A provider error still answers 200 with `airQuality: null`.
async fn air_quality_with_uv(
    state: &ProxyState,
    params: &Params,
) -> Result<Json<AirQualityResponse>, ProxyError> {
    let (lat, lon) = required_coordinates(params)?;
    let key = api_key(state)?;

    let response =
        upstream_get(state, AIR_POLLUTION_PATH, key, &coordinate_query(lat, lon)).await?;
    let air_quality = if response.status().is_success() {
        let payload: Value = response.json().await.map_err(transport_failure)?;
        first_pollution_entry(payload)
    } else {
        warn!(
            status = response.status().as_u16(),
            "air pollution lookup failed, answering without a reading"
        );
        None
    };

    Ok(Json(AirQualityResponse {
        air_quality,
        uv_index: heuristic_uv(lat, Utc::now().hour()),
    }))
}

fn first_pollution_entry(payload: Value) -> Option<Value> {
    match payload {
        Value::Object(mut body) => match body.remove("list") {
            Some(Value::Array(list)) => list.into_iter().next(),
            _ => None,
        },
        _ => None,
    }
}

pub async fn geocode(
    State(state): State<ProxyState>,
    method: Method,
    Query(params): Query<Params>,
) -> Response {
    if let Some(response) = preflight(&method) {
        return response;
    }
    geocode_lookup(&state, &params).await.into_response()
}

/// Text search (`q`, up to 5 matches) or reverse lookup (`lat`/`lon`, one
/// match). The credential is checked before the parameters.
async fn geocode_lookup(state: &ProxyState, params: &Params) -> Result<Json<Value>, ProxyError> {
    let key = api_key(state)?;

    let (path, query, failure) = if let Some(q) = param(params, "q") {
        (
            DIRECT_GEOCODE_PATH,
            vec![("q", q.to_string()), ("limit", "5".to_string())],
            "Geocoding failed",
        )
    } else if let Some((lat, lon)) = coordinates(params) {
        let mut query = coordinate_query(lat, lon);
        query.push(("limit", "1".to_string()));
        (REVERSE_GEOCODE_PATH, query, "Reverse geocoding failed")
    } else {
        return Err(ProxyError::MissingGeocodeQuery);
    };

    let response = upstream_get(state, path, key, &query).await?;
    if !response.status().is_success() {
        return Err(reject_upstream(response, failure).await);
    }
    Ok(Json(response.json().await.map_err(transport_failure)?))
}
