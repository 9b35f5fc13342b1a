use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// UV value the air-quality endpoint reports when it cannot compute one.
pub const FALLBACK_UV_INDEX: u8 = 5;

/// Failures the proxy reports to clients. The display text is the exact
/// `error` string of the JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Latitude and longitude are required")]
    MissingCoordinates,

    #[error("Either q or lat/lon parameters are required")]
    MissingGeocodeQuery,

    #[error("Server configuration error")]
    MissingApiKey,

    /// Provider answered with a non-success status, which is passed on.
    #[error("{message}")]
    Upstream {
        status: StatusCode,
        message: &'static str,
    },

    #[error("Internal server error")]
    Internal,
}

impl ProxyError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::MissingCoordinates | Self::MissingGeocodeQuery => StatusCode::BAD_REQUEST,
            Self::MissingApiKey | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream { status, .. } => *status,
        }
    }

    /// Same error, but the body also carries the air-quality fallback
    /// fields.
    #[must_use]
    pub fn with_air_fallback(self) -> AirQualityFailure {
        AirQualityFailure(self)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(flatten)]
    fallback: Option<AirFallback>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AirFallback {
    air_quality: Option<Value>,
    uv_index: u8,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
            fallback: None,
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Air-quality endpoint failure: `{error, airQuality: null, uvIndex: 5}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirQualityFailure(pub ProxyError);

impl IntoResponse for AirQualityFailure {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.0.to_string(),
            fallback: Some(AirFallback {
                air_quality: None,
                uv_index: FALLBACK_UV_INDEX,
            }),
        };
        (self.0.status(), Json(body)).into_response()
    }
}
