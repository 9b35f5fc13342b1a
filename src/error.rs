use thiserror::Error;

/// Typed failure of the aggregation core.
///
/// Kept `Clone` so it can travel through the session event channel and be
/// republished to subscribers without boxing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("upstream returned status {status}")]
    Upstream { status: u16 },

    #[error("location not found: {0}")]
    LocationNotFound(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

impl WeatherError {
    /// Whether a caller-driven retry has a chance of succeeding.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Upstream { status } => *status >= 500 || *status == 429,
            Self::InvalidInput(_)
            | Self::Configuration(_)
            | Self::LocationNotFound(_)
            | Self::MalformedPayload(_) => false,
        }
    }

    #[must_use]
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::Upstream {
                status: status.as_u16(),
            };
        }
        if err.is_decode() {
            return Self::MalformedPayload(err.to_string());
        }
        Self::Network(err.to_string())
    }
}
