//! Proxy configuration from the environment (and `.env`), with CLI overrides.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use crate::cli::ServeArgs;
use crate::error::WeatherError;

pub const API_KEY_VAR: &str = "OPENWEATHER_API_KEY";
pub const UPSTREAM_URL_VAR: &str = "WEATHERVERSE_UPSTREAM_URL";
pub const BIND_VAR: &str = "WEATHERVERSE_BIND";

pub const DEFAULT_UPSTREAM_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_BIND: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 3000));

#[derive(Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Provider credential. A missing key is not a startup error: each
    /// request answers with a configuration error instead.
    pub api_key: Option<String>,
    pub upstream_url: String,
    pub bind: SocketAddr,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            bind: DEFAULT_BIND,
        }
    }
}

// Hand-written so the credential never reaches a log line.
impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("upstream_url", &self.upstream_url)
            .field("bind", &self.bind)
            .finish()
    }
}

impl ProxyConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, WeatherError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any variable source; empty values count as
    /// unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, WeatherError> {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind = match var(BIND_VAR) {
            Some(raw) => raw.parse().map_err(|_| {
                WeatherError::Configuration(format!("{BIND_VAR} is not a socket address: {raw}"))
            })?,
            None => DEFAULT_BIND,
        };

        Ok(Self {
            api_key: var(API_KEY_VAR),
            upstream_url: var(UPSTREAM_URL_VAR)
                .unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            bind,
        })
    }

    #[must_use]
    pub fn with_overrides(mut self, args: &ServeArgs) -> Self {
        if let Some(bind) = args.bind {
            self.bind = bind;
        }
        if let Some(url) = &args.upstream_url {
            self.upstream_url = url.trim_end_matches('/').to_string();
        }
        self
    }
}
