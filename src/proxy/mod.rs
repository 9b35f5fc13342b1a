//! Credential-hiding proxy in front of the weather provider.
//!
//! Each route forwards a GET to the provider with the server-side API key
//! appended and answers with the provider payload (normalized for current
//! weather). Every response carries permissive CORS headers.

pub mod error;
pub mod handlers;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    Router,
    http::{HeaderName, HeaderValue, header},
    middleware::map_response,
    response::Response,
    routing::any,
};
use reqwest::Client;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ProxyConfig;
use crate::data::http::http_client;

const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

const CORS_HEADERS: [(HeaderName, &str); 4] = [
    (header::ACCESS_CONTROL_ALLOW_CREDENTIALS, "true"),
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "GET,OPTIONS"),
    (
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        "X-CSRF-Token, X-Requested-With, Accept, Accept-Version, Content-Length, Content-MD5, Content-Type, Date, X-Api-Version",
    ),
];

#[derive(Clone)]
pub struct ProxyState {
    pub config: Arc<ProxyConfig>,
    pub client: Client,
}

impl ProxyState {
    pub fn new(config: ProxyConfig) -> Self {
        Self {
            config: Arc::new(config),
            client: http_client(UPSTREAM_TIMEOUT),
        }
    }
}

pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route("/api/weather", any(handlers::weather))
        .route("/api/forecast", any(handlers::forecast))
        .route("/api/air-quality", any(handlers::air_quality))
        .route("/api/geocode", any(handlers::geocode))
        .route("/api/geocode/reverse", any(handlers::geocode))
        .layer(map_response(with_cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn with_cors(mut response: Response) -> Response {
    let headers = response.headers_mut();
    for (name, value) in CORS_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    response
}

/// Binds `config.bind` and serves until Ctrl-C.
pub async fn serve(config: ProxyConfig) -> anyhow::Result<()> {
    let bind = config.bind;
    if config.api_key.is_none() {
        tracing::warn!("no provider API key configured; requests will fail with 500");
    }
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("binding proxy to {bind} failed"))?;
    info!(%bind, upstream = %config.upstream_url, "proxy listening");

    axum::serve(listener, router(ProxyState::new(config)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("proxy server failed")
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down proxy");
    }
}
