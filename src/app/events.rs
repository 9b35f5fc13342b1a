use std::time::Duration;

use rand::Rng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::app::builder::LocationQuery;
use crate::app::state::RequestToken;
use crate::domain::weather::WeatherSnapshot;
use crate::error::WeatherError;

pub const MIN_REFRESH_SECS: u64 = 10;
pub const MAX_REFRESH_SECS: u64 = 86_400;

#[derive(Debug)]
pub enum AppEvent {
    /// Explicit user request; always starts a new fetch.
    Request(LocationQuery),
    RefreshTick,
    SnapshotReady {
        token: RequestToken,
        snapshot: Box<WeatherSnapshot>,
    },
    FetchFailed {
        token: RequestToken,
        error: WeatherError,
    },
    Quit,
}

/// Sends [`AppEvent::RefreshTick`] every `refresh_secs`, clamped to
/// 10s..=24h and jittered by ±10% so many clients do not hit the proxy in
/// lockstep.
pub fn start_refresh_task(tx: mpsc::Sender<AppEvent>, refresh_secs: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        let base = refresh_secs.clamp(MIN_REFRESH_SECS, MAX_REFRESH_SECS);
        loop {
            sleep(jittered(base)).await;
            if tx.send(AppEvent::RefreshTick).await.is_err() {
                break;
            }
        }
    })
}

fn jittered(base_secs: u64) -> Duration {
    let mut rng = rand::rng();
    let jitter = rng.random_range(-0.1f32..0.1f32);
    let secs = ((base_secs as f32) * (1.0 + jitter)).max(1.0);
    Duration::try_from_secs_f32(secs).unwrap_or(Duration::from_secs(base_secs))
}
