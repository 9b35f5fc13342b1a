use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::app::builder::{LocationQuery, WeatherSnapshotBuilder};
use crate::app::events::AppEvent;
use crate::app::settings::{RuntimeSettings, save_runtime_settings};
use crate::app::state::{AppState, RequestToken};
use crate::data::gateway::ProviderGateway;
use crate::domain::weather::WeatherSnapshot;
use crate::error::WeatherError;

const EVENT_CAPACITY: usize = 256;
const UPDATE_CAPACITY: usize = 16;

/// What subscribers see: every accepted snapshot and every failure of the
/// latest request.
#[derive(Debug, Clone)]
pub enum DashboardUpdate {
    SnapshotUpdated(Arc<WeatherSnapshot>),
    Error(WeatherError),
}

/// Owns the session: the [`AppState`], the event loop that feeds it and the
/// broadcast channel presentation layers listen on.
pub struct Controller<G> {
    state: AppState,
    builder: Arc<WeatherSnapshotBuilder<G>>,
    tx: mpsc::Sender<AppEvent>,
    rx: mpsc::Receiver<AppEvent>,
    updates: broadcast::Sender<DashboardUpdate>,
    settings_path: Option<PathBuf>,
}

impl<G: ProviderGateway + 'static> Controller<G> {
    pub fn new(gateway: G, settings: RuntimeSettings, settings_path: Option<PathBuf>) -> Self {
        let (tx, rx) = mpsc::channel(EVENT_CAPACITY);
        let (updates, _) = broadcast::channel(UPDATE_CAPACITY);
        Self {
            state: AppState::new(settings),
            builder: Arc::new(WeatherSnapshotBuilder::new(gateway)),
            tx,
            rx,
            updates,
            settings_path,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn builder(&self) -> &WeatherSnapshotBuilder<G> {
        &self.builder
    }

    /// Handle for producers outside the controller (refresh timer, input).
    pub fn sender(&self) -> mpsc::Sender<AppEvent> {
        self.tx.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardUpdate> {
        self.updates.subscribe()
    }

    /// Starts a build for `query` under a fresh token. Earlier requests keep
    /// running but their results will be discarded.
    pub fn request(&mut self, query: LocationQuery) -> RequestToken {
        let token = self.state.begin_request();
        let builder = Arc::clone(&self.builder);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let event = match builder.fetch(query).await {
                Ok(snapshot) => AppEvent::SnapshotReady {
                    token,
                    snapshot: Box::new(snapshot),
                },
                Err(error) => AppEvent::FetchFailed { token, error },
            };
            if tx.send(event).await.is_err() {
                debug!(token = token.value(), "controller gone before result arrived");
            }
        });
        token
    }

    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }

    /// Applies one event. Returns `false` once the session should stop.
    pub fn handle_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Request(query) => {
                self.request(query);
            }
            AppEvent::RefreshTick => {
                if !self.state.should_auto_refresh() {
                    debug!(phase = ?self.state.phase, "skipping auto refresh");
                    return true;
                }
                if let Some(location) = self.state.refresh_location() {
                    self.request(LocationQuery::Coordinates(location));
                }
            }
            AppEvent::SnapshotReady { token, snapshot } => {
                // Recent searches follow accepted snapshots only, so a
                // superseded build leaves no trace.
                if let Some(snapshot) = self.state.apply_snapshot(token, *snapshot) {
                    let display_name = snapshot.location.display_name();
                    info!(token = token.value(), location = %display_name, "snapshot applied");
                    self.state.record_recent_search(&display_name);
                    self.publish(DashboardUpdate::SnapshotUpdated(snapshot));
                    self.persist();
                }
            }
            AppEvent::FetchFailed { token, error } => {
                if self.state.apply_failure(token, error.clone()) {
                    warn!(token = token.value(), error = %error, "snapshot request failed");
                    self.publish(DashboardUpdate::Error(error));
                }
            }
            AppEvent::Quit => return false,
        }
        true
    }

    /// Drains events until a `Quit` arrives or every sender is gone.
    pub async fn run(&mut self) {
        while let Some(event) = self.next_event().await {
            if !self.handle_event(event) {
                break;
            }
        }
    }

    /// Writes settings to disk when persistence is enabled. Failures are
    /// logged and otherwise ignored.
    pub fn persist(&self) {
        let Some(path) = &self.settings_path else {
            return;
        };
        if let Err(err) = save_runtime_settings(path, &self.state.settings) {
            warn!(path = %path.display(), error = %err, "failed to persist settings");
        }
    }

    fn publish(&self, update: DashboardUpdate) {
        // No subscribers is fine; the state still holds the result.
        let _ = self.updates.send(update);
    }
}
