use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::app::settings::{Favorite, RuntimeSettings};
use crate::domain::weather::{Location, UnitPreference, WeatherSnapshot};
use crate::error::WeatherError;

/// Default location when nothing was saved: Benin City, NG.
pub const DEFAULT_LATITUDE: f64 = 6.335;
pub const DEFAULT_LONGITUDE: f64 = 5.627;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FetchPhase {
    Idle,
    Fetching,
    Ready,
    Failed,
}

/// Identity of one snapshot request. Tokens only grow, so the latest issued
/// token is the only one whose result may be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequestToken(u64);

impl RequestToken {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Session state owned by the controller and mutated only through the
/// methods below.
#[derive(Debug)]
pub struct AppState {
    pub phase: FetchPhase,
    pub snapshot: Option<Arc<WeatherSnapshot>>,
    pub last_error: Option<WeatherError>,
    pub settings: RuntimeSettings,
    latest_token: Option<RequestToken>,
    next_token: u64,
}

impl AppState {
    pub fn new(settings: RuntimeSettings) -> Self {
        Self {
            phase: FetchPhase::Idle,
            snapshot: None,
            last_error: None,
            settings,
            latest_token: None,
            next_token: 1,
        }
    }

    #[must_use]
    pub fn units(&self) -> UnitPreference {
        self.settings.units
    }

    #[must_use]
    pub fn is_fetching(&self) -> bool {
        self.phase == FetchPhase::Fetching
    }

    #[must_use]
    pub fn latest_token(&self) -> Option<RequestToken> {
        self.latest_token
    }

    /// Issues a new token and moves to `Fetching`. Anything still in flight
    /// becomes stale.
    pub fn begin_request(&mut self) -> RequestToken {
        let token = RequestToken(self.next_token);
        self.next_token += 1;
        self.latest_token = Some(token);
        self.phase = FetchPhase::Fetching;
        debug!(token = token.value(), "request started");
        token
    }

    fn is_current(&self, token: RequestToken) -> bool {
        self.latest_token == Some(token)
    }

    /// Installs `snapshot` if `token` is the latest request. Returns the
    /// shared snapshot when applied, `None` when the result was stale.
    pub fn apply_snapshot(
        &mut self,
        token: RequestToken,
        snapshot: WeatherSnapshot,
    ) -> Option<Arc<WeatherSnapshot>> {
        if !self.is_current(token) {
            warn!(
                token = token.value(),
                latest = self.latest_token.map(RequestToken::value),
                "discarding stale snapshot"
            );
            return None;
        }
        self.settings.last_location = Some(snapshot.location.clone());
        let snapshot = Arc::new(snapshot);
        self.snapshot = Some(Arc::clone(&snapshot));
        self.last_error = None;
        self.phase = FetchPhase::Ready;
        Some(snapshot)
    }

    /// Records a failure for the latest request. The previous snapshot, if
    /// any, stays in place. Returns `false` for stale tokens.
    pub fn apply_failure(&mut self, token: RequestToken, error: WeatherError) -> bool {
        if !self.is_current(token) {
            warn!(
                token = token.value(),
                error = %error,
                "discarding stale failure"
            );
            return false;
        }
        self.last_error = Some(error);
        self.phase = FetchPhase::Failed;
        true
    }

    /// Location the auto-refresh timer should rebuild, if any.
    #[must_use]
    pub fn refresh_location(&self) -> Option<Location> {
        self.snapshot
            .as_ref()
            .map(|snapshot| snapshot.location.clone())
            .or_else(|| self.settings.last_location.clone())
    }

    /// Where to start when the user gave no location: the last one seen,
    /// otherwise the built-in default.
    #[must_use]
    pub fn startup_location(&self) -> Location {
        self.settings.last_location.clone().unwrap_or(Location {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            name: Some("Benin City".to_string()),
            country: Some("NG".to_string()),
            region: None,
        })
    }

    /// A refresh tick only rebuilds when enabled, idle and there is
    /// something to refresh.
    #[must_use]
    pub fn should_auto_refresh(&self) -> bool {
        self.settings.auto_refresh && !self.is_fetching() && self.refresh_location().is_some()
    }

    pub fn toggle_temp_unit(&mut self) {
        self.settings.units.toggle_temp();
    }

    pub fn toggle_speed_unit(&mut self) {
        self.settings.units.toggle_speed();
    }

    /// Stars or unstars the current snapshot's place. `None` when there is
    /// no snapshot yet.
    pub fn toggle_favorite(&mut self) -> Option<bool> {
        let snapshot = self.snapshot.clone()?;
        Some(self.settings.toggle_favorite(&snapshot))
    }

    pub fn remove_favorite(&mut self, index: usize) -> Option<Favorite> {
        self.settings.remove_favorite(index)
    }

    pub fn record_recent_search(&mut self, name: &str) {
        self.settings.push_recent_search(name);
    }
}
