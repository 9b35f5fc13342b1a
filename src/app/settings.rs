use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::cli::DEFAULT_REFRESH_SECS;
use crate::domain::weather::{Location, SpeedUnit, TempUnit, UnitPreference, WeatherSnapshot};

pub const MAX_RECENT_SEARCHES: usize = 5;

/// A saved location with the reading it had when it was starred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub name: String,
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub temperature_c: f32,
    pub condition: String,
}

impl Favorite {
    #[must_use]
    pub fn from_snapshot(snapshot: &WeatherSnapshot) -> Self {
        let (name, country) = place_of(snapshot);
        Self {
            name,
            country,
            latitude: snapshot.location.latitude,
            longitude: snapshot.location.longitude,
            temperature_c: snapshot.current.temperature_c,
            condition: snapshot.current.condition.description.clone(),
        }
    }

    #[must_use]
    pub fn location(&self) -> Location {
        Location {
            latitude: self.latitude,
            longitude: self.longitude,
            name: Some(self.name.clone()),
            country: self.country.clone(),
            region: None,
        }
    }

    fn same_place(&self, name: &str, country: Option<&str>) -> bool {
        self.name == name && self.country.as_deref() == country
    }
}

fn place_of(snapshot: &WeatherSnapshot) -> (String, Option<String>) {
    let name = snapshot
        .location
        .name
        .clone()
        .unwrap_or_else(|| snapshot.current.name.clone());
    let country = snapshot
        .location
        .country
        .clone()
        .or_else(|| snapshot.current.country.clone());
    (name, country)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    pub units: UnitPreference,
    pub auto_refresh: bool,
    pub refresh_interval_secs: u64,
    pub favorites: Vec<Favorite>,
    /// Most recent first, without duplicates.
    pub recent_searches: Vec<String>,
    pub last_location: Option<Location>,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            units: UnitPreference::default(),
            auto_refresh: true,
            refresh_interval_secs: DEFAULT_REFRESH_SECS,
            favorites: Vec::new(),
            recent_searches: Vec::new(),
            last_location: None,
        }
    }
}

impl RuntimeSettings {
    pub fn push_recent_search(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        self.recent_searches.retain(|existing| existing != name);
        self.recent_searches.insert(0, name.to_string());
        self.recent_searches.truncate(MAX_RECENT_SEARCHES);
    }

    #[must_use]
    pub fn is_favorite(&self, snapshot: &WeatherSnapshot) -> bool {
        let (name, country) = place_of(snapshot);
        self.favorites
            .iter()
            .any(|fav| fav.same_place(&name, country.as_deref()))
    }

    /// Adds the snapshot's place to favorites, or removes it when already
    /// present. Returns whether the place is a favorite afterwards.
    pub fn toggle_favorite(&mut self, snapshot: &WeatherSnapshot) -> bool {
        let (name, country) = place_of(snapshot);
        if let Some(idx) = self
            .favorites
            .iter()
            .position(|fav| fav.same_place(&name, country.as_deref()))
        {
            self.favorites.remove(idx);
            return false;
        }
        self.favorites.push(Favorite::from_snapshot(snapshot));
        true
    }

    pub fn remove_favorite(&mut self, index: usize) -> Option<Favorite> {
        (index < self.favorites.len()).then(|| self.favorites.remove(index))
    }
}

/// Command-line values that beat whatever was saved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub temp: Option<TempUnit>,
    pub speed: Option<SpeedUnit>,
    pub refresh_interval_secs: Option<u64>,
}

impl SettingsOverrides {
    fn apply(self, settings: &mut RuntimeSettings) {
        if let Some(temp) = self.temp {
            settings.units.temp = temp;
        }
        if let Some(speed) = self.speed {
            settings.units.speed = speed;
        }
        if let Some(secs) = self.refresh_interval_secs {
            settings.refresh_interval_secs = secs;
        }
    }
}

pub fn load_runtime_settings(
    overrides: SettingsOverrides,
    enable_disk: bool,
) -> (RuntimeSettings, Option<PathBuf>) {
    let path = if enable_disk { settings_path() } else { None };
    let settings = match &path {
        Some(path) => load_settings_from(path, overrides),
        None => {
            let mut settings = RuntimeSettings::default();
            overrides.apply(&mut settings);
            settings
        }
    };
    (settings, path)
}

/// Reads `path`, falling back to defaults when the file is missing or
/// does not parse, then applies `overrides`.
pub fn load_settings_from(path: &Path, overrides: SettingsOverrides) -> RuntimeSettings {
    let mut settings = fs::read_to_string(path)
        .ok()
        .and_then(|content| serde_json::from_str::<RuntimeSettings>(&content).ok())
        .unwrap_or_default();
    overrides.apply(&mut settings);
    settings
}

pub fn save_runtime_settings(path: &Path, settings: &RuntimeSettings) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("creating settings directory failed")?;
    }
    let payload =
        serde_json::to_string_pretty(settings).context("serializing settings payload failed")?;
    fs::write(path, payload).context("writing settings file failed")
}

pub fn settings_path() -> Option<PathBuf> {
    if let Some(base) = std::env::var_os("WEATHERVERSE_CONFIG_DIR") {
        return Some(PathBuf::from(base).join("settings.json"));
    }

    let home = std::env::var_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("weatherverse")
            .join("settings.json"),
    )
}

#[cfg(test)]
mod tests;
