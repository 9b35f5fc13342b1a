use tempfile::NamedTempFile;

use super::{
    Favorite, MAX_RECENT_SEARCHES, RuntimeSettings, SettingsOverrides, load_runtime_settings,
    load_settings_from, save_runtime_settings,
};
use crate::domain::weather::{SpeedUnit, TempUnit};
use crate::test_support::sample_snapshot;

#[test]
fn defaults_match_dashboard_expectations() {
    let settings = RuntimeSettings::default();
    assert_eq!(settings.units.temp, TempUnit::Celsius);
    assert_eq!(settings.units.speed, SpeedUnit::Kmh);
    assert!(settings.auto_refresh);
    assert_eq!(settings.refresh_interval_secs, 900);
    assert!(settings.favorites.is_empty());
}

#[test]
fn recent_searches_are_deduplicated_and_capped() {
    let mut settings = RuntimeSettings::default();
    for city in ["Lagos", "Accra", "Nairobi", "Lagos", "Cairo", "Dakar", "Abuja"] {
        settings.push_recent_search(city);
    }
    assert_eq!(settings.recent_searches.len(), MAX_RECENT_SEARCHES);
    assert_eq!(
        settings.recent_searches,
        vec!["Abuja", "Dakar", "Cairo", "Lagos", "Nairobi"]
    );
}

#[test]
fn blank_recent_search_is_ignored() {
    let mut settings = RuntimeSettings::default();
    settings.push_recent_search("   ");
    assert!(settings.recent_searches.is_empty());
}

#[test]
fn toggle_favorite_adds_then_removes_same_place() {
    let snapshot = sample_snapshot();
    let mut settings = RuntimeSettings::default();

    assert!(settings.toggle_favorite(&snapshot));
    assert!(settings.is_favorite(&snapshot));
    let fav = &settings.favorites[0];
    assert_eq!(fav.name, "Benin City");
    assert_eq!(fav.country.as_deref(), Some("NG"));
    assert_eq!(fav.condition, "scattered clouds");

    assert!(!settings.toggle_favorite(&snapshot));
    assert!(settings.favorites.is_empty());
}

#[test]
fn remove_favorite_by_index_ignores_out_of_range() {
    let mut settings = RuntimeSettings::default();
    settings
        .favorites
        .push(Favorite::from_snapshot(&sample_snapshot()));
    assert!(settings.remove_favorite(3).is_none());
    assert!(settings.remove_favorite(0).is_some());
    assert!(settings.favorites.is_empty());
}

#[test]
fn favorite_location_keeps_coordinates() {
    let fav = Favorite::from_snapshot(&sample_snapshot());
    let location = fav.location();
    assert!((location.latitude - 6.335).abs() < f64::EPSILON);
    assert_eq!(location.display_name(), "Benin City, NG");
}

#[test]
fn settings_roundtrip_through_disk() {
    let mut settings = RuntimeSettings::default();
    settings.units.toggle_temp();
    settings.push_recent_search("Lagos");
    settings.last_location = Some(sample_snapshot().location);

    let file = NamedTempFile::new().expect("create temp settings file");
    save_runtime_settings(file.path(), &settings).expect("save settings");
    let restored = load_settings_from(file.path(), SettingsOverrides::default());

    assert_eq!(restored, settings);
}

#[test]
fn corrupt_file_falls_back_to_defaults() {
    let file = NamedTempFile::new().expect("create temp settings file");
    std::fs::write(file.path(), "{not json").expect("write garbage");
    let restored = load_settings_from(file.path(), SettingsOverrides::default());
    assert_eq!(restored, RuntimeSettings::default());
}

#[test]
fn partial_file_fills_missing_fields() {
    let file = NamedTempFile::new().expect("create temp settings file");
    std::fs::write(file.path(), r#"{"auto_refresh": false}"#).expect("write partial");
    let restored = load_settings_from(file.path(), SettingsOverrides::default());
    assert!(!restored.auto_refresh);
    assert_eq!(restored.refresh_interval_secs, 900);
}

#[test]
fn overrides_beat_saved_values() {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let path = temp_dir.path().join("nested").join("settings.json");
    let mut saved = RuntimeSettings::default();
    saved.units.toggle_temp();
    save_runtime_settings(&path, &saved).expect("save creates parent dirs");

    let overrides = SettingsOverrides {
        temp: Some(TempUnit::Celsius),
        speed: Some(SpeedUnit::Mph),
        refresh_interval_secs: Some(300),
    };
    let loaded = load_settings_from(&path, overrides);
    assert_eq!(loaded.units.temp, TempUnit::Celsius);
    assert_eq!(loaded.units.speed, SpeedUnit::Mph);
    assert_eq!(loaded.refresh_interval_secs, 300);
}

#[test]
fn load_without_disk_returns_defaults_and_no_path() {
    let overrides = SettingsOverrides {
        temp: Some(TempUnit::Fahrenheit),
        ..SettingsOverrides::default()
    };
    let (settings, path) = load_runtime_settings(overrides, false);
    assert!(path.is_none());
    assert_eq!(settings.units.temp, TempUnit::Fahrenheit);
}
