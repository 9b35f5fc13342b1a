use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionTheme {
    Sunny,
    Cloudy,
    Rainy,
    Storm,
    Snow,
    Fog,
    Unknown,
}

const CONDITION_THEMES: &[(&str, ConditionTheme)] = &[
    ("Clear", ConditionTheme::Sunny),
    ("Clouds", ConditionTheme::Cloudy),
    ("Rain", ConditionTheme::Rainy),
    ("Drizzle", ConditionTheme::Rainy),
    ("Thunderstorm", ConditionTheme::Storm),
    ("Snow", ConditionTheme::Snow),
    ("Mist", ConditionTheme::Fog),
    ("Smoke", ConditionTheme::Fog),
    ("Haze", ConditionTheme::Fog),
    ("Dust", ConditionTheme::Fog),
    ("Fog", ConditionTheme::Fog),
    ("Sand", ConditionTheme::Fog),
    ("Ash", ConditionTheme::Fog),
    ("Squall", ConditionTheme::Storm),
    ("Tornado", ConditionTheme::Storm),
];

/// Maps a provider condition group (`weather.main`) to a display theme.
#[must_use]
pub fn condition_theme(main: &str) -> ConditionTheme {
    CONDITION_THEMES
        .iter()
        .find_map(|(candidate, theme)| (*candidate == main).then_some(*theme))
        .unwrap_or(ConditionTheme::Unknown)
}

/// Provider icon codes end in `n` at night (e.g. `01n`).
#[must_use]
pub fn is_night_icon(icon: &str) -> bool {
    icon.ends_with('n')
}

#[must_use]
pub fn condition_glyph(theme: ConditionTheme, is_night: bool) -> &'static str {
    match theme {
        ConditionTheme::Sunny if is_night => "☾",
        ConditionTheme::Sunny => "☀",
        ConditionTheme::Cloudy => "☁",
        ConditionTheme::Rainy => "☂",
        ConditionTheme::Storm => "⚡",
        ConditionTheme::Snow => "❄",
        ConditionTheme::Fog => "░",
        ConditionTheme::Unknown => "·",
    }
}
