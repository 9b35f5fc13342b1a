use chrono::{DateTime, FixedOffset, Utc};

use crate::domain::weather::{
    SpeedUnit, TempUnit, UnitPreference, WeatherSnapshot, speed_label, temp_symbol,
    to_display_speed, to_display_temp,
};

/// Rounded value without a sign on zero, so -0.4 prints as "0".
fn whole(value: f32) -> String {
    if !value.is_finite() {
        return "--".to_string();
    }
    let rounded = value.round();
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{rounded:.0}")
    }
}

pub fn format_temp(celsius: f32, units: TempUnit) -> String {
    format!("{}{}", whole(to_display_temp(celsius, units)), temp_symbol(units))
}

pub fn format_speed(kmh: f32, units: SpeedUnit) -> String {
    format!("{} {}", whole(to_display_speed(kmh, units)), speed_label(units))
}

pub fn format_visibility(meters: f32) -> String {
    if !meters.is_finite() || meters <= 0.0 {
        return "--".to_string();
    }
    let km = meters / 1000.0;
    if km >= 20.0 {
        format!("{km:.0} km")
    } else {
        format!("{km:.1} km")
    }
}

pub fn format_local_time(instant: DateTime<Utc>, offset: FixedOffset) -> String {
    instant.with_timezone(&offset).format("%H:%M").to_string()
}

/// Coarse relative age used for the "updated" line. Future instants read
/// as "just now".
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - then).num_minutes();
    if minutes < 1 {
        return "just now".to_string();
    }
    if minutes == 1 {
        return "1 minute ago".to_string();
    }
    if minutes < 60 {
        return format!("{minutes} minutes ago");
    }
    match minutes / 60 {
        1 => "1 hour ago".to_string(),
        hours => format!("{hours} hours ago"),
    }
}

/// One-line summary suitable for pasting into a message.
pub fn share_text(snapshot: &WeatherSnapshot, units: UnitPreference) -> String {
    let current = &snapshot.current;
    let name = if current.name.is_empty() {
        snapshot.location.name.clone().unwrap_or_default()
    } else {
        current.name.clone()
    };
    let place = match current.country.as_ref().or(snapshot.location.country.as_ref()) {
        Some(country) => format!("{name}, {country}"),
        None => name,
    };
    format!(
        "Current weather in {place}: {}, {}. Check WeatherVerse for more details!",
        format_temp(current.temperature_c, units.temp),
        current.condition.description
    )
}
