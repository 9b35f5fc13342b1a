use chrono::{DateTime, FixedOffset, Offset, Utc};

use super::{SpeedUnit, TempUnit};

const COMPASS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
const KMH_TO_MPH: f32 = 0.621_371;

/// Rounded display temperature. NaN input stays NaN.
#[must_use]
pub fn to_display_temp(celsius: f32, units: TempUnit) -> f32 {
    match units {
        TempUnit::Celsius => celsius.round(),
        TempUnit::Fahrenheit => (celsius * 9.0 / 5.0 + 32.0).round(),
    }
}

#[must_use]
pub fn to_display_speed(kmh: f32, units: SpeedUnit) -> f32 {
    match units {
        SpeedUnit::Kmh => kmh.round(),
        SpeedUnit::Mph => (kmh * KMH_TO_MPH).round(),
    }
}

/// 8-point compass label. Degrees wrap, so `-45` and `315` agree.
#[must_use]
pub fn wind_direction_label(degrees: f32) -> &'static str {
    let normalized = degrees.rem_euclid(360.0);
    let bucket = (normalized / 45.0).round() as usize % COMPASS.len();
    COMPASS[bucket]
}

#[must_use]
pub fn temp_symbol(units: TempUnit) -> &'static str {
    match units {
        TempUnit::Celsius => "°C",
        TempUnit::Fahrenheit => "°F",
    }
}

#[must_use]
pub fn speed_label(units: SpeedUnit) -> &'static str {
    match units {
        SpeedUnit::Kmh => "km/h",
        SpeedUnit::Mph => "mph",
    }
}

/// Provider wind speeds arrive in metres per second.
#[must_use]
pub fn ms_to_kmh(ms: f32) -> f32 {
    ms * 3.6
}

#[must_use]
pub fn offset_from_secs(secs: i32) -> FixedOffset {
    FixedOffset::east_opt(secs).unwrap_or_else(|| Utc.fix())
}

#[must_use]
pub fn unix_to_utc(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

#[must_use]
pub fn unix_to_local(secs: i64, offset_secs: i32) -> Option<DateTime<FixedOffset>> {
    unix_to_utc(secs).map(|ts| ts.with_timezone(&offset_from_secs(offset_secs)))
}
