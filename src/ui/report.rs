use chrono::{DateTime, Utc};

use super::format::{format_local_time, format_speed, format_temp, format_visibility, time_ago};
use crate::app::settings::Favorite;
use crate::domain::insights::scan_insights;
use crate::domain::weather::{
    DailySummary, ForecastSample, UnitPreference, WeatherCondition, WeatherSnapshot,
    condition_glyph, is_night_icon, wind_direction_label,
};

fn glyph(condition: &WeatherCondition) -> &'static str {
    condition_glyph(condition.theme(), is_night_icon(&condition.icon))
}

/// Plain-text dashboard for one snapshot. Units are applied here and only
/// here; the snapshot itself stays metric.
pub fn render_report(
    snapshot: &WeatherSnapshot,
    units: UnitPreference,
    now: DateTime<Utc>,
) -> String {
    let mut lines = Vec::new();
    let current = &snapshot.current;
    let offset = current.utc_offset();

    lines.push(format!(
        "{}  ({:.4}, {:.4})",
        snapshot.location.display_name(),
        snapshot.location.latitude,
        snapshot.location.longitude
    ));
    lines.push(format!("Updated {}", time_ago(snapshot.fetched_at, now)));
    lines.push(String::new());

    lines.push(format!(
        "{} {}  feels like {}  {}",
        glyph(&current.condition),
        format_temp(current.temperature_c, units.temp),
        format_temp(current.feels_like_c, units.temp),
        current.condition.description
    ));
    lines.push(format!(
        "Wind {} {}  Humidity {:.0}%  Pressure {:.0} hPa  Visibility {}",
        format_speed(current.wind_speed_kmh, units.speed),
        wind_direction_label(current.wind_direction_deg),
        current.humidity,
        current.pressure_hpa,
        current
            .visibility_m
            .map_or_else(|| "--".to_string(), format_visibility)
    ));
    if let Some(dew) = snapshot.dew_point_c() {
        lines.push(format!("Dew point {}", format_temp(dew, units.temp)));
    }
    if let (Some(sunrise), Some(sunset)) = (current.sunrise, current.sunset) {
        let progress = snapshot.day_progress(now).unwrap_or_default();
        lines.push(format!(
            "Sunrise {}  Sunset {}  Daylight {progress:.0}%",
            format_local_time(sunrise, offset),
            format_local_time(sunset, offset)
        ));
    }

    if let (Some(reading), Some(band)) = (&snapshot.air_quality, snapshot.aqi_band()) {
        lines.push(format!(
            "Air quality {} (AQI {}): {}",
            band.label, reading.aqi, band.advisory
        ));
    }
    let uv_band = snapshot.uv_band();
    let estimated = if snapshot.uv_index.is_estimate() {
        " (estimated)"
    } else {
        ""
    };
    lines.push(format!(
        "UV {:.1} {}{estimated}: {}",
        snapshot.uv_index.value, uv_band.label, uv_band.advisory
    ));

    if !snapshot.alerts.is_empty() {
        lines.push(String::new());
        lines.push("Alerts".to_string());
        for alert in &snapshot.alerts {
            let sender = alert
                .sender
                .as_deref()
                .map(|sender| format!(" ({sender})"))
                .unwrap_or_default();
            lines.push(format!("  ! {}{sender}: {}", alert.event, alert.description));
        }
    }

    if !snapshot.hourly.is_empty() {
        lines.push(String::new());
        lines.push("Next hours".to_string());
        lines.extend(snapshot.hourly.iter().map(|point| hourly_row(point, units)));
    }

    if !snapshot.daily.is_empty() {
        lines.push(String::new());
        lines.push("Next days".to_string());
        lines.extend(snapshot.daily.iter().map(|day| daily_row(day, units)));
    }

    lines.push(String::new());
    lines.push("Insights".to_string());
    for insight in scan_insights(snapshot) {
        lines.push(format!("  {} {}", insight.icon, insight.message));
    }

    lines.join("\n")
}

/// Numbered favorites with the reading saved when each was starred. The
/// numbers are the positions `favorites remove` takes.
pub fn render_favorites(favorites: &[Favorite], units: UnitPreference) -> String {
    if favorites.is_empty() {
        return "No favorites yet".to_string();
    }
    favorites
        .iter()
        .enumerate()
        .map(|(idx, favorite)| {
            format!(
                "{:>2}. {}  {}  {}",
                idx + 1,
                favorite.location().display_name(),
                format_temp(favorite.temperature_c, units.temp),
                favorite.condition
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn hourly_row(point: &ForecastSample, units: UnitPreference) -> String {
    format!(
        "  {}  {} {:>6}  rain {:>3.0}%  {}",
        point.timestamp.format("%H:%M"),
        glyph(&point.condition),
        format_temp(point.temperature_c, units.temp),
        point.precipitation_percent(),
        point.condition.description
    )
}

fn daily_row(day: &DailySummary, units: UnitPreference) -> String {
    format!(
        "  {}  {} {:>6} / {:<6}  rain {:>3.0}%  humidity {:.0}%  {}",
        day.date.format("%a %d %b"),
        glyph(&day.representative_weather),
        format_temp(day.min_temp_c, units.temp),
        format_temp(day.max_temp_c, units.temp),
        day.avg_precipitation_probability,
        day.avg_humidity,
        day.representative_weather.description
    )
}
