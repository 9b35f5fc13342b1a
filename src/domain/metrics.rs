//! Derived quantities computed from provider readings: dew point, UV and
//! air-quality banding, the fallback UV estimate and daylight progress.

use std::f64::consts::PI;

use chrono::{DateTime, Utc};
use serde::Serialize;

const MAGNUS_A: f32 = 17.27;
const MAGNUS_B: f32 = 237.7;

const UV_BASE: f64 = 5.0;
const UV_MAX: f64 = 12.0;

/// Categorical label for an index value plus the matching health advice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Banding {
    /// 1-based tier within its table.
    pub level: u8,
    pub label: &'static str,
    pub advisory: &'static str,
}

const AQI_BANDS: [Banding; 5] = [
    Banding {
        level: 1,
        label: "Good",
        advisory: "Air quality is satisfactory. No health impacts.",
    },
    Banding {
        level: 2,
        label: "Fair",
        advisory: "Air quality is acceptable. Unusually sensitive people should consider reducing prolonged outdoor exertion.",
    },
    Banding {
        level: 3,
        label: "Moderate",
        advisory: "Members of sensitive groups may experience health effects. General public is less likely to be affected.",
    },
    Banding {
        level: 4,
        label: "Poor",
        advisory: "Health alert: Everyone may begin to experience health effects.",
    },
    Banding {
        level: 5,
        label: "Very Poor",
        advisory: "Health warning of emergency conditions. Entire population is likely to be affected.",
    },
];

/// Upper bound (inclusive) of each UV tier; values above the last bound
/// still land in the top tier.
const UV_BANDS: [(f32, Banding); 5] = [
    (
        2.0,
        Banding {
            level: 1,
            label: "Low",
            advisory: "No protection needed.",
        },
    ),
    (
        5.0,
        Banding {
            level: 2,
            label: "Moderate",
            advisory: "Wear sunglasses and sunscreen.",
        },
    ),
    (
        7.0,
        Banding {
            level: 3,
            label: "High",
            advisory: "Stay in shade during midday hours.",
        },
    ),
    (
        10.0,
        Banding {
            level: 4,
            label: "Very High",
            advisory: "Avoid being outside during midday hours.",
        },
    ),
    (
        12.0,
        Banding {
            level: 5,
            label: "Extreme",
            advisory: "Extra protection needed. Unprotected skin can burn quickly.",
        },
    ),
];

/// Magnus approximation of the dew point in °C.
///
/// Undefined for `humidity_pct <= 0` (the logarithm diverges) and returns
/// NaN there; callers guard before calling.
#[must_use]
pub fn dew_point(temp_c: f32, humidity_pct: f32) -> f32 {
    let alpha = (MAGNUS_A * temp_c) / (MAGNUS_B + temp_c) + (humidity_pct / 100.0).ln();
    (MAGNUS_B * alpha) / (MAGNUS_A - alpha)
}

/// Provider AQI (1..=5) to its band. Anything outside the nominal range
/// clamps to "Good".
#[must_use]
pub fn aqi_band(aqi: i32) -> Banding {
    usize::try_from(aqi)
        .ok()
        .and_then(|level| level.checked_sub(1))
        .and_then(|idx| AQI_BANDS.get(idx).copied())
        .unwrap_or(AQI_BANDS[0])
}

#[must_use]
pub fn uvi_band(uv: f32) -> Banding {
    UV_BANDS
        .iter()
        .find_map(|(upper, band)| (uv <= *upper).then_some(*band))
        .unwrap_or(UV_BANDS[UV_BANDS.len() - 1].1)
}

/// Fallback UV estimate from latitude and UTC hour.
///
/// This is not a measurement: it scales a base index of 5 down towards the
/// poles and up around solar noon UTC, clamped to `[0, 12]` and rounded to
/// one decimal. Only use it when no provider value exists.
#[must_use]
pub fn heuristic_uv(latitude: f64, hour_utc: u32) -> f32 {
    let lat_factor = latitude.abs() / 90.0;
    let time_factor = ((f64::from(hour_utc) - 12.0) * PI / 12.0).cos();
    let uv = UV_BASE * (1.0 - lat_factor * 0.5) * (1.0 + time_factor * 0.5);
    let clamped = uv.clamp(0.0, UV_MAX);
    ((clamped * 10.0).round() / 10.0) as f32
}

/// Percentage of daylight elapsed, clamped to `[0, 100]`. Before sunrise is
/// 0 and after sunset is 100; there is no wrap into the next day.
#[must_use]
pub fn day_progress_fraction(
    now: DateTime<Utc>,
    sunrise: DateTime<Utc>,
    sunset: DateTime<Utc>,
) -> f32 {
    if now <= sunrise {
        return 0.0;
    }
    if now >= sunset {
        return 100.0;
    }
    let span = (sunset - sunrise).num_milliseconds() as f64;
    let elapsed = (now - sunrise).num_milliseconds() as f64;
    ((elapsed / span) * 100.0).clamp(0.0, 100.0) as f32
}
