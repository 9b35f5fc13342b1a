use serde::Serialize;

use crate::domain::weather::WeatherSnapshot;

const HOT_ABOVE_C: f32 = 30.0;
const CHILLY_BELOW_C: f32 = 10.0;
const RAIN_LIKELY_ABOVE: f32 = 0.5;
const WINDY_ABOVE_KMH: f32 = 20.0;
const POOR_AIR_FROM_AQI: u8 = 4;
const HIGH_UV_FROM: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Hot,
    Chilly,
    Rain,
    Wind,
    AirQuality,
    Uv,
    AllClear,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub icon: &'static str,
    pub message: String,
}

impl Insight {
    fn new(kind: InsightKind, icon: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            icon,
            message: message.into(),
        }
    }
}

/// Short advice lines for a snapshot. Order is fixed; when nothing is
/// notable a single all-clear insight is returned, so the list is never
/// empty.
#[must_use]
pub fn scan_insights(snapshot: &WeatherSnapshot) -> Vec<Insight> {
    let mut insights = Vec::new();

    push_insight(&mut insights, temperature_insight(snapshot));
    push_insight(&mut insights, rain_insight(snapshot));
    push_insight(&mut insights, wind_insight(snapshot));
    push_insight(&mut insights, air_quality_insight(snapshot));
    push_insight(&mut insights, uv_insight(snapshot));

    if insights.is_empty() {
        insights.push(Insight::new(
            InsightKind::AllClear,
            "✓",
            "Good weather conditions for outdoor activities.",
        ));
    }
    insights
}

fn push_insight(insights: &mut Vec<Insight>, insight: Option<Insight>) {
    if let Some(insight) = insight {
        insights.push(insight);
    }
}

fn temperature_insight(snapshot: &WeatherSnapshot) -> Option<Insight> {
    let temp = snapshot.current.temperature_c;
    if temp > HOT_ABOVE_C {
        return Some(Insight::new(
            InsightKind::Hot,
            "🔥",
            "Hot day ahead! Stay hydrated and avoid prolonged sun exposure.",
        ));
    }
    if temp < CHILLY_BELOW_C {
        return Some(Insight::new(
            InsightKind::Chilly,
            "❄",
            "Chilly conditions. Dress warmly and watch for frost.",
        ));
    }
    None
}

fn rain_insight(snapshot: &WeatherSnapshot) -> Option<Insight> {
    let next_rain = snapshot
        .hourly
        .iter()
        .find(|point| point.precipitation_probability > RAIN_LIKELY_ABOVE)?;
    Some(Insight::new(
        InsightKind::Rain,
        "☂",
        format!(
            "Rain expected around {}. Consider carrying an umbrella.",
            next_rain.timestamp.format("%H:%M")
        ),
    ))
}

fn wind_insight(snapshot: &WeatherSnapshot) -> Option<Insight> {
    (snapshot.current.wind_speed_kmh > WINDY_ABOVE_KMH).then(|| {
        Insight::new(
            InsightKind::Wind,
            "💨",
            "Windy conditions. Secure loose outdoor items.",
        )
    })
}

fn air_quality_insight(snapshot: &WeatherSnapshot) -> Option<Insight> {
    let reading = snapshot.air_quality.as_ref()?;
    (reading.aqi >= POOR_AIR_FROM_AQI).then(|| {
        Insight::new(
            InsightKind::AirQuality,
            "░",
            "Poor air quality. Consider limiting outdoor activities.",
        )
    })
}

fn uv_insight(snapshot: &WeatherSnapshot) -> Option<Insight> {
    (snapshot.uv_index.value >= HIGH_UV_FROM).then(|| {
        Insight::new(
            InsightKind::Uv,
            "☀",
            "High UV index. Use sunscreen and wear protective clothing.",
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::weather::{AirComponents, AirQualityReading, UvIndex};
    use crate::test_support::sample_snapshot;

    fn kinds(snapshot: &WeatherSnapshot) -> Vec<InsightKind> {
        scan_insights(snapshot).iter().map(|i| i.kind).collect()
    }

    #[test]
    fn mild_calm_day_is_all_clear() {
        let snapshot = sample_snapshot();
        let insights = scan_insights(&snapshot);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::AllClear);
    }

    #[test]
    fn insights_keep_fixed_order() {
        let mut snapshot = sample_snapshot();
        snapshot.current.temperature_c = 34.0;
        snapshot.current.wind_speed_kmh = 32.0;
        snapshot.hourly[3].precipitation_probability = 0.8;
        snapshot.air_quality = Some(AirQualityReading {
            aqi: 4,
            components: AirComponents::default(),
        });
        snapshot.uv_index = UvIndex::measured(9.2);

        assert_eq!(
            kinds(&snapshot),
            vec![
                InsightKind::Hot,
                InsightKind::Rain,
                InsightKind::Wind,
                InsightKind::AirQuality,
                InsightKind::Uv,
            ]
        );
    }

    #[test]
    fn rain_message_uses_first_likely_hour_in_local_time() {
        let mut snapshot = sample_snapshot();
        snapshot.hourly[2].precipitation_probability = 0.9;
        snapshot.hourly[5].precipitation_probability = 0.95;
        let expected = snapshot.hourly[2].timestamp.format("%H:%M").to_string();

        let rain = scan_insights(&snapshot)
            .into_iter()
            .find(|i| i.kind == InsightKind::Rain)
            .expect("rain insight");
        assert!(rain.message.contains(&expected), "{}", rain.message);
    }

    #[test]
    fn heat_wind_and_rain_thresholds_are_exclusive() {
        let mut snapshot = sample_snapshot();
        snapshot.current.temperature_c = 30.0;
        snapshot.current.wind_speed_kmh = 20.0;
        snapshot.hourly[0].precipitation_probability = 0.5;
        assert_eq!(kinds(&snapshot), vec![InsightKind::AllClear]);

        snapshot.current.temperature_c = 9.5;
        snapshot.uv_index = UvIndex::heuristic(0.0, 12);
        assert_eq!(kinds(&snapshot), vec![InsightKind::Chilly]);
    }

    #[test]
    fn missing_air_quality_never_warns() {
        let mut snapshot = sample_snapshot();
        snapshot.air_quality = None;
        assert!(!kinds(&snapshot).contains(&InsightKind::AirQuality));
    }
}
