use chrono::NaiveDate;

use crate::domain::weather::{DailySummary, ForecastSample, HourlyPoint, WeatherCondition};

/// Samples shown in the hourly strip: eight 3-hour steps cover the next 24h.
pub const HOURLY_POINTS: usize = 8;
/// Calendar days summarised from the forecast window.
pub const MAX_DAYS: usize = 5;

/// First [`HOURLY_POINTS`] samples in the order received. Gaps are not
/// interpolated.
#[must_use]
pub fn bucket_hourly(samples: &[ForecastSample]) -> Vec<HourlyPoint> {
    samples.iter().take(HOURLY_POINTS).cloned().collect()
}

/// Groups samples by local calendar date, keeping first-seen day order, and
/// summarises at most [`MAX_DAYS`] groups. Later days are dropped rather
/// than merged; a trailing day with a single sample still gets a summary.
#[must_use]
pub fn bucket_daily(samples: &[ForecastSample]) -> Vec<DailySummary> {
    let mut days: Vec<DayBucket<'_>> = Vec::new();
    for sample in samples {
        let date = sample.timestamp.date_naive();
        match days.iter_mut().find(|day| day.date == date) {
            Some(day) => day.samples.push(sample),
            None => days.push(DayBucket {
                date,
                samples: vec![sample],
            }),
        }
    }

    days.iter()
        .take(MAX_DAYS)
        .filter_map(DayBucket::summarize)
        .collect()
}

struct DayBucket<'a> {
    date: NaiveDate,
    samples: Vec<&'a ForecastSample>,
}

impl DayBucket<'_> {
    fn summarize(&self) -> Option<DailySummary> {
        let representative_weather = representative_weather(&self.samples)?;
        let min_temp_c = self
            .samples
            .iter()
            .map(|s| s.temperature_c)
            .min_by(f32::total_cmp)?;
        let max_temp_c = self
            .samples
            .iter()
            .map(|s| s.temperature_c)
            .max_by(f32::total_cmp)?;

        Some(DailySummary {
            date: self.date,
            min_temp_c,
            max_temp_c,
            avg_feels_like_c: mean(self.samples.iter().map(|s| s.feels_like_c)),
            representative_weather,
            avg_precipitation_probability: mean(
                self.samples.iter().map(|s| s.precipitation_probability),
            ) * 100.0,
            avg_humidity: mean(self.samples.iter().map(|s| s.humidity)),
            sample_count: self.samples.len(),
        })
    }
}

/// Modal condition group of the day. Ties go to the group counted first;
/// the returned condition is the first sample of the winning group.
fn representative_weather(samples: &[&ForecastSample]) -> Option<WeatherCondition> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for sample in samples {
        let key = sample.condition.main.as_str();
        match counts.iter_mut().find(|(main, _)| *main == key) {
            Some((_, count)) => *count += 1,
            None => counts.push((key, 1)),
        }
    }

    let mut winner: Option<(&str, usize)> = None;
    for (main, count) in counts {
        if winner.is_none_or(|(_, best)| count > best) {
            winner = Some((main, count));
        }
    }

    let (main, _) = winner?;
    samples
        .iter()
        .find(|s| s.condition.main == main)
        .map(|s| s.condition.clone())
}

fn mean(values: impl Iterator<Item = f32>) -> f32 {
    let (sum, count) = values.fold((0.0_f32, 0_u32), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return 0.0;
    }
    sum / count as f32
}
