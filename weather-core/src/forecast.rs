//! Turns the provider's flat 3-hourly readings into per-day summaries.

use chrono::{Days, Local, NaiveDate, TimeZone};
use std::collections::HashMap;
use tracing::debug;

use crate::{
    error::PredictError,
    model::{DailySummary, RawReading},
    predict::{RainFeatures, RainModel},
};

/// Days after today that get a summary.
pub const SUMMARY_DAYS: u64 = 4;

/// Summaries for the days after today in the host's local time zone.
pub fn summarize_upcoming(readings: &[RawReading]) -> Result<Vec<DailySummary>, PredictError> {
    summarize_days(readings, Local::now().date_naive(), &Local)
}

/// Summaries for `today + 1 ..= today + SUMMARY_DAYS`, in date order.
///
/// Readings are bucketed by their calendar date in `tz`. Days without any
/// reading are skipped, so the result may be shorter near the forecast horizon.
pub fn summarize_days<Tz: TimeZone>(
    readings: &[RawReading],
    today: NaiveDate,
    tz: &Tz,
) -> Result<Vec<DailySummary>, PredictError> {
    let buckets = group_by_date(readings, tz);
    let model = RainModel::fit()?;

    let summaries: Vec<DailySummary> = (1..=SUMMARY_DAYS)
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .filter_map(|date| {
            buckets
                .get(&date)
                .map(|bucket| summarize_bucket(date, bucket, &model))
        })
        .collect();

    debug!(
        readings = readings.len(),
        days = summaries.len(),
        "forecast aggregated"
    );
    Ok(summaries)
}

fn group_by_date<'a, Tz: TimeZone>(
    readings: &'a [RawReading],
    tz: &Tz,
) -> HashMap<NaiveDate, Vec<&'a RawReading>> {
    let mut buckets: HashMap<NaiveDate, Vec<&RawReading>> = HashMap::new();
    for reading in readings {
        let date = reading.time.with_timezone(tz).date_naive();
        buckets.entry(date).or_default().push(reading);
    }
    buckets
}

/// Callers guarantee `bucket` is non-empty.
fn summarize_bucket(date: NaiveDate, bucket: &[&RawReading], model: &RainModel) -> DailySummary {
    let temps: Vec<f64> = bucket.iter().map(|r| r.temperature_c).collect();
    let min_temp = temps.iter().copied().fold(f64::INFINITY, f64::min);
    let max_temp = temps.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let humidity = mean(bucket, |r| r.humidity_pct);
    let cloud_cover = mean(bucket, |r| r.cloud_cover_pct);
    let pressure = mean(bucket, |r| r.pressure_hpa);
    let wind_speed = mean(bucket, |r| r.wind_speed_mps);

    let rain_probability = model.rain_probability(RainFeatures {
        humidity_pct: humidity,
        cloud_cover_pct: cloud_cover,
        pressure_hpa: pressure,
        wind_speed_mps: wind_speed,
    });

    DailySummary {
        date,
        day: date.format("%A").to_string(),
        min_temp: round1(min_temp),
        max_temp: round1(max_temp),
        avg_temp: round1(mean(bucket, |r| r.temperature_c)),
        // Whole percent, truncated.
        humidity: humidity as u32,
        cloud_cover: cloud_cover as u32,
        wind_speed: round1(wind_speed),
        condition: most_frequent(bucket.iter().map(|r| r.condition.as_str()))
            .unwrap_or_default()
            .to_string(),
        icon: bucket.first().map(|r| r.icon.clone()).unwrap_or_default(),
        rain_probability,
        will_rain: will_rain(rain_probability),
    }
}

fn mean(bucket: &[&RawReading], field: impl Fn(&RawReading) -> f64) -> f64 {
    bucket.iter().map(|r| field(r)).sum::<f64>() / bucket.len() as f64
}

/// Rain is predicted only above an even chance.
fn will_rain(probability: f64) -> bool {
    probability > 50.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// The most common value; ties go to whichever value appeared first.
pub fn most_frequent<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    // Insertion-ordered tally keeps the tie-break deterministic.
    let mut tally: Vec<(&str, usize)> = Vec::new();
    for value in values {
        match tally.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, count)) => *count += 1,
            None => tally.push((value, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (value, count) in tally {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}
