use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::error::LocationError;

/// A validated latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    #[serde(rename = "lat")]
    latitude: f64,
    #[serde(rename = "lng")]
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, LocationError> {
        let valid = (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(LocationError::InvalidCoordinate { latitude, longitude });
        }
        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// A resolved place. Serializes flat as `{city, country, lat, lng}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub city: String,
    pub country: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
}

impl Location {
    pub const UNKNOWN: &'static str = "Unknown";

    /// Builds a location, substituting "Unknown" for absent or blank names.
    pub fn new(city: Option<String>, country: Option<String>, coordinate: Coordinate) -> Self {
        Self {
            city: or_unknown(city),
            country: or_unknown(country),
            coordinate,
        }
    }
}

fn or_unknown(name: Option<String>) -> String {
    name.filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| Location::UNKNOWN.to_string())
}

/// One 3-hour forecast slot as delivered by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct RawReading {
    pub time: DateTime<Utc>,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub cloud_cover_pct: f64,
    pub pressure_hpa: f64,
    pub wind_speed_mps: f64,
    pub condition: String,
    pub icon: String,
}

/// Aggregated view of one forecast day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub day: String,
    pub min_temp: f64,
    pub max_temp: f64,
    pub avg_temp: f64,
    pub humidity: u32,
    pub cloud_cover: u32,
    pub wind_speed: f64,
    pub condition: String,
    pub icon: String,
    pub rain_probability: f64,
    pub will_rain: bool,
}

/// Single-point observation used by the console report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub city: String,
    pub country: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub pressure_hpa: f64,
    pub description: String,
}
