use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    error::WeatherError,
    model::{Coordinate, CurrentConditions, RawReading},
};

use super::{FORECAST_SLOTS, WeatherProvider};

const FORECAST: &str = "OpenWeather forecast";
const CURRENT: &str = "OpenWeather current weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(
        api_key: Option<String>,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(WeatherError::Client)?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn api_key(&self) -> Result<&str, WeatherError> {
        self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)
    }

    /// GET `{base_url}/{path}` with the standard metric query, returning the parsed body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        coordinate: Coordinate,
        extra: &[(&str, String)],
    ) -> Result<T, WeatherError> {
        let api_key = self.api_key()?;
        let url = format!("{}/{}", self.base_url, path);

        let mut query = vec![
            ("lat", coordinate.latitude().to_string()),
            ("lon", coordinate.longitude().to_string()),
            ("appid", api_key.to_string()),
            ("units", "metric".to_string()),
        ];
        query.extend(extra.iter().cloned());

        debug!(%url, lat = coordinate.latitude(), lon = coordinate.longitude(), "requesting {endpoint}");

        let res = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|source| WeatherError::Transport { endpoint, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| WeatherError::Transport { endpoint, source })?;

        if !status.is_success() {
            warn!(%status, "{endpoint} request rejected");
            return Err(WeatherError::Status {
                endpoint,
                status,
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| WeatherError::Decode { endpoint, source })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    #[serde(default)]
    feels_like: Option<f64>,
    humidity: f64,
    pressure: f64,
}

/// Forecast slots only need the label and icon.
#[derive(Debug, Deserialize)]
struct OwCondition {
    main: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwDescription {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwClouds {
    all: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: Option<String>,
    #[serde(default)]
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwDescription>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwCondition>,
    clouds: OwClouds,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

impl OwForecastEntry {
    fn into_reading(self) -> Result<RawReading, WeatherError> {
        let time = unix_to_utc(self.dt).ok_or_else(|| WeatherError::Malformed {
            endpoint: FORECAST,
            message: format!("timestamp {} out of range", self.dt),
        })?;

        let weather = self.weather.into_iter().next().ok_or_else(|| WeatherError::Malformed {
            endpoint: FORECAST,
            message: format!("entry at {time} has no weather condition"),
        })?;

        Ok(RawReading {
            time,
            temperature_c: self.main.temp,
            humidity_pct: self.main.humidity,
            cloud_cover_pct: self.clouds.all,
            pressure_hpa: self.main.pressure,
            wind_speed_mps: self.wind.speed,
            condition: weather.main,
            icon: weather.icon,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_forecast(&self, coordinate: Coordinate) -> Result<Vec<RawReading>, WeatherError> {
        let parsed: OwForecastResponse = self
            .get_json(FORECAST, "forecast", coordinate, &[("cnt", FORECAST_SLOTS.to_string())])
            .await?;

        let readings = parsed
            .list
            .into_iter()
            .map(OwForecastEntry::into_reading)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = readings.len(), "forecast readings received");
        Ok(readings)
    }

    async fn fetch_current(&self, coordinate: Coordinate) -> Result<CurrentConditions, WeatherError> {
        let parsed: OwCurrentResponse = self.get_json(CURRENT, "weather", coordinate, &[]).await?;

        let description = parsed
            .weather
            .first()
            .map(|w| title_case(&w.description))
            .ok_or_else(|| WeatherError::Malformed {
                endpoint: CURRENT,
                message: "response has no weather condition".to_string(),
            })?;

        let feels_like = parsed.main.feels_like.ok_or_else(|| WeatherError::Malformed {
            endpoint: CURRENT,
            message: "response has no feels_like temperature".to_string(),
        })?;

        Ok(CurrentConditions {
            city: parsed.name.unwrap_or_else(|| "Unknown".to_string()),
            country: parsed.sys.country.unwrap_or_default(),
            temperature_c: round2(parsed.main.temp),
            feels_like_c: round2(feels_like),
            humidity_pct: parsed.main.humidity.round().clamp(0.0, 100.0) as u8,
            wind_speed_mps: round2(parsed.wind.speed),
            pressure_hpa: parsed.main.pressure,
            description,
        })
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Upper-cases the first letter of every word, lower-cases the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
