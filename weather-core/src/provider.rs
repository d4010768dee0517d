use crate::{
    Config,
    error::WeatherError,
    model::{Coordinate, CurrentConditions, RawReading},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Number of 3-hour slots requested from the forecast endpoint (5 days).
pub const FORECAST_SLOTS: u32 = 40;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch the multi-day forecast as a flat list of 3-hourly readings.
    async fn fetch_forecast(&self, coordinate: Coordinate) -> Result<Vec<RawReading>, WeatherError>;

    /// Fetch the current single-point observation.
    async fn fetch_current(&self, coordinate: Coordinate) -> Result<CurrentConditions, WeatherError>;
}

/// Construct the provider from config. A missing API key is not an error here:
/// the provider reports it on first use, so other endpoints keep working.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn WeatherProvider>, WeatherError> {
    let provider = OpenWeatherProvider::new(
        config.api_key().map(str::to_owned),
        &config.endpoints.openweather,
        config.request_timeout(),
    )?;

    Ok(Box::new(provider))
}
