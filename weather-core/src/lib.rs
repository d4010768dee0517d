//! Core library for the `weather` CLI and the forecast API server.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Location resolution (IP geolocation, reverse geocoding)
//! - Abstraction over weather providers
//! - Daily aggregation of 3-hourly forecasts
//! - The rain and feels-like models
//!
//! It is used by `weather-cli` and `weather-server`, but can also be reused by other binaries.

pub mod config;
pub mod error;
pub mod forecast;
pub mod location;
pub mod model;
pub mod predict;
pub mod provider;

pub use config::Config;
pub use error::{LocationError, PredictError, WeatherError};
pub use forecast::{summarize_days, summarize_upcoming};
pub use location::LocationResolver;
pub use model::{Coordinate, CurrentConditions, DailySummary, Location, RawReading};
pub use predict::{FeelsLikeModel, RainModel};
pub use provider::{WeatherProvider, provider_from_config};
