use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use inquire::Password;
use tracing::info;
use weather_core::{
    Config, Coordinate, FeelsLikeModel, LocationResolver, provider_from_config, summarize_upcoming,
};

use crate::report;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    /// Print debug logs to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Current conditions plus the model's feels-like estimate.
    Now {
        #[command(flatten)]
        at: CoordinateArgs,
    },

    /// Four-day forecast with rain predictions.
    Forecast {
        #[command(flatten)]
        at: CoordinateArgs,

        /// Print the summaries as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

/// Optional explicit position; without it the location comes from the IP address.
#[derive(Debug, Args)]
pub struct CoordinateArgs {
    /// Latitude in degrees.
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude in degrees.
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lng: Option<f64>,
}

impl CoordinateArgs {
    pub fn coordinate(&self) -> Result<Option<Coordinate>> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Ok(Some(Coordinate::new(lat, lng)?)),
            _ => Ok(None),
        }
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Now { at } => now(&at).await,
            Command::Forecast { at, json } => forecast(&at, json).await,
        }
    }
}

fn configure() -> Result<()> {
    // File values only: environment overrides must not be written back.
    let mut cfg = Config::load_file()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_help_message("Get one at https://home.openweathermap.org/api_keys")
        .prompt()
        .context("Failed to read API key")?;

    cfg.set_api_key(api_key.trim().to_string());
    cfg.save()?;

    println!("Saved API key to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn now(at: &CoordinateArgs) -> Result<()> {
    let config = Config::load()?;
    let resolver = LocationResolver::from_config(&config)?;
    let provider = provider_from_config(&config)?;

    let location = resolver
        .resolve(at.coordinate()?)
        .await
        .context("Failed to detect location. Please check your internet connection.")?;
    info!(city = %location.city, "location detected");

    let current = provider
        .fetch_current(location.coordinate)
        .await
        .context("Failed to fetch weather data")?;

    let model = FeelsLikeModel::fit()?;
    let predicted = model.predict(f64::from(current.humidity_pct), current.temperature_c);

    print!("{}", report::current(&current, predicted, Local::now()));
    Ok(())
}

async fn forecast(at: &CoordinateArgs, json: bool) -> Result<()> {
    let config = Config::load()?;
    let resolver = LocationResolver::from_config(&config)?;
    let provider = provider_from_config(&config)?;

    let location = resolver
        .resolve(at.coordinate()?)
        .await
        .context("Failed to detect location. Please check your internet connection.")?;

    let readings = provider
        .fetch_forecast(location.coordinate)
        .await
        .context("Failed to fetch forecast")?;

    let days = summarize_upcoming(&readings)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&days)?);
    } else {
        print!("{}", report::forecast(&location, &days));
    }
    Ok(())
}
