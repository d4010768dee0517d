//! Human-friendly console output.

use chrono::{DateTime, TimeZone};
use std::fmt::{self, Display, Formatter};
use weather_core::{CurrentConditions, DailySummary, Location};

const WIDTH: usize = 75;

/// Current conditions plus the model's estimate and its delta against the provider's feels-like.
pub fn current<Tz>(weather: &CurrentConditions, predicted: f64, at: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    CurrentReport {
        weather,
        predicted,
        at,
    }
    .to_string()
}

/// One row per forecast day.
pub fn forecast(location: &Location, days: &[DailySummary]) -> String {
    ForecastReport { location, days }.to_string()
}

struct CurrentReport<'a, Tz: TimeZone> {
    weather: &'a CurrentConditions,
    predicted: f64,
    at: DateTime<Tz>,
}

impl<Tz> Display for CurrentReport<'_, Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let weather = self.weather;
        let predicted = self.predicted;
        let rule = "=".repeat(WIDTH);
        let difference = predicted - weather.feels_like_c;

        writeln!(f, "\n{rule}")?;
        writeln!(f, "{:^WIDTH$}", "WEATHER REPORT")?;
        writeln!(f, "{rule}")?;

        let place = if weather.country.is_empty() {
            weather.city.clone()
        } else {
            format!("{}, {}", weather.city, weather.country)
        };
        writeln!(f, "\nLocation: {}", place.to_uppercase())?;
        writeln!(f, "Time:     {}", self.at.format("%Y-%m-%d %H:%M:%S"))?;

        writeln!(f, "\n--- CURRENT CONDITIONS ---")?;
        writeln!(f, "| Temperature  {}C", weather.temperature_c)?;
        writeln!(f, "| Feels like   {}C", weather.feels_like_c)?;
        writeln!(f, "| Wind         {} m/s", weather.wind_speed_mps)?;
        writeln!(f, "| Humidity     {}%", weather.humidity_pct)?;
        writeln!(f, "| Pressure     {} hPa", weather.pressure_hpa)?;
        writeln!(f, "| Condition    {}", weather.description)?;

        writeln!(f, "\n--- MODEL ESTIMATE ---")?;
        writeln!(f, "| Feels like   {predicted}C")?;
        writeln!(f, "| Difference   {} {difference:+.2}C", trend(difference))?;
        writeln!(
            f,
            "| Based on humidity ({}%) and temperature ({}C).",
            weather.humidity_pct, weather.temperature_c
        )?;

        writeln!(f, "\n{rule}")
    }
}

struct ForecastReport<'a> {
    location: &'a Location,
    days: &'a [DailySummary],
}

impl Display for ForecastReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let location = self.location;
        writeln!(
            f,
            "Forecast for {}, {} ({:.2}, {:.2})\n",
            location.city,
            location.country,
            location.coordinate.latitude(),
            location.coordinate.longitude()
        )?;

        if self.days.is_empty() {
            return writeln!(f, "No forecast data for the coming days.");
        }

        writeln!(
            f,
            "{:<10}  {:<9}  {:>6}  {:>6}  {:>6}  {:>4}  {:>5}  {:>5}  {:<12}  {:>6}",
            "Date", "Day", "Min", "Max", "Avg", "Hum", "Cloud", "Wind", "Condition", "Rain"
        )?;
        for day in self.days {
            writeln!(
                f,
                "{:<10}  {:<9}  {:>6.1}  {:>6.1}  {:>6.1}  {:>3}%  {:>4}%  {:>5.1}  {:<12}  {:>5.1}%{}",
                day.date.format("%Y-%m-%d").to_string(),
                day.day,
                day.min_temp,
                day.max_temp,
                day.avg_temp,
                day.humidity,
                day.cloud_cover,
                day.wind_speed,
                day.condition,
                day.rain_probability,
                if day.will_rain { "  rain likely" } else { "" }
            )?;
        }
        Ok(())
    }
}

fn trend(difference: f64) -> &'static str {
    if difference > 0.0 {
        "[UP]"
    } else if difference < 0.0 {
        "[DOWN]"
    } else {
        "[SAME]"
    }
}
