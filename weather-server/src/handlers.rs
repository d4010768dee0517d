//! Route handlers for the `/api` surface.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::Uri,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use weather_core::{Coordinate, DailySummary, Location, summarize_upcoming};

use crate::{AppState, error::ApiError};

pub const SERVICE_NAME: &str = "Ultimate Weather AI";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct LocationResponse {
    pub success: bool,
    pub location: Location,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub success: bool,
    pub location: Location,
    pub forecast: Vec<DailySummary>,
    pub timestamp: DateTime<Utc>,
}

/// Raw query strings; values that don't parse as numbers count as absent.
#[derive(Debug, Default)]
pub struct ForecastQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

impl ForecastQuery {
    /// First occurrence of each parameter wins; repeats are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "lat" => &mut query.lat,
                "lng" => &mut query.lng,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }

    /// A coordinate only when both parts parse.
    fn coordinate(&self) -> Result<Option<Coordinate>, ApiError> {
        let parse = |v: &Option<String>| v.as_deref().and_then(|s| s.trim().parse::<f64>().ok());

        match (parse(&self.lat), parse(&self.lng)) {
            (Some(lat), Some(lng)) => Ok(Some(Coordinate::new(lat, lng)?)),
            _ => Ok(None),
        }
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        timestamp: Utc::now(),
    })
}

/// Caller's approximate location from its IP address.
pub async fn location(State(state): State<AppState>) -> Result<Json<LocationResponse>, ApiError> {
    let location = state.resolver.resolve(None).await?;

    Ok(Json(LocationResponse {
        success: true,
        location,
        timestamp: Utc::now(),
    }))
}

/// Four-day forecast with rain predictions, for `lat`/`lng` or the caller's IP location.
pub async fn forecast(
    State(state): State<AppState>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<ForecastResponse>, ApiError> {
    // An unreadable query string is treated like one without coordinates.
    let query = match pairs {
        Ok(Query(pairs)) => ForecastQuery::from_pairs(pairs),
        Err(rejection) => {
            tracing::debug!(%rejection, "ignoring unreadable query string");
            ForecastQuery::default()
        }
    };

    let location = state.resolver.resolve(query.coordinate()?).await?;

    let readings = state.provider.fetch_forecast(location.coordinate).await?;
    let forecast = summarize_upcoming(&readings)?;

    tracing::info!(
        city = %location.city,
        days = forecast.len(),
        "forecast served"
    );

    Ok(Json(ForecastResponse {
        success: true,
        location,
        forecast,
        timestamp: Utc::now(),
    }))
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound {
        path: uri.path().to_string(),
    }
}
