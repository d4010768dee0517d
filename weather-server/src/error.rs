//! JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use weather_core::{LocationError, PredictError, WeatherError};

/// Everything a handler can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Coordinates out of range")]
    InvalidCoordinate(#[source] LocationError),

    #[error("Could not detect location")]
    Location(#[source] LocationError),

    #[error("API key not configured")]
    MissingApiKey,

    #[error("Could not fetch forecast")]
    Forecast(#[source] WeatherError),

    #[error("Internal server error")]
    Model(#[from] PredictError),

    #[error("Endpoint not found")]
    NotFound { path: String },
}

impl From<LocationError> for ApiError {
    fn from(err: LocationError) -> Self {
        match err {
            LocationError::InvalidCoordinate { .. } => ApiError::InvalidCoordinate(err),
            other => ApiError::Location(other),
        }
    }
}

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        match err {
            WeatherError::MissingApiKey => ApiError::MissingApiKey,
            other => ApiError::Forecast(other),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidCoordinate(_) | ApiError::Location(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::MissingApiKey | ApiError::Forecast(_) | ApiError::Model(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn reason(&self) -> Option<&'static str> {
        match self {
            ApiError::MissingApiKey => Some(WeatherError::MissingApiKey.kind()),
            ApiError::Forecast(err) => Some(err.kind()),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            ApiError::InvalidCoordinate(err) => tracing::debug!(error = %err, "rejected coordinates"),
            ApiError::Location(err) => tracing::warn!(error = %err, "location lookup failed"),
            ApiError::Forecast(err) => tracing::error!(error = %err, "forecast fetch failed"),
            ApiError::Model(err) => tracing::error!(error = %err, "rain model failed to fit"),
            ApiError::MissingApiKey => tracing::error!("forecast requested without an API key"),
            ApiError::NotFound { path } => tracing::debug!(%path, "no route"),
        }

        let body = ErrorBody {
            error: self.to_string(),
            success: false,
            reason: self.reason(),
            path: match self {
                ApiError::NotFound { path } => Some(path),
                _ => None,
            },
        };

        (status, Json(body)).into_response()
    }
}
