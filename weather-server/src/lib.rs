//! HTTP API serving location lookup and 4-day forecasts with rain predictions.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use std::{any::Any, sync::Arc};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};
use weather_core::{Config, LocationResolver, WeatherProvider, provider_from_config};

pub mod error;
pub mod handlers;

use error::ErrorBody;

/// Application state shared across handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub resolver: Arc<LocationResolver>,
    pub provider: Arc<dyn WeatherProvider>,
}

impl AppState {
    pub fn new(resolver: LocationResolver, provider: Arc<dyn WeatherProvider>) -> Self {
        Self {
            resolver: Arc::new(resolver),
            provider,
        }
    }

    /// Build the HTTP-backed collaborators named in `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let resolver = LocationResolver::from_config(config)?;
        let provider: Arc<dyn WeatherProvider> = provider_from_config(config)?.into();
        Ok(Self::new(resolver, provider))
    }
}

/// The application router with all routes and middleware.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    let api = Router::new()
        .route("/health", get(handlers::health))
        .route("/location", get(handlers::location))
        .route("/forecast", get(handlers::forecast));

    Router::new()
        .nest("/api", api)
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(internal_error))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn internal_error(_: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("handler panicked");

    let body = ErrorBody {
        error: "Internal server error".to_string(),
        success: false,
        reason: None,
        path: None,
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
