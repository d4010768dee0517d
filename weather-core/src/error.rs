use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to the weather provider.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("No OpenWeather API key configured. Set OPENWEATHER_API_KEY or run `weather configure`.")]
    MissingApiKey,

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("Failed to parse {endpoint} JSON: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed {endpoint} payload: {message}")]
    Malformed {
        endpoint: &'static str,
        message: String,
    },
}

impl WeatherError {
    /// Coarse failure reason, suitable for surfacing to API clients.
    pub fn kind(&self) -> &'static str {
        match self {
            WeatherError::MissingApiKey => "config-missing",
            WeatherError::Client(_) | WeatherError::Transport { .. } | WeatherError::Status { .. } => {
                "transport"
            }
            WeatherError::Decode { .. } | WeatherError::Malformed { .. } => "parse",
        }
    }
}

/// Failures resolving where the caller is.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Coordinate out of range: ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request to {service} failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} responded with status {status}")]
    Status {
        service: &'static str,
        status: StatusCode,
    },

    #[error("Failed to parse {service} response: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} did not return a latitude/longitude pair")]
    NoCoordinates { service: &'static str },

    #[error("{service} found no place at this coordinate")]
    NotFound { service: &'static str },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PredictError {
    #[error("Training system is singular; cannot fit model")]
    Singular,
}
