use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::{
    error::LocationError,
    model::{Coordinate, Location},
};

use super::ReverseGeocoder;

const SERVICE: &str = "reverse geocoding";
const USER_AGENT: &str = concat!("weather-core/", env!("CARGO_PKG_VERSION"));

/// Reverse geocoding against a Nominatim (OpenStreetMap) `/reverse` endpoint.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    county: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

impl NominatimAddress {
    /// Most specific settlement name available.
    fn place(self) -> (Option<String>, Option<String>) {
        let place = self
            .city
            .or(self.town)
            .or(self.village)
            .or(self.municipality)
            .or(self.county)
            .or(self.state);
        (place, self.country)
    }
}

impl NominatimGeocoder {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, LocationError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(LocationError::Client)?;

        Ok(Self {
            url: url.to_string(),
            http,
        })
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse(&self, coordinate: Coordinate) -> Result<Location, LocationError> {
        let res = self
            .http
            .get(&self.url)
            .query(&[
                ("lat", coordinate.latitude().to_string()),
                ("lon", coordinate.longitude().to_string()),
                ("format", "json".to_string()),
                ("addressdetails", "1".to_string()),
                ("zoom", "10".to_string()),
            ])
            .send()
            .await
            .map_err(|source| LocationError::Transport { service: SERVICE, source })?;

        let status = res.status();
        if !status.is_success() {
            return Err(LocationError::Status { service: SERVICE, status });
        }

        let body: NominatimResponse = res
            .json()
            .await
            .map_err(|source| LocationError::Decode { service: SERVICE, source })?;

        if let Some(reason) = body.error {
            debug!(%reason, "reverse geocoder returned no match");
            return Err(LocationError::NotFound { service: SERVICE });
        }

        let (city, country) = body.address.map(NominatimAddress::place).unwrap_or_default();
        Ok(Location::new(city, country, coordinate))
    }
}
