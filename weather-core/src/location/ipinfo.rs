use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    error::LocationError,
    model::{Coordinate, Location},
};

use super::IpLocator;

const SERVICE: &str = "IP geolocation";

/// ipinfo.io-style lookup: `{"city": .., "country": .., "loc": "lat,lng"}`.
#[derive(Debug, Clone)]
pub struct IpInfoLocator {
    url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    city: Option<String>,
    country: Option<String>,
    loc: Option<String>,
}

impl IpInfoResponse {
    fn coordinate(&self) -> Option<Coordinate> {
        let (lat, lng) = self.loc.as_deref()?.split_once(',')?;
        Coordinate::new(lat.trim().parse().ok()?, lng.trim().parse().ok()?).ok()
    }
}

impl IpInfoLocator {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, LocationError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LocationError::Client)?;

        Ok(Self {
            url: url.to_string(),
            http,
        })
    }
}

#[async_trait]
impl IpLocator for IpInfoLocator {
    async fn locate(&self) -> Result<Location, LocationError> {
        let res = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|source| LocationError::Transport { service: SERVICE, source })?;

        let status = res.status();
        if !status.is_success() {
            return Err(LocationError::Status { service: SERVICE, status });
        }

        let body: IpInfoResponse = res
            .json()
            .await
            .map_err(|source| LocationError::Decode { service: SERVICE, source })?;

        let coordinate = body
            .coordinate()
            .ok_or(LocationError::NoCoordinates { service: SERVICE })?;

        Ok(Location::new(body.city, body.country, coordinate))
    }
}
