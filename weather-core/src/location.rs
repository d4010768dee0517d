//! Working out where the caller is.
//!
//! Explicit coordinates are echoed back with a reverse-geocoded place name;
//! without them the caller's approximate position comes from IP geolocation.

use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};
use tracing::{debug, warn};

use crate::{
    Config,
    error::LocationError,
    model::{Coordinate, Location},
};

pub mod ipinfo;
pub mod nominatim;

pub use ipinfo::IpInfoLocator;
pub use nominatim::NominatimGeocoder;

/// Approximate position of the current host, from its public IP address.
#[async_trait]
pub trait IpLocator: Send + Sync + Debug {
    async fn locate(&self) -> Result<Location, LocationError>;
}

/// Place name lookup for a known coordinate.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync + Debug {
    async fn reverse(&self, coordinate: Coordinate) -> Result<Location, LocationError>;
}

#[derive(Debug, Clone)]
pub struct LocationResolver {
    ip: Arc<dyn IpLocator>,
    geocoder: Arc<dyn ReverseGeocoder>,
}

impl LocationResolver {
    pub fn new(ip: Arc<dyn IpLocator>, geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        Self { ip, geocoder }
    }

    /// Resolver backed by the HTTP services named in `config`.
    pub fn from_config(config: &Config) -> Result<Self, LocationError> {
        let ip = IpInfoLocator::new(&config.endpoints.ip_geolocation, config.request_timeout())?;
        let geocoder =
            NominatimGeocoder::new(&config.endpoints.reverse_geocoding, config.request_timeout())?;
        Ok(Self::new(Arc::new(ip), Arc::new(geocoder)))
    }

    /// Resolve a location. Exactly one upstream call is made and failures are not retried.
    pub async fn resolve(&self, coordinate: Option<Coordinate>) -> Result<Location, LocationError> {
        let result = match coordinate {
            Some(coordinate) => {
                debug!(
                    lat = coordinate.latitude(),
                    lng = coordinate.longitude(),
                    "reverse geocoding supplied coordinate"
                );
                self.geocoder.reverse(coordinate).await.map(|found| Location {
                    coordinate,
                    ..found
                })
            }
            None => {
                debug!("detecting location via IP address");
                self.ip.locate().await
            }
        };

        match &result {
            Ok(location) => debug!(
                city = %location.city,
                country = %location.country,
                "location resolved"
            ),
            Err(err) => warn!(error = %err, "location resolution failed"),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct FixedIp(Option<Location>);

    #[async_trait]
    impl IpLocator for FixedIp {
        async fn locate(&self) -> Result<Location, LocationError> {
            self.0
                .clone()
                .ok_or(LocationError::NoCoordinates { service: "test" })
        }
    }

    /// Reports a place slightly off the requested point, the way real geocoders snap to a feature.
    #[derive(Debug)]
    struct Snapping;

    #[async_trait]
    impl ReverseGeocoder for Snapping {
        async fn reverse(&self, coordinate: Coordinate) -> Result<Location, LocationError> {
            let snapped = Coordinate::new(coordinate.latitude() + 0.01, coordinate.longitude())?;
            Ok(Location::new(Some("Westminster".into()), Some("United Kingdom".into()), snapped))
        }
    }

    #[derive(Debug)]
    struct Failing;

    #[async_trait]
    impl ReverseGeocoder for Failing {
        async fn reverse(&self, _: Coordinate) -> Result<Location, LocationError> {
            Err(LocationError::NoCoordinates { service: "test" })
        }
    }

    fn paris() -> Location {
        let coordinate = Coordinate::new(48.85, 2.35).expect("valid coordinate");
        Location::new(Some("Paris".into()), Some("FR".into()), coordinate)
    }

    #[tokio::test]
    async fn supplied_coordinate_is_returned_unchanged() {
        let resolver = LocationResolver::new(Arc::new(FixedIp(None)), Arc::new(Snapping));
        let coordinate = Coordinate::new(51.5, -0.12).expect("valid coordinate");

        let location = resolver.resolve(Some(coordinate)).await.expect("resolves");

        assert_eq!(location.coordinate, coordinate);
        assert_eq!(location.city, "Westminster");
    }

    #[tokio::test]
    async fn reverse_geocode_failure_is_an_error() {
        let resolver = LocationResolver::new(Arc::new(FixedIp(Some(paris()))), Arc::new(Failing));
        let coordinate = Coordinate::new(51.5, -0.12).expect("valid coordinate");

        assert!(resolver.resolve(Some(coordinate)).await.is_err());
    }

    #[tokio::test]
    async fn missing_coordinate_uses_ip_lookup() {
        let resolver = LocationResolver::new(Arc::new(FixedIp(Some(paris()))), Arc::new(Failing));

        let location = resolver.resolve(None).await.expect("resolves");
        assert_eq!(location, paris());
    }

    #[tokio::test]
    async fn ip_lookup_failure_is_an_error() {
        let resolver = LocationResolver::new(Arc::new(FixedIp(None)), Arc::new(Snapping));

        let err = resolver.resolve(None).await.unwrap_err();
        assert!(matches!(err, LocationError::NoCoordinates { .. }));
    }
}
