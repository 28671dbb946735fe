//! Google Maps backed [`TimezoneResolver`].
//!
//! Resolution takes two calls: the Geocoding API turns the place name into
//! coordinates, then the Time Zone API names the zone at those coordinates.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use crate::config::GeoConfig;
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, Timezone};
use crate::ports::TimezoneResolver;

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimezoneResponse {
    status: String,
    time_zone_id: Option<String>,
}

fn geocoding_error(message: impl Into<String>) -> DomainError {
    DomainError::new(ErrorCode::GeocodingError, message)
}

pub struct GoogleMapsTimezoneResolver {
    http: Client,
    api_key: Secret<String>,
    base_url: String,
}

impl GoogleMapsTimezoneResolver {
    /// `None` when no API key is configured.
    pub fn from_config(config: &GeoConfig) -> Result<Option<Self>, DomainError> {
        let Some(key) = config.google_maps_api_key.as_ref().filter(|k| !k.is_empty()) else {
            return Ok(None);
        };

        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| geocoding_error(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Some(Self {
            http,
            api_key: Secret::new(key.clone()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }))
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        api: &str,
        params: &[(&str, String)],
    ) -> Result<T, DomainError> {
        let mut query: Vec<(&str, String)> = params.to_vec();
        query.push(("key", self.api_key.expose_secret().clone()));

        self.http
            .get(format!("{}/{}/json", self.base_url, api))
            .query(&query)
            .send()
            .await
            .map_err(|e| geocoding_error(format!("{} request failed: {}", api, e)))?
            .error_for_status()
            .map_err(|e| geocoding_error(format!("{} request failed: {}", api, e)))?
            .json()
            .await
            .map_err(|e| geocoding_error(format!("{} returned unreadable body: {}", api, e)))
    }

    async fn locate(&self, place: &str) -> Result<Location, DomainError> {
        let response: GeocodeResponse =
            self.get("geocode", &[("address", place.to_string())]).await?;
        first_location(place, response)
    }

    async fn zone_at(&self, location: Location) -> Result<Timezone, DomainError> {
        let response: TimezoneResponse = self
            .get(
                "timezone",
                &[
                    ("location", format!("{},{}", location.lat, location.lng)),
                    ("timestamp", Timestamp::now().as_unix_secs().to_string()),
                ],
            )
            .await?;
        zone_of(response)
    }
}

fn first_location(place: &str, response: GeocodeResponse) -> Result<Location, DomainError> {
    if response.status != "OK" {
        return Err(geocoding_error(format!(
            "Geocoding {:?} failed with status {}",
            place, response.status
        )));
    }
    response
        .results
        .first()
        .map(|r| r.geometry.location)
        .ok_or_else(|| geocoding_error(format!("No geocoding results for {:?}", place)))
}

fn zone_of(response: TimezoneResponse) -> Result<Timezone, DomainError> {
    if response.status != "OK" {
        return Err(geocoding_error(format!(
            "Time zone lookup failed with status {}",
            response.status
        )));
    }
    let name = response
        .time_zone_id
        .ok_or_else(|| geocoding_error("Time zone lookup returned no zone id"))?;
    Timezone::parse(&name).map_err(|e| geocoding_error(e.to_string()))
}

#[async_trait]
impl TimezoneResolver for GoogleMapsTimezoneResolver {
    async fn resolve(&self, place: &str) -> Result<Timezone, DomainError> {
        let location = self.locate(place).await?;
        let zone = self.zone_at(location).await?;
        tracing::debug!(place, zone = zone.name(), "resolved timezone");
        Ok(zone)
    }
}

impl std::fmt::Debug for GoogleMapsTimezoneResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleMapsTimezoneResolver")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
