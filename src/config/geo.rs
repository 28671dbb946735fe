//! Geocoding configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Google Maps configuration. Without a key every user gets the default
/// timezone.
#[derive(Debug, Clone, Deserialize)]
pub struct GeoConfig {
    pub google_maps_api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl GeoConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn has_key(&self) -> bool {
        self.google_maps_api_key
            .as_ref()
            .is_some_and(|k| !k.is_empty())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.base_url.starts_with("https://") {
            return Err(ValidationError::InsecureApiUrl("GEO__BASE_URL"));
        }
        Ok(())
    }
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            google_maps_api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://maps.googleapis.com/maps/api".to_string()
}

fn default_timeout() -> u64 {
    10
}
