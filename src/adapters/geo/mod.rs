//! Geocoding adapters.
//!
//! - `GoogleMapsTimezoneResolver` - City name to IANA timezone via Google Maps

mod google_maps;

pub use google_maps::GoogleMapsTimezoneResolver;
