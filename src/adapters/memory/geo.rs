//! Fixed place-to-timezone table.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::domain::foundation::{DomainError, ErrorCode, Timezone};
use crate::ports::TimezoneResolver;

/// Resolves places from a fixed table, case-insensitively.
#[derive(Debug, Default, Clone)]
pub struct StaticTimezoneResolver {
    places: HashMap<String, Timezone>,
}

impl StaticTimezoneResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_place(mut self, place: &str, timezone: Timezone) -> Self {
        self.places.insert(place.to_lowercase(), timezone);
        self
    }
}

#[async_trait]
impl TimezoneResolver for StaticTimezoneResolver {
    async fn resolve(&self, place: &str) -> Result<Timezone, DomainError> {
        self.places
            .get(&place.trim().to_lowercase())
            .copied()
            .ok_or_else(|| {
                DomainError::new(ErrorCode::GeocodingError, format!("Unknown place '{}'", place))
            })
    }
}
