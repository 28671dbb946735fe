//! Geo/timezone lookup port.

use crate::domain::foundation::{DomainError, Timezone};
use async_trait::async_trait;

/// Resolves a free-text place name to an IANA timezone.
///
/// Called once per registration; the result is stored on the user.
#[async_trait]
pub trait TimezoneResolver: Send + Sync {
    /// # Errors
    ///
    /// - `GeocodingError` if the place is unknown or the service fails
    async fn resolve(&self, place: &str) -> Result<Timezone, DomainError>;
}
