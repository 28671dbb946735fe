//! Key/value cache port.
//!
//! Serves two roles: a read-through cache in front of the store, and the
//! ledger for short-lived markers such as notification dedup and dialog state.

use crate::domain::foundation::DomainError;
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait Cache: Send + Sync {
    /// Returns `None` for a missing or expired key.
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Stores `value`; `ttl = None` keeps it until deleted.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), DomainError>;

    /// Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), DomainError>;
}
