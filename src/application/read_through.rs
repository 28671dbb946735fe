//! Read-through cache helpers.
//!
//! Cache failures are logged and swallowed: a read always falls back to the
//! store, and a failed write only costs a future cache miss.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::ports::Cache;

/// Cached value under `key`, or `None` on miss, outage or undecodable entry.
pub(crate) async fn cached<T: DeserializeOwned>(cache: &dyn Cache, key: &str) -> Option<T> {
    match cache.get(key).await {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding undecodable cache entry");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(key, error = %e, "Cache read failed, falling back to store");
            None
        }
    }
}

/// Stores `value` under `key`; failures are logged only.
pub(crate) async fn remember<T: Serialize>(
    cache: &dyn Cache,
    key: &str,
    value: &T,
    ttl: Option<Duration>,
) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(key, error = %e, "Could not encode cache entry");
            return;
        }
    };
    if let Err(e) = cache.set(key, &raw, ttl).await {
        tracing::warn!(key, error = %e, "Cache write failed");
    }
}

/// Drops `key`; failures are logged only.
pub(crate) async fn forget(cache: &dyn Cache, key: &str) {
    if let Err(e) = cache.delete(key).await {
        tracing::warn!(key, error = %e, "Cache invalidation failed");
    }
}
