//! Redis adapters.
//!
//! - `RedisCache` - Read-through cache entries and notification markers

mod cache;

pub use cache::RedisCache;

use redis::aio::MultiplexedConnection;

use crate::config::RedisConfig;
use crate::domain::foundation::{DomainError, ErrorCode};

/// Opens a multiplexed connection, bounded by the configured timeout.
pub async fn connect(config: &RedisConfig) -> Result<MultiplexedConnection, DomainError> {
    let client = redis::Client::open(config.url.as_str()).map_err(cache_error)?;
    tokio::time::timeout(config.timeout(), client.get_multiplexed_tokio_connection())
        .await
        .map_err(|_| {
            DomainError::new(
                ErrorCode::CacheError,
                format!("Timed out connecting to Redis after {:?}", config.timeout()),
            )
        })?
        .map_err(cache_error)
}

fn cache_error(e: redis::RedisError) -> DomainError {
    DomainError::new(ErrorCode::CacheError, format!("Redis error: {}", e))
}
