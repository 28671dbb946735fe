//! Redis configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL
    pub url: String,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl RedisConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate Redis configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("REDIS__URL"));
        }
        if !self.url.starts_with("redis://") && !self.url.starts_with("rediss://") {
            return Err(ValidationError::InvalidRedisUrl);
        }
        Ok(())
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_url(url: &str) -> RedisConfig {
        RedisConfig {
            url: url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn connect_timeout_defaults_to_five_seconds() {
        assert_eq!(RedisConfig::default().timeout(), Duration::from_secs(5));
    }

    #[test]
    fn unset_url_names_the_env_var() {
        assert_eq!(
            RedisConfig::default().validate(),
            Err(ValidationError::MissingRequired("REDIS__URL"))
        );
    }

    #[test]
    fn only_redis_schemes_are_accepted() {
        assert_eq!(
            with_url("http://localhost:6379").validate(),
            Err(ValidationError::InvalidRedisUrl)
        );
        assert!(with_url("redis://localhost:6379/0").validate().is_ok());
        assert!(with_url("rediss://oracle:pw@cache.internal:6380").validate().is_ok());
    }
}
