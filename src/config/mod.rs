//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `GOAL_ORACLE` prefix
//! and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use goal_oracle::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod error;
mod geo;
mod redis;
mod runtime;
mod scheduler;
mod vk;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use geo::GeoConfig;
pub use redis::RedisConfig;
pub use runtime::{Environment, RuntimeConfig};
pub use scheduler::SchedulerConfig;
pub use vk::VkConfig;

use serde::Deserialize;

use crate::application::AppSettings;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Environment, log filter, default timezone
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// PostgreSQL connection
    pub database: DatabaseConfig,

    /// Cache and notification markers
    pub redis: RedisConfig,

    /// Chat platform
    pub vk: VkConfig,

    /// Place name to timezone resolution
    #[serde(default)]
    pub geo: GeoConfig,

    /// Background pass intervals
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `GOAL_ORACLE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `GOAL_ORACLE__DATABASE__URL=...` -> `database.url = ...`
    /// - `GOAL_ORACLE__VK__GROUP_ID=42` -> `vk.group_id = 42`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("GOAL_ORACLE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.runtime.validate()?;
        self.database.validate()?;
        self.redis.validate()?;
        self.vk.validate()?;
        self.geo.validate()?;
        self.scheduler.validate()?;
        Ok(())
    }

    /// Settings handed to the application context.
    pub fn app_settings(&self) -> Result<AppSettings, ValidationError> {
        Ok(AppSettings {
            default_timezone: self.runtime.timezone()?,
            lifecycle_interval: self.scheduler.lifecycle_interval(),
            engagement: self.scheduler.engagement_settings(),
        })
    }

    pub fn is_production(&self) -> bool {
        self.runtime.is_production()
    }
}
