//! Process-wide runtime settings

use serde::Deserialize;

use crate::domain::foundation::Timezone;

use super::error::ValidationError;

/// Runtime configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeConfig {
    /// Environment name
    #[serde(default)]
    pub environment: Environment,

    /// Rust log filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// IANA zone given to users without a resolvable city
    #[serde(default = "default_timezone")]
    pub default_timezone: String,
}

/// Application environment
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeConfig {
    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Parsed default timezone
    pub fn timezone(&self) -> Result<Timezone, ValidationError> {
        Timezone::parse(&self.default_timezone)
            .map_err(|_| ValidationError::InvalidTimezone(self.default_timezone.clone()))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.timezone().map(|_| ())
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            log_level: default_log_level(),
            default_timezone: default_timezone(),
        }
    }
}

fn default_log_level() -> String {
    "info,goal_oracle=debug,sqlx=warn".to_string()
}

fn default_timezone() -> String {
    "Asia/Yekaterinburg".to_string()
}
