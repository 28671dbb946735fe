//! Background pass configuration

use serde::Deserialize;
use std::time::Duration;

use crate::application::EngagementSettings;
use crate::domain::foundation::GoalTypeId;

use super::error::ValidationError;

/// Intervals of the lifecycle and engagement passes
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_interval")]
    pub lifecycle_interval_secs: u64,

    #[serde(default = "default_interval")]
    pub engagement_interval_secs: u64,

    /// Lifetime of a notification dedup marker
    #[serde(default = "default_dedup_ttl")]
    pub dedup_ttl_secs: u64,

    /// Category whose chosen goal picks the morning reminder window
    #[serde(default = "default_wake_goal_type")]
    pub wake_goal_type_id: i64,
}

impl SchedulerConfig {
    pub fn lifecycle_interval(&self) -> Duration {
        Duration::from_secs(self.lifecycle_interval_secs)
    }

    pub fn engagement_settings(&self) -> EngagementSettings {
        EngagementSettings {
            interval: Duration::from_secs(self.engagement_interval_secs),
            dedup_ttl: Duration::from_secs(self.dedup_ttl_secs),
            wake_goal_type: GoalTypeId::new(self.wake_goal_type_id),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.lifecycle_interval_secs == 0 {
            return Err(ValidationError::InvalidInterval("lifecycle_interval_secs"));
        }
        if self.engagement_interval_secs == 0 {
            return Err(ValidationError::InvalidInterval("engagement_interval_secs"));
        }
        if self.dedup_ttl_secs == 0 {
            return Err(ValidationError::InvalidInterval("dedup_ttl_secs"));
        }
        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            lifecycle_interval_secs: default_interval(),
            engagement_interval_secs: default_interval(),
            dedup_ttl_secs: default_dedup_ttl(),
            wake_goal_type_id: default_wake_goal_type(),
        }
    }
}

fn default_interval() -> u64 {
    3600
}

fn default_dedup_ttl() -> u64 {
    8 * 3600
}

fn default_wake_goal_type() -> i64 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_engagement_defaults() {
        let config = SchedulerConfig::default();
        let settings = config.engagement_settings();
        let expected = EngagementSettings::default();

        assert_eq!(config.lifecycle_interval(), Duration::from_secs(3600));
        assert_eq!(settings.interval, expected.interval);
        assert_eq!(settings.dedup_ttl, expected.dedup_ttl);
        assert_eq!(settings.wake_goal_type, expected.wake_goal_type);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = SchedulerConfig {
            engagement_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidInterval("engagement_interval_secs"))
        );
    }
}
