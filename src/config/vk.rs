//! VK community bot configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// VK Bots API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct VkConfig {
    /// Community access token
    pub token: String,

    /// Community (group) id the long poll server is requested for
    pub group_id: i64,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Seconds the long poll server may hold a request open
    #[serde(default = "default_long_poll_wait")]
    pub long_poll_wait_secs: u64,
}

impl VkConfig {
    pub fn long_poll_wait(&self) -> Duration {
        Duration::from_secs(self.long_poll_wait_secs)
    }

    /// HTTP timeout for API calls; long poll requests get `wait` on top.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.long_poll_wait_secs + 10)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.token.is_empty() {
            return Err(ValidationError::MissingRequired("VK__TOKEN"));
        }
        if self.group_id <= 0 {
            return Err(ValidationError::MissingRequired("VK__GROUP_ID"));
        }
        if !self.api_url.starts_with("https://") {
            return Err(ValidationError::InsecureApiUrl("VK__API_URL"));
        }
        if self.long_poll_wait_secs == 0 || self.long_poll_wait_secs > 90 {
            return Err(ValidationError::InvalidLongPollWait);
        }
        Ok(())
    }
}

impl Default for VkConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            group_id: 0,
            api_url: default_api_url(),
            api_version: default_api_version(),
            long_poll_wait_secs: default_long_poll_wait(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.vk.com/method".to_string()
}

fn default_api_version() -> String {
    "5.131".to_string()
}

fn default_long_poll_wait() -> u64 {
    25
}
