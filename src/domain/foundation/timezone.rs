//! IANA timezone value object.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// A user's home timezone, stored by its IANA name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timezone(Tz);

impl Timezone {
    /// Wraps an already-resolved zone.
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Parses an IANA identifier such as `Asia/Yekaterinburg`.
    pub fn parse(name: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::empty_field("timezone"));
        }
        Tz::from_str(name)
            .map(Self)
            .map_err(|e| ValidationError::invalid_format("timezone", e.to_string()))
    }

    /// Returns the underlying zone.
    pub fn tz(&self) -> Tz {
        self.0
    }

    /// Returns the IANA name.
    pub fn name(&self) -> &'static str {
        self.0.name()
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::Asia::Yekaterinburg)
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.name())
    }
}

impl FromStr for Timezone {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
