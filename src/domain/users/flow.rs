//! Conversation flows a registered user can be in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Named dialog state persisted on the user record.
///
/// Each inbound turn is dispatched to the handler of the user's current flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowName {
    #[default]
    Menu,
    Tasks,
    Rate,
}

impl FlowName {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowName::Menu => "menu",
            FlowName::Tasks => "tasks",
            FlowName::Rate => "rate",
        }
    }
}

impl fmt::Display for FlowName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "menu" => Ok(FlowName::Menu),
            "tasks" => Ok(FlowName::Tasks),
            "rate" => Ok(FlowName::Rate),
            other => Err(ValidationError::invalid_format("flow", other)),
        }
    }
}
