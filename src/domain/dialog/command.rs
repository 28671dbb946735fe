//! Structured commands carried by menu buttons.
//!
//! Commands are decoded once at the transport boundary. A payload that names
//! a known command but lacks one of its parameters fails to decode and is
//! reported as [`MalformedCommand`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::{GoalId, GoalTypeId, UserGoalId};

/// Every command a menu button can carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "params", rename_all = "snake_case")]
pub enum Command {
    Register,
    Menu,
    ToTasks,
    ToRate,
    CurrentTasks,
    UpdateTask,
    UpdateType { goal_type: GoalTypeId },
    ObserveTasks,
    ObserveDate { date: NaiveDate },
    ChangeTask,
    ChangeDate { date: NaiveDate },
    ChangeType { goal_type: GoalTypeId, date: NaiveDate },
    ChoseGoal { goal: GoalId },
    Approve { user_goal: UserGoalId },
    Disapprove { user_goal: UserGoalId },
    Back,
}

impl Command {
    /// Decodes a button payload.
    pub fn decode(payload: &str) -> Result<Self, MalformedCommand> {
        serde_json::from_str(payload).map_err(|e| MalformedCommand::new(payload, e.to_string()))
    }

    /// Encodes this command as a button payload.
    pub fn encode(&self) -> String {
        // Serializing a plain enum of ids and dates cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// A structured payload that could not be decoded into a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed command payload {payload}: {reason}")]
pub struct MalformedCommand {
    pub payload: String,
    pub reason: String,
}

impl MalformedCommand {
    pub fn new(payload: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            reason: reason.into(),
        }
    }
}
