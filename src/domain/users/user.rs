//! Registered user record.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DayWindow, Timestamp, Timezone, UserId};

use super::FlowName;

/// A registered participant.
///
/// The timezone is resolved once at registration and drives every local-day
/// computation afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub timezone: Timezone,
    pub active: bool,
    pub flow: FlowName,
    pub created_at: Timestamp,
}

impl User {
    /// Local day window containing `instant` for this user.
    pub fn day_window(&self, instant: Timestamp) -> DayWindow {
        DayWindow::containing(instant, self.timezone)
    }

    /// Display name used in review texts.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Registration payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub timezone: Timezone,
    pub flow: FlowName,
}

impl NewUser {
    pub fn into_user(self, created_at: Timestamp) -> User {
        User {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            city: self.city,
            timezone: self.timezone,
            active: true,
            flow: self.flow,
            created_at,
        }
    }
}
