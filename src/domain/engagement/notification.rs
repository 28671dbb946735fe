//! Outbound reminder messages.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::UserId;

/// Kind of reminder; selects how the delivery side renders it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCode {
    /// Morning reminder with today's plan.
    TaskList,
    /// Evening request to update statuses.
    MarkTasks,
    /// Nudge to plan tomorrow.
    NextDay,
    /// A peer rejected one of the user's goals.
    Disapprove,
}

impl NotificationCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationCode::TaskList => "task_list",
            NotificationCode::MarkTasks => "mark_tasks",
            NotificationCode::NextDay => "next_day",
            NotificationCode::Disapprove => "disapprove",
        }
    }
}

impl fmt::Display for NotificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One queued notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub user: UserId,
    pub code: NotificationCode,
    pub text: String,
}

impl Message {
    pub fn new(user: UserId, code: NotificationCode, text: impl Into<String>) -> Self {
        Self {
            user,
            code,
            text: text.into(),
        }
    }

    /// Dedup ledger key: identical `(user, code, text)` share one marker.
    pub fn dedup_key(&self) -> String {
        format!("notify:{}:{}:{}", self.user, self.code, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_key_includes_every_component() {
        let msg = Message::new(UserId::new(3), NotificationCode::TaskList, "");
        assert_eq!(msg.dedup_key(), "notify:3:task_list:");

        let other = Message::new(UserId::new(3), NotificationCode::Disapprove, "x");
        assert_ne!(msg.dedup_key(), other.dedup_key());
    }
}
