//! Wake windows and the reminder triggers derived from them.
//!
//! A user's morning reminder fires inside their wake window. The evening
//! status reminder fires eight hours later and the plan-ahead nudge ten hours
//! later. Ranges are inclusive local hours and are not wrapped past midnight.

use crate::domain::foundation::{GoalId, GoalTypeId};
use crate::domain::goals::UserGoal;

use super::NotificationCode;

const MARK_TASKS_SHIFT: u32 = 8;
const NEXT_DAY_SHIFT: u32 = 10;

/// Inclusive range of local hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WakeWindow {
    pub from_hour: u32,
    pub to_hour: u32,
}

impl WakeWindow {
    /// Used when the user picked no wake-up goal for today.
    pub const DEFAULT: WakeWindow = WakeWindow::new(12, 14);

    pub const fn new(from_hour: u32, to_hour: u32) -> Self {
        Self { from_hour, to_hour }
    }

    /// Window selected by a catalog wake-up goal: the first three catalog
    /// items map to 06–08, 08–10 and 10–12.
    pub fn for_wake_goal(goal: GoalId) -> Option<Self> {
        match goal.value() {
            1 => Some(Self::new(6, 8)),
            2 => Some(Self::new(8, 10)),
            3 => Some(Self::new(10, 12)),
            _ => None,
        }
    }

    /// Picks the window from today's bindings of the wake category.
    pub fn select(today: &[UserGoal], wake_type: GoalTypeId) -> Self {
        today
            .iter()
            .filter(|binding| binding.goal_type == wake_type)
            .find_map(|binding| Self::for_wake_goal(binding.goal_id))
            .unwrap_or(Self::DEFAULT)
    }

    pub fn shifted(&self, hours: u32) -> Self {
        Self::new(self.from_hour + hours, self.to_hour + hours)
    }

    pub fn contains_hour(&self, hour: u32) -> bool {
        (self.from_hour..=self.to_hour).contains(&hour)
    }
}

impl Default for WakeWindow {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Everything the trigger rules look at for one user at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngagementSnapshot {
    pub local_hour: u32,
    pub wake: WakeWindow,
    pub today_count: usize,
    pub tomorrow_count: usize,
    pub goal_type_count: usize,
}

impl EngagementSnapshot {
    /// Reminders due at this hour, before deduplication.
    pub fn due(&self) -> Vec<NotificationCode> {
        let mut due = Vec::new();
        if self.wake.shifted(NEXT_DAY_SHIFT).contains_hour(self.local_hour)
            && self.tomorrow_count < self.goal_type_count
        {
            due.push(NotificationCode::NextDay);
        }
        if self.wake.contains_hour(self.local_hour) && self.today_count > 0 {
            due.push(NotificationCode::TaskList);
        }
        if self.wake.shifted(MARK_TASKS_SHIFT).contains_hour(self.local_hour) {
            due.push(NotificationCode::MarkTasks);
        }
        due
    }
}
