//! Goal bindings: one goal per user, per category, per local day.
//!
//! A binding is created in `Planning/Soon`, activated once its window opens
//! and finished once it closes. Transitions are computed from stored state
//! and the wall clock only, so applying them twice is harmless.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{
    DayWindow, GoalId, GoalTypeId, StateMachine, Timestamp, UserGoalId, UserId, ValidationError,
};

/// Coarse lifecycle stage of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Planning,
    Active,
    Finished,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Planning => "planning",
            Phase::Active => "active",
            Phase::Finished => "finished",
        }
    }
}

impl StateMachine for Phase {
    fn can_transition_to(&self, target: &Self) -> bool {
        matches!(
            (self, target),
            (Phase::Planning, Phase::Active) | (Phase::Active, Phase::Finished)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            Phase::Planning => vec![Phase::Active],
            Phase::Active => vec![Phase::Finished],
            Phase::Finished => vec![],
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planning" => Ok(Phase::Planning),
            "active" => Ok(Phase::Active),
            "finished" => Ok(Phase::Finished),
            other => Err(ValidationError::invalid_format("phase", other)),
        }
    }
}

/// Progress or outcome of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Soon,
    InProgress,
    Complete,
    Failed,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Soon => "soon",
            GoalStatus::InProgress => "in_progress",
            GoalStatus::Complete => "complete",
            GoalStatus::Failed => "failed",
        }
    }

    /// Status after the owner taps the goal: `Complete` flips back to
    /// `InProgress`, anything else becomes `Complete`.
    pub fn toggled(&self) -> Self {
        match self {
            GoalStatus::Complete => GoalStatus::InProgress,
            _ => GoalStatus::Complete,
        }
    }

    /// Emoji shown next to the goal in day plans.
    pub fn mark(&self) -> &'static str {
        match self {
            GoalStatus::Soon => "📝",
            GoalStatus::InProgress => "🎯",
            GoalStatus::Complete => "🍏",
            GoalStatus::Failed => "🍎",
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "soon" => Ok(GoalStatus::Soon),
            "in_progress" => Ok(GoalStatus::InProgress),
            "complete" => Ok(GoalStatus::Complete),
            "failed" => Ok(GoalStatus::Failed),
            other => Err(ValidationError::invalid_format("status", other)),
        }
    }
}

/// Target phase/status produced by a lifecycle sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleChange {
    pub phase: Phase,
    pub status: GoalStatus,
}

/// The per-user, per-day assignment of a goal to a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGoal {
    pub id: UserGoalId,
    pub user_id: UserId,
    pub goal_id: GoalId,
    pub goal_type: GoalTypeId,
    pub phase: Phase,
    pub status: GoalStatus,
    pub window: DayWindow,
}

impl UserGoal {
    pub fn from(&self) -> Timestamp {
        self.window.from()
    }

    pub fn to(&self) -> Timestamp {
        self.window.to()
    }

    /// The transition a sweep at `now` should apply, if any.
    ///
    /// `Planning` opens once `now >= from`. `Active` closes once `now >= to`,
    /// and an unfinished `InProgress` goal is recorded as `Failed`.
    pub fn due_transition(&self, now: Timestamp) -> Option<LifecycleChange> {
        match self.phase {
            Phase::Planning if !now.is_before(&self.from()) => Some(LifecycleChange {
                phase: Phase::Active,
                status: GoalStatus::InProgress,
            }),
            Phase::Active if !now.is_before(&self.to()) => Some(LifecycleChange {
                phase: Phase::Finished,
                status: match self.status {
                    GoalStatus::InProgress => GoalStatus::Failed,
                    other => other,
                },
            }),
            _ => None,
        }
    }

    /// Applies a change computed by [`UserGoal::due_transition`].
    pub fn apply(&mut self, change: LifecycleChange) -> Result<(), ValidationError> {
        self.phase = self.phase.transition_to(change.phase)?;
        self.status = change.status;
        Ok(())
    }
}

/// A binding about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserGoal {
    pub user_id: UserId,
    pub goal_id: GoalId,
    pub goal_type: GoalTypeId,
    pub window: DayWindow,
}

impl NewUserGoal {
    /// Materialises the row a store would insert under `id`.
    pub fn into_user_goal(self, id: UserGoalId) -> UserGoal {
        UserGoal {
            id,
            user_id: self.user_id,
            goal_id: self.goal_id,
            goal_type: self.goal_type,
            phase: Phase::Planning,
            status: GoalStatus::Soon,
            window: self.window,
        }
    }
}
