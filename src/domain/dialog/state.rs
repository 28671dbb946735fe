//! Resumable per-peer dialog state.
//!
//! Each flow that needs to remember something between turns stores a typed
//! payload under `(flow, peer)`. The tasks flow is the only one today: it
//! remembers which day and category are being edited.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{GoalTypeId, UserId};
use crate::domain::users::FlowName;

/// Persisted dialog state of one peer inside one flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogState<P> {
    pub flow: FlowName,
    pub peer: UserId,
    pub params: P,
}

impl<P: Default> DialogState<P> {
    /// Fresh state with empty parameters.
    pub fn new(flow: FlowName, peer: UserId) -> Self {
        Self {
            flow,
            peer,
            params: P::default(),
        }
    }
}

impl<P> DialogState<P> {
    /// Storage key, `{flow}_{peer}`.
    pub fn key(&self) -> String {
        dialog_key(self.flow, self.peer)
    }
}

pub fn dialog_key(flow: FlowName, peer: UserId) -> String {
    format!("{}_{}", flow, peer)
}

/// Steps of the "change the plan for a day" dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum TasksDialog {
    #[default]
    Idle,
    /// A catalog category was picked; waiting for a goal button.
    ChoosingGoal { date: NaiveDate, goal_type: GoalTypeId },
    /// A free-text category was picked; waiting for the goal text.
    AwaitingGoalText { date: NaiveDate, goal_type: GoalTypeId },
}

impl TasksDialog {
    /// Step entered after the user picks a category for `date`.
    pub fn category_chosen(date: NaiveDate, goal_type: GoalTypeId, from_list: bool) -> Self {
        if from_list {
            TasksDialog::ChoosingGoal { date, goal_type }
        } else {
            TasksDialog::AwaitingGoalText { date, goal_type }
        }
    }

    /// Pending `(date, category)` when a goal is expected.
    pub fn pending(&self) -> Option<(NaiveDate, GoalTypeId)> {
        match *self {
            TasksDialog::Idle => None,
            TasksDialog::ChoosingGoal { date, goal_type }
            | TasksDialog::AwaitingGoalText { date, goal_type } => Some((date, goal_type)),
        }
    }

    pub fn awaits_text(&self) -> bool {
        matches!(self, TasksDialog::AwaitingGoalText { .. })
    }
}
