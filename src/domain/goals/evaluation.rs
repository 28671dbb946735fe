//! Peer evaluations and their aggregate verdict.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{UserGoalId, UserId};

/// One approve/disapprove vote on a binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub rater: UserId,
    pub user_goal: UserGoalId,
    pub approved: bool,
}

impl Evaluation {
    /// `+1` for approval, `-1` for disapproval.
    pub fn weight(&self) -> i64 {
        if self.approved {
            1
        } else {
            -1
        }
    }
}

/// Aggregate outcome of all votes on a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    /// A tie, including no votes at all, passes.
    pub fn from_score(score: i64) -> Self {
        if score >= 0 {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    pub fn from_evaluations<'a>(evaluations: impl IntoIterator<Item = &'a Evaluation>) -> Self {
        Self::from_score(evaluations.into_iter().map(Evaluation::weight).sum())
    }
}

/// The single binding queued for review by a given rater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRating {
    pub rater: UserId,
    pub user_goal: UserGoalId,
}
