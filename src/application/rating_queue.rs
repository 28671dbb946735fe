//! RatingQueue - peer review of other users' bindings.
//!
//! Each rater has at most one binding queued for review. The queue is filled
//! outside this crate; voting here never advances it.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserGoalId, UserId};
use crate::domain::goals::{Evaluation, Goal, UserGoal, Verdict};
use crate::domain::users::User;
use crate::ports::{EvaluationRepository, PendingRatingRepository, UserGoalRepository};

use super::{GoalCatalog, UserDirectory};

/// A binding presented to a rater.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub user_goal: UserGoal,
    pub goal: Goal,
    pub text: String,
}

pub struct RatingQueue {
    pending: Arc<dyn PendingRatingRepository>,
    user_goals: Arc<dyn UserGoalRepository>,
    catalog: Arc<GoalCatalog>,
    evaluations: Arc<dyn EvaluationRepository>,
    directory: Arc<UserDirectory>,
}

impl RatingQueue {
    pub fn new(
        pending: Arc<dyn PendingRatingRepository>,
        user_goals: Arc<dyn UserGoalRepository>,
        catalog: Arc<GoalCatalog>,
        evaluations: Arc<dyn EvaluationRepository>,
        directory: Arc<UserDirectory>,
    ) -> Self {
        Self {
            pending,
            user_goals,
            catalog,
            evaluations,
            directory,
        }
    }

    /// The rater's queued review, or `None` when there is nothing to rate.
    ///
    /// A pointer to a binding or goal that no longer exists counts as nothing
    /// to rate.
    pub async fn get_to_rate(&self, rater: &User) -> Result<Option<Review>, DomainError> {
        let Some(pending) = self.pending.get(rater.id).await? else {
            return Ok(None);
        };
        let Some(user_goal) = self.user_goals.find_by_id(pending.user_goal).await? else {
            tracing::debug!(user_id = %rater.id, user_goal_id = %pending.user_goal, "Queued binding is gone");
            return Ok(None);
        };
        let Some(goal) = self.catalog.goal(user_goal.goal_id).await? else {
            return Ok(None);
        };

        let owner = self.directory.find(user_goal.user_id).await?;
        let text = review_text(rater, owner.as_ref(), &user_goal, &goal);
        Ok(Some(Review {
            user_goal,
            goal,
            text,
        }))
    }

    /// Appends one vote. The pending pointer is left as it is.
    pub async fn rate(
        &self,
        rater: UserId,
        user_goal: UserGoalId,
        approved: bool,
    ) -> Result<Evaluation, DomainError> {
        let evaluation = Evaluation {
            rater,
            user_goal,
            approved,
        };
        self.evaluations.create(&evaluation).await?;
        tracing::info!(user_id = %rater, user_goal_id = %user_goal, approved, "Evaluation recorded");
        Ok(evaluation)
    }

    /// Aggregate outcome of every vote on the binding.
    pub async fn verdict(&self, user_goal: UserGoalId) -> Result<Verdict, DomainError> {
        Ok(Verdict::from_score(self.evaluations.score(user_goal).await?))
    }
}

/// The owner is shown as a number unique to the (owner, rater) pair, not by
/// name. The date is the owner's local day; an unknown owner falls back to
/// the rater's calendar.
fn review_text(rater: &User, owner: Option<&User>, user_goal: &UserGoal, goal: &Goal) -> String {
    let zone = owner.map_or(rater.timezone, |o| o.timezone);
    let date = user_goal.window.local_date(zone);
    format!(
        "User\n 🙍‍♂ - {}\nDate\n ⏱ - {}\nTask\n 💡 - {}",
        user_goal.user_id.value() + rater.id.value(),
        date.format("%B %-d"),
        goal.description
    )
}
