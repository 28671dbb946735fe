//! Tells a binding's owner that a rater disapproved it.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::engagement::NotificationCode;
use crate::domain::foundation::{local_date_of, DomainError};
use crate::ports::UserGoalRepository;

use crate::application::{EngagementScheduler, GoalCatalog, QueueConsumer, UserDirectory};

use super::{render, DisapprovalNotice};

/// Single consumer of [`DisapprovalNotice`]s.
///
/// The notice goes through the scheduler's dedup, so repeated disapprovals
/// of the same goal within the dedup window reach the owner once.
pub struct DisapprovalNotifier {
    user_goals: Arc<dyn UserGoalRepository>,
    catalog: Arc<GoalCatalog>,
    directory: Arc<UserDirectory>,
    scheduler: Arc<EngagementScheduler>,
}

impl DisapprovalNotifier {
    pub fn new(
        user_goals: Arc<dyn UserGoalRepository>,
        catalog: Arc<GoalCatalog>,
        directory: Arc<UserDirectory>,
        scheduler: Arc<EngagementScheduler>,
    ) -> Self {
        Self {
            user_goals,
            catalog,
            directory,
            scheduler,
        }
    }

    /// Returns whether a message was enqueued. A binding, goal or owner that
    /// has disappeared since the vote means there is nobody to tell.
    pub async fn notify(&self, notice: DisapprovalNotice) -> Result<bool, DomainError> {
        let Some(binding) = self.user_goals.find_by_id(notice.user_goal).await? else {
            return Ok(false);
        };
        let Some(goal) = self.catalog.goal(binding.goal_id).await? else {
            return Ok(false);
        };
        let Some(owner) = self.directory.find(binding.user_id).await? else {
            return Ok(false);
        };

        let date = local_date_of(binding.from(), owner.timezone);
        let text = render::disapproval(date, &goal);
        self.scheduler
            .send(owner.id, NotificationCode::Disapprove, &text)
            .await
    }
}

#[async_trait]
impl QueueConsumer<DisapprovalNotice> for DisapprovalNotifier {
    fn name(&self) -> &'static str {
        "disapproval_notifier"
    }

    async fn consume(&self, notice: DisapprovalNotice) -> Result<(), DomainError> {
        let sent = self.notify(notice).await?;
        tracing::debug!(
            user_goal_id = %notice.user_goal,
            rater_id = %notice.rater,
            sent,
            "Disapproval processed"
        );
        Ok(())
    }
}
