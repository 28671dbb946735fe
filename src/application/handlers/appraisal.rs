//! Rating flow: review another user's goal and vote on it.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::domain::dialog::Command;
use crate::domain::foundation::{DomainError, UserGoalId, UserId};
use crate::domain::users::{FlowName, User};
use crate::ports::{InboundMessage, Transport};

use crate::application::{RatingQueue, UserDirectory};

use super::{render, ConversationError, FlowHandler};

/// Emitted after a disapproving vote; the owner is told asynchronously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisapprovalNotice {
    pub user_goal: UserGoalId,
    pub rater: UserId,
}

pub struct RateFlow {
    directory: Arc<UserDirectory>,
    queue: Arc<RatingQueue>,
    transport: Arc<dyn Transport>,
    notices: mpsc::UnboundedSender<DisapprovalNotice>,
}

impl RateFlow {
    pub fn new(
        directory: Arc<UserDirectory>,
        queue: Arc<RatingQueue>,
        transport: Arc<dyn Transport>,
        notices: mpsc::UnboundedSender<DisapprovalNotice>,
    ) -> Self {
        Self {
            directory,
            queue,
            transport,
            notices,
        }
    }

    /// Sends the next review, or "nothing to rate".
    async fn send_main(&self, user: &User) -> Result<(), DomainError> {
        match self.queue.get_to_rate(user).await? {
            Some(review) => {
                self.transport
                    .send(user.id, &review.text, Some(&render::review_menu(&review.user_goal)))
                    .await
            }
            None => {
                self.transport
                    .send(user.id, render::NOTHING_TO_RATE, Some(&render::rated_all_menu()))
                    .await
            }
        }
    }

    async fn vote(&self, user: &User, user_goal: UserGoalId, approved: bool) -> Result<(), DomainError> {
        self.queue.rate(user.id, user_goal, approved).await?;
        if !approved {
            let notice = DisapprovalNotice {
                user_goal,
                rater: user.id,
            };
            // Never fails the vote.
            if self.notices.send(notice).is_err() {
                tracing::warn!(user_goal_id = %user_goal, "Disapproval notice dropped, consumer is gone");
            }
        }
        self.send_main(user).await
    }
}

#[async_trait]
impl FlowHandler for RateFlow {
    fn flow(&self) -> FlowName {
        FlowName::Rate
    }

    async fn handle(
        &self,
        user: &User,
        message: &dyn InboundMessage,
    ) -> Result<Option<FlowName>, ConversationError> {
        match message.command()? {
            Some(Command::Menu) => {
                self.directory.set_flow(user.id, FlowName::Menu).await?;
                return Ok(Some(FlowName::Menu));
            }
            Some(Command::Approve { user_goal }) => self.vote(user, user_goal, true).await?,
            Some(Command::Disapprove { user_goal }) => self.vote(user, user_goal, false).await?,
            _ => self.send_main(user).await?,
        }
        Ok(None)
    }
}
