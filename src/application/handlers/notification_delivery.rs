//! Delivers queued engagement messages over the transport.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::engagement::{Message, NotificationCode};
use crate::domain::foundation::DomainError;
use crate::domain::users::FlowName;
use crate::ports::{Clock, Transport};

use crate::application::{QueueConsumer, UserDirectory};

use super::{render, TasksFlow};

/// Single consumer of the outbound [`Message`] queue.
pub struct NotificationDelivery {
    directory: Arc<UserDirectory>,
    tasks: Arc<TasksFlow>,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
}

impl NotificationDelivery {
    pub fn new(
        directory: Arc<UserDirectory>,
        tasks: Arc<TasksFlow>,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            directory,
            tasks,
            transport,
            clock,
        }
    }

    pub async fn deliver(&self, message: &Message) -> Result<(), DomainError> {
        let Some(user) = self.directory.find(message.user).await? else {
            tracing::warn!(user_id = %message.user, code = %message.code, "Dropping message for unknown user");
            return Ok(());
        };
        let now = self.clock.now();

        match message.code {
            NotificationCode::TaskList => {
                self.transport.send(user.id, render::MORNING_GREETING, None).await?;
                self.tasks.send_day_plan(&user, now).await
            }
            NotificationCode::MarkTasks => {
                if !self.tasks.send_marked_plan(&user, now).await? {
                    return Ok(());
                }
                self.directory.set_flow(user.id, FlowName::Tasks).await?;
                self.transport
                    .send(user.id, render::EVENING_GREETING, Some(&render::tasks_menu()))
                    .await
            }
            NotificationCode::NextDay => self.transport.send(user.id, render::PLAN_TOMORROW, None).await,
            NotificationCode::Disapprove => self.transport.send(user.id, &message.text, None).await,
        }
    }
}

#[async_trait]
impl QueueConsumer<Message> for NotificationDelivery {
    fn name(&self) -> &'static str {
        "notification_delivery"
    }

    async fn consume(&self, message: Message) -> Result<(), DomainError> {
        self.deliver(&message).await?;
        tracing::debug!(user_id = %message.user, code = %message.code, "Notification delivered");
        Ok(())
    }
}
