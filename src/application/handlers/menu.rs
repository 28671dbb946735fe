//! Main menu flow.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::dialog::Command;
use crate::domain::users::{FlowName, User};
use crate::ports::{InboundMessage, Transport};

use crate::application::UserDirectory;

use super::{render, ConversationError, FlowHandler};

pub struct MenuFlow {
    directory: Arc<UserDirectory>,
    transport: Arc<dyn Transport>,
}

impl MenuFlow {
    pub fn new(directory: Arc<UserDirectory>, transport: Arc<dyn Transport>) -> Self {
        Self {
            directory,
            transport,
        }
    }

    async fn switch(&self, user: &User, flow: FlowName) -> Result<Option<FlowName>, ConversationError> {
        self.directory.set_flow(user.id, flow).await?;
        Ok(Some(flow))
    }
}

#[async_trait]
impl FlowHandler for MenuFlow {
    fn flow(&self) -> FlowName {
        FlowName::Menu
    }

    async fn handle(
        &self,
        user: &User,
        message: &dyn InboundMessage,
    ) -> Result<Option<FlowName>, ConversationError> {
        match message.command()? {
            Some(Command::ToTasks) => self.switch(user, FlowName::Tasks).await,
            Some(Command::ToRate) => self.switch(user, FlowName::Rate).await,
            _ => {
                self.transport
                    .send(message.peer(), render::MAIN_MENU, Some(&render::main_menu()))
                    .await?;
                Ok(None)
            }
        }
    }
}
