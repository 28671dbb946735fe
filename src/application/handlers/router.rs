//! Routes an inbound turn to the flow the peer is in.

use std::sync::Arc;

use crate::domain::users::FlowName;
use crate::ports::InboundMessage;

use crate::application::UserDirectory;

use super::{ConversationError, FlowHandler, RegistrationFlow};

/// Upper bound on flow hand-offs within one turn.
pub const MAX_HOPS: usize = 4;

pub struct ConversationRouter {
    directory: Arc<UserDirectory>,
    registration: Arc<RegistrationFlow>,
    menu: Arc<dyn FlowHandler>,
    tasks: Arc<dyn FlowHandler>,
    rate: Arc<dyn FlowHandler>,
}

impl ConversationRouter {
    pub fn new(
        directory: Arc<UserDirectory>,
        registration: Arc<RegistrationFlow>,
        menu: Arc<dyn FlowHandler>,
        tasks: Arc<dyn FlowHandler>,
        rate: Arc<dyn FlowHandler>,
    ) -> Self {
        Self {
            directory,
            registration,
            menu,
            tasks,
            rate,
        }
    }

    fn handler(&self, flow: FlowName) -> &dyn FlowHandler {
        match flow {
            FlowName::Menu => self.menu.as_ref(),
            FlowName::Tasks => self.tasks.as_ref(),
            FlowName::Rate => self.rate.as_ref(),
        }
    }

    /// Handles one turn. Unregistered peers go through registration; a flow
    /// may hand the same turn to another flow until one returns `None`.
    pub async fn route(&self, message: &dyn InboundMessage) -> Result<(), ConversationError> {
        let peer = message.peer();
        let mut next = match self.directory.find(peer).await? {
            Some(user) => Some(user.flow),
            None => self.registration.handle(message).await?,
        };

        let mut hops = 0;
        while let Some(flow) = next {
            if hops == MAX_HOPS {
                tracing::warn!(user_id = %peer, flow = %flow, "Too many flow hand-offs, ending turn");
                break;
            }
            hops += 1;

            // Re-read each hop: the previous flow may have changed the record.
            let Some(user) = self.directory.find(peer).await? else {
                break;
            };
            next = self.handler(flow).handle(&user, message).await?;
        }
        Ok(())
    }
}
