//! Per-flow turn handler contract.

use async_trait::async_trait;

use crate::domain::users::{FlowName, User};
use crate::ports::InboundMessage;

use super::ConversationError;

/// Handles one turn for a registered user inside one flow.
///
/// Returning `Some(flow)` hands the same turn to `flow`; `None` ends the turn.
#[async_trait]
pub trait FlowHandler: Send + Sync {
    fn flow(&self) -> FlowName;

    async fn handle(
        &self,
        user: &User,
        message: &dyn InboundMessage,
    ) -> Result<Option<FlowName>, ConversationError>;
}
