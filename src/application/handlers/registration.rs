//! Registration flow for peers without a user record.

use std::sync::Arc;

use crate::domain::dialog::Command;
use crate::domain::foundation::{DomainError, ErrorCode, Timezone, UserId};
use crate::domain::users::{FlowName, NewUser, User};
use crate::ports::{InboundMessage, TimezoneResolver, Transport};

use crate::application::UserDirectory;

use super::{render, ConversationError};

/// Enrolls allow-listed peers. Peers missing from the allow-list get no reply.
pub struct RegistrationFlow {
    directory: Arc<UserDirectory>,
    transport: Arc<dyn Transport>,
    resolver: Option<Arc<dyn TimezoneResolver>>,
    default_timezone: Timezone,
}

impl RegistrationFlow {
    pub fn new(
        directory: Arc<UserDirectory>,
        transport: Arc<dyn Transport>,
        resolver: Option<Arc<dyn TimezoneResolver>>,
        default_timezone: Timezone,
    ) -> Self {
        Self {
            directory,
            transport,
            resolver,
            default_timezone,
        }
    }

    /// Returns `Some(Menu)` once the peer is registered.
    pub async fn handle(&self, message: &dyn InboundMessage) -> Result<Option<FlowName>, ConversationError> {
        let peer = message.peer();
        if !self.directory.is_allowed(peer).await? {
            tracing::debug!(user_id = %peer, "Ignoring peer outside the access list");
            return Ok(None);
        }

        match message.command()? {
            Some(Command::Register) => {
                self.register(peer).await?;
                Ok(Some(FlowName::Menu))
            }
            _ => {
                self.transport
                    .send(peer, render::REGISTER_PROMPT, Some(&render::register_menu()))
                    .await?;
                Ok(None)
            }
        }
    }

    async fn register(&self, peer: UserId) -> Result<User, DomainError> {
        let profile = self.transport.profile(peer).await?;
        let timezone = self.timezone_for(peer, &profile.city).await;

        let result = self
            .directory
            .register(NewUser {
                id: peer,
                first_name: profile.first_name,
                last_name: profile.last_name,
                city: profile.city,
                timezone,
                flow: FlowName::Menu,
            })
            .await;

        match result {
            // A double tap on "register" lands here on the second turn.
            Err(e) if e.code == ErrorCode::Conflict => self.directory.find(peer).await?.ok_or(e),
            other => other,
        }
    }

    async fn timezone_for(&self, peer: UserId, city: &str) -> Timezone {
        if city.trim().is_empty() {
            return self.default_timezone;
        }
        let Some(resolver) = &self.resolver else {
            return self.default_timezone;
        };
        match resolver.resolve(city).await {
            Ok(timezone) => timezone,
            Err(e) => {
                tracing::warn!(user_id = %peer, city = %city, error = %e, "Falling back to default timezone");
                self.default_timezone
            }
        }
    }
}
