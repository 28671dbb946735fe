//! Conversational transport ports.
//!
//! The inbound side is a capability set implemented once per chat platform;
//! the outbound side sends text with an optional choice menu.

use crate::domain::dialog::{ChoiceMenu, Command, MalformedCommand};
use crate::domain::foundation::{DomainError, UserId};
use async_trait::async_trait;

/// One inbound conversational turn.
pub trait InboundMessage: Send + Sync {
    /// Conversation the turn belongs to; replies go here.
    fn peer(&self) -> UserId;

    /// Author of the turn.
    fn sender(&self) -> UserId;

    /// Free text typed by the user (button label for menu taps).
    fn text(&self) -> &str;

    /// Structured command, decoded at the transport boundary.
    ///
    /// `Ok(None)` for plain text, `Err` when a payload was present but did not
    /// decode.
    fn command(&self) -> Result<Option<Command>, MalformedCommand>;
}

/// Public profile fields used at registration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PeerProfile {
    pub first_name: String,
    pub last_name: String,
    /// Empty when the user did not publish a city.
    pub city: String,
}

/// Outbound side of the chat platform.
#[async_trait]
pub trait Transport: Send + Sync {
    /// # Errors
    ///
    /// - `TransportError` if the platform rejects or cannot receive the message
    async fn send(&self, peer: UserId, text: &str, menu: Option<&ChoiceMenu>) -> Result<(), DomainError>;

    /// Fetches the peer's public profile.
    async fn profile(&self, peer: UserId) -> Result<PeerProfile, DomainError>;
}
