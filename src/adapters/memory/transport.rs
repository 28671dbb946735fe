//! Recording transport and scripted inbound turns.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::dialog::{ChoiceMenu, Command, MalformedCommand};
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::ports::{InboundMessage, PeerProfile, Transport};

/// One outbound message captured by [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub peer: UserId,
    pub text: String,
    pub menu: Option<ChoiceMenu>,
}

/// Transport that records every send instead of delivering it.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Arc<RwLock<Vec<SentMessage>>>,
    profiles: Arc<RwLock<HashMap<UserId, PeerProfile>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_profile(&self, peer: UserId, profile: PeerProfile) {
        self.profiles.write().await.insert(peer, profile);
    }

    pub async fn sent(&self) -> Vec<SentMessage> {
        self.sent.read().await.clone()
    }

    pub async fn sent_to(&self, peer: UserId) -> Vec<SentMessage> {
        self.sent
            .read()
            .await
            .iter()
            .filter(|m| m.peer == peer)
            .cloned()
            .collect()
    }

    pub async fn last_to(&self, peer: UserId) -> Option<SentMessage> {
        self.sent_to(peer).await.pop()
    }

    pub async fn clear(&self) {
        self.sent.write().await.clear();
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, peer: UserId, text: &str, menu: Option<&ChoiceMenu>) -> Result<(), DomainError> {
        self.sent.write().await.push(SentMessage {
            peer,
            text: text.to_string(),
            menu: menu.cloned(),
        });
        Ok(())
    }

    async fn profile(&self, peer: UserId) -> Result<PeerProfile, DomainError> {
        self.profiles.read().await.get(&peer).cloned().ok_or_else(|| {
            DomainError::new(
                ErrorCode::TransportError,
                format!("No profile for peer {}", peer),
            )
        })
    }
}

/// An inbound turn assembled in code.
#[derive(Debug, Clone)]
pub struct ScriptedMessage {
    peer: UserId,
    text: String,
    payload: Option<String>,
}

impl ScriptedMessage {
    /// Plain text typed by the user.
    pub fn text(peer: UserId, text: impl Into<String>) -> Self {
        Self {
            peer,
            text: text.into(),
            payload: None,
        }
    }

    /// A menu tap carrying `command`.
    pub fn command(peer: UserId, command: Command) -> Self {
        Self {
            peer,
            text: String::new(),
            payload: Some(command.encode()),
        }
    }

    /// A menu tap carrying a raw payload, possibly malformed.
    pub fn raw_payload(peer: UserId, payload: impl Into<String>) -> Self {
        Self {
            peer,
            text: String::new(),
            payload: Some(payload.into()),
        }
    }
}

impl InboundMessage for ScriptedMessage {
    fn peer(&self) -> UserId {
        self.peer
    }

    fn sender(&self) -> UserId {
        self.peer
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn command(&self) -> Result<Option<Command>, MalformedCommand> {
        self.payload.as_deref().map(Command::decode).transpose()
    }
}
