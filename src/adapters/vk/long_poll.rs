//! VK Bots Long Poll listener.
//!
//! Turns are handled one at a time in arrival order. `failed: 1` only moves
//! the cursor; `failed: 2` and `failed: 3` mean the key or the whole session
//! expired and a new server is requested.

use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::application::AppContext;
use crate::domain::dialog::{Command, MalformedCommand};
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::InboundMessage;

use super::client::{transport_error, VkClient};

const RETRY_DELAY: Duration = Duration::from_secs(3);

/// Peer ids from this value up are group chats.
const CHAT_PEER_OFFSET: i64 = 2_000_000_000;

/// Payload VK attaches to the built-in "Start" button.
const START_PAYLOAD: &str = r#"{"command":"start"}"#;

/// One private message received from VK.
#[derive(Debug, Clone, Deserialize)]
pub struct VkMessage {
    pub peer_id: i64,
    pub from_id: i64,
    #[serde(default)]
    pub text: String,
    pub payload: Option<String>,
}

impl InboundMessage for VkMessage {
    fn peer(&self) -> UserId {
        UserId::new(self.peer_id)
    }

    fn sender(&self) -> UserId {
        UserId::new(self.from_id)
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn command(&self) -> Result<Option<Command>, MalformedCommand> {
        match self.payload.as_deref() {
            None | Some("") | Some(START_PAYLOAD) => Ok(None),
            Some(payload) => Command::decode(payload).map(Some),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct LongPollServer {
    key: String,
    server: String,
    #[serde(deserialize_with = "cursor")]
    ts: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PollResponse {
    Failed {
        failed: i64,
        #[serde(default)]
        ts: Option<Value>,
    },
    Updates {
        #[serde(deserialize_with = "cursor")]
        ts: String,
        #[serde(default)]
        updates: Vec<Update>,
    },
}

#[derive(Debug, Deserialize)]
struct Update {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    object: Value,
}

// Older API versions send `ts` as a number.
fn cursor<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(cursor_string(&Value::deserialize(deserializer)?))
}

fn cursor_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Private `message_new` events; everything else is dropped.
fn private_messages(updates: Vec<Update>) -> Vec<VkMessage> {
    updates
        .into_iter()
        .filter(|u| u.kind == "message_new")
        .filter_map(|u| {
            match serde_json::from_value::<VkMessage>(u.object.get("message").cloned()?) {
                Ok(message) => Some(message),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping undecodable message_new event");
                    None
                }
            }
        })
        .filter(|m| m.peer_id < CHAT_PEER_OFFSET)
        .collect()
}

/// Long poll loop feeding inbound turns into the application.
pub struct VkLongPoll {
    client: Arc<VkClient>,
    group_id: i64,
    wait: Duration,
}

impl VkLongPoll {
    pub fn new(client: Arc<VkClient>, group_id: i64, wait: Duration) -> Self {
        Self {
            client,
            group_id,
            wait,
        }
    }

    async fn server(&self) -> Result<LongPollServer, DomainError> {
        self.client
            .call(
                "groups.getLongPollServer",
                &[("group_id", self.group_id.to_string())],
            )
            .await
    }

    async fn check(&self, server: &LongPollServer) -> Result<PollResponse, DomainError> {
        let wait = self.wait.as_secs().to_string();
        let response = self
            .client
            .http()
            .get(&server.server)
            .query(&[
                ("act", "a_check"),
                ("key", server.key.as_str()),
                ("ts", server.ts.as_str()),
                ("wait", wait.as_str()),
            ])
            .send()
            .await
            .map_err(|e| transport_error(format!("long poll request failed: {}", e)))?;

        response
            .json()
            .await
            .map_err(|e| transport_error(format!("long poll returned unreadable body: {}", e)))
    }

    /// Polls until `shutdown` flips to `true`.
    pub async fn run(&self, context: Arc<AppContext>, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(group_id = self.group_id, "VK long poll started");
        let mut session: Option<LongPollServer> = None;

        loop {
            if *shutdown.borrow() {
                break;
            }

            let mut server = match session.take() {
                Some(server) => server,
                None => match self.server().await {
                    Ok(server) => server,
                    Err(e) => {
                        tracing::error!(error = %e, "failed to obtain long poll server");
                        if wait_or_stop(&mut shutdown).await {
                            break;
                        }
                        continue;
                    }
                },
            };

            let outcome = tokio::select! {
                outcome = self.check(&server) => outcome,
                _ = shutdown.changed() => break,
            };

            match outcome {
                Ok(PollResponse::Updates { ts, updates }) => {
                    for message in private_messages(updates) {
                        context.handle_turn(&message).await;
                    }
                    server.ts = ts;
                    session = Some(server);
                }
                Ok(PollResponse::Failed { failed: 1, ts }) => {
                    if let Some(ts) = ts {
                        server.ts = cursor_string(&ts);
                    }
                    session = Some(server);
                }
                Ok(PollResponse::Failed { failed, .. }) => {
                    tracing::info!(failed, "long poll session expired, reconnecting");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "long poll check failed");
                    session = Some(server);
                    if wait_or_stop(&mut shutdown).await {
                        break;
                    }
                }
            }
        }

        tracing::info!("VK long poll stopped");
    }
}

/// Sleeps for the retry delay; `true` when shutdown was requested instead.
async fn wait_or_stop(shutdown: &mut watch::Receiver<bool>) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(RETRY_DELAY) => false,
        _ = shutdown.changed() => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserGoalId;

    fn parse(json: &str) -> PollResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn updates_yield_private_messages_only() {
        let response = parse(
            r#"{"ts": "42", "updates": [
                {"type": "message_new", "object": {"message": {"peer_id": 7, "from_id": 7, "text": "hi"}}},
                {"type": "message_new", "object": {"message": {"peer_id": 2000000001, "from_id": 7, "text": "chat"}}},
                {"type": "message_typing_state", "object": {"state": "typing"}}
            ]}"#,
        );

        let PollResponse::Updates { ts, updates } = response else {
            panic!("expected updates");
        };
        let messages = private_messages(updates);

        assert_eq!(ts, "42");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text(), "hi");
        assert_eq!(messages[0].peer(), UserId::new(7));
    }

    #[test]
    fn failures_are_classified() {
        assert!(matches!(
            parse(r#"{"failed": 1, "ts": 30}"#),
            PollResponse::Failed { failed: 1, ts: Some(_) }
        ));
        assert!(matches!(
            parse(r#"{"failed": 2}"#),
            PollResponse::Failed { failed: 2, ts: None }
        ));
    }

    #[test]
    fn numeric_cursor_is_accepted() {
        let server: LongPollServer =
            serde_json::from_str(r#"{"key": "k", "server": "https://lp.vk.com/wh1", "ts": 17}"#)
                .unwrap();
        assert_eq!(server.ts, "17");
    }

    #[test]
    fn payload_decodes_into_command() {
        let message = VkMessage {
            peer_id: 7,
            from_id: 7,
            text: "👍🏻".to_string(),
            payload: Some(Command::Approve { user_goal: UserGoalId::new(3) }.encode()),
        };
        assert_eq!(
            message.command().unwrap(),
            Some(Command::Approve { user_goal: UserGoalId::new(3) })
        );
    }

    #[test]
    fn start_button_and_plain_text_carry_no_command() {
        let mut message = VkMessage {
            peer_id: 7,
            from_id: 7,
            text: "Start".to_string(),
            payload: Some(START_PAYLOAD.to_string()),
        };
        assert_eq!(message.command().unwrap(), None);

        message.payload = None;
        assert_eq!(message.command().unwrap(), None);
    }

    #[test]
    fn garbage_payload_is_malformed() {
        let message = VkMessage {
            peer_id: 7,
            from_id: 7,
            text: "?".to_string(),
            payload: Some(r#"{"command":"change_type"}"#.to_string()),
        };
        assert!(message.command().is_err());
    }
}
