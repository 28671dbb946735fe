//! VK Bots API client and outbound [`Transport`].
//!
//! Every method call is a form POST to `{api_url}/{method}` carrying the
//! access token and API version. Responses arrive wrapped in either a
//! `response` or an `error` envelope.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::config::VkConfig;
use crate::domain::dialog::ChoiceMenu;
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::{PeerProfile, Transport};

use super::keyboard::Keyboard;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Response { response: T },
    Error { error: ApiError },
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error_code: i64,
    error_msg: String,
}

#[derive(Debug, Deserialize)]
struct VkUser {
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    city: Option<VkCity>,
}

#[derive(Debug, Deserialize)]
struct VkCity {
    title: String,
}

impl From<VkUser> for PeerProfile {
    fn from(user: VkUser) -> Self {
        PeerProfile {
            first_name: user.first_name,
            last_name: user.last_name,
            city: user.city.map(|c| c.title).unwrap_or_default(),
        }
    }
}

pub(super) fn transport_error(message: impl Into<String>) -> DomainError {
    DomainError::new(ErrorCode::TransportError, message)
}

/// Thin VK API client shared by the transport and the long poll listener.
pub struct VkClient {
    http: Client,
    token: Secret<String>,
    api_url: String,
    api_version: String,
    random_id: AtomicI64,
}

impl VkClient {
    /// # Errors
    ///
    /// - `TransportError` if the HTTP client cannot be built
    pub fn new(config: &VkConfig) -> Result<Self, DomainError> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| transport_error(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            token: Secret::new(config.token.clone()),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
            random_id: AtomicI64::new(Timestamp::now().as_datetime().timestamp_millis()),
        })
    }

    pub(super) fn http(&self) -> &Client {
        &self.http
    }

    /// Calls `method` with `params` and unwraps the response envelope.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> Result<T, DomainError> {
        let mut form: Vec<(&str, String)> = params.to_vec();
        form.push(("access_token", self.token.expose_secret().clone()));
        form.push(("v", self.api_version.clone()));

        let response = self
            .http
            .post(format!("{}/{}", self.api_url, method))
            .form(&form)
            .send()
            .await
            .map_err(|e| transport_error(format!("{} request failed: {}", method, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(transport_error(format!("{} returned HTTP {}", method, status)));
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| transport_error(format!("{} returned unreadable body: {}", method, e)))?;

        match envelope {
            Envelope::Response { response } => Ok(response),
            Envelope::Error { error } => Err(transport_error(format!(
                "{} failed with code {}: {}",
                method, error.error_code, error.error_msg
            ))),
        }
    }

    fn next_random_id(&self) -> i64 {
        self.random_id.fetch_add(1, Ordering::Relaxed)
    }
}

#[async_trait]
impl Transport for VkClient {
    async fn send(
        &self,
        peer: UserId,
        text: &str,
        menu: Option<&ChoiceMenu>,
    ) -> Result<(), DomainError> {
        let mut params = vec![
            ("peer_id", peer.value().to_string()),
            ("message", text.to_string()),
            ("random_id", self.next_random_id().to_string()),
        ];
        if let Some(menu) = menu {
            let keyboard = Keyboard::from_menu(menu)
                .to_json()
                .map_err(|e| transport_error(format!("Failed to render keyboard: {}", e)))?;
            params.push(("keyboard", keyboard));
        }

        let _message_id: i64 = self.call("messages.send", &params).await?;
        tracing::debug!(peer = %peer, "message sent");
        Ok(())
    }

    async fn profile(&self, peer: UserId) -> Result<PeerProfile, DomainError> {
        let users: Vec<VkUser> = self
            .call(
                "users.get",
                &[
                    ("user_ids", peer.value().to_string()),
                    ("fields", "city".to_string()),
                ],
            )
            .await?;

        users
            .into_iter()
            .next()
            .map(PeerProfile::from)
            .ok_or_else(|| transport_error(format!("users.get returned no profile for {}", peer)))
    }
}

impl std::fmt::Debug for VkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VkClient")
            .field("api_url", &self.api_url)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}
