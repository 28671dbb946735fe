//! DialogStore - persistence for resumable per-peer dialog state.
//!
//! State lives in the cache keyed by `{flow}_{peer}` with no expiry. A record
//! abandoned mid-dialog stays until the same peer finishes or restarts that
//! dialog.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use crate::domain::dialog::{dialog_key, DialogState};
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::users::FlowName;
use crate::ports::Cache;

pub struct DialogStore {
    cache: Arc<dyn Cache>,
}

impl DialogStore {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }

    /// Existing state, or a fresh one that is persisted before returning.
    ///
    /// An entry that no longer decodes (e.g. written by an older release) is
    /// replaced by a fresh state.
    pub async fn load<P>(&self, peer: UserId, flow: FlowName) -> Result<DialogState<P>, DomainError>
    where
        P: Serialize + DeserializeOwned + Default + Send + Sync,
    {
        let key = dialog_key(flow, peer);
        if let Some(raw) = self.cache.get(&key).await? {
            match serde_json::from_str::<DialogState<P>>(&raw) {
                Ok(state) => return Ok(state),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Resetting undecodable dialog state");
                }
            }
        }
        let state = DialogState::new(flow, peer);
        self.persist(&state).await?;
        Ok(state)
    }

    /// Replaces the parameters and writes the whole state in one call.
    pub async fn set_params<P>(&self, state: &mut DialogState<P>, params: P) -> Result<(), DomainError>
    where
        P: Serialize + Send + Sync,
    {
        state.params = params;
        self.persist(state).await
    }

    /// Deletes the persisted record.
    pub async fn clear<P: Sync>(&self, state: &DialogState<P>) -> Result<(), DomainError> {
        self.cache.delete(&state.key()).await
    }

    async fn persist<P>(&self, state: &DialogState<P>) -> Result<(), DomainError>
    where
        P: Serialize + Sync,
    {
        let raw = serde_json::to_string(state).map_err(|e| {
            DomainError::new(ErrorCode::InternalError, format!("Failed to encode dialog state: {}", e))
        })?;
        self.cache.set(&state.key(), &raw, None).await
    }
}
