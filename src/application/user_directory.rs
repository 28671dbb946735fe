//! UserDirectory - cached user registry and enrollment gate.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::users::{FlowName, NewUser, User};
use crate::ports::{AccessList, Cache, UserRepository};

use super::read_through::{cached, forget, remember};

/// Upper bound on how long a stale entry survives a failed invalidation.
const USER_TTL: Duration = Duration::from_secs(10 * 60);

fn user_key(id: UserId) -> String {
    format!("user_{}", id)
}

pub struct UserDirectory {
    users: Arc<dyn UserRepository>,
    access: Arc<dyn AccessList>,
    cache: Arc<dyn Cache>,
}

impl UserDirectory {
    pub fn new(
        users: Arc<dyn UserRepository>,
        access: Arc<dyn AccessList>,
        cache: Arc<dyn Cache>,
    ) -> Self {
        Self {
            users,
            access,
            cache,
        }
    }

    /// Registered user by id, read through the cache.
    pub async fn find(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let key = user_key(id);
        if let Some(user) = cached(self.cache.as_ref(), &key).await {
            return Ok(Some(user));
        }
        let found = self.users.find_by_id(id).await?;
        if let Some(user) = &found {
            remember(self.cache.as_ref(), &key, user, Some(USER_TTL)).await;
        }
        Ok(found)
    }

    /// Every registered user, straight from the store.
    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.users.list().await
    }

    /// # Errors
    ///
    /// - `Conflict` if the user is already registered
    pub async fn register(&self, user: NewUser) -> Result<User, DomainError> {
        let created = self.users.create(&user).await?;
        tracing::info!(user_id = %created.id, timezone = %created.timezone, "User registered");
        Ok(created)
    }

    /// Moves the user to another conversation flow.
    pub async fn set_flow(&self, id: UserId, flow: FlowName) -> Result<(), DomainError> {
        self.users.update_flow(id, flow).await?;
        forget(self.cache.as_ref(), &user_key(id)).await;
        Ok(())
    }

    /// True if the peer may register.
    pub async fn is_allowed(&self, id: UserId) -> Result<bool, DomainError> {
        self.access.contains(id).await
    }
}
