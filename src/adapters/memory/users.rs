//! In-memory user registry and allow-list.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::users::{FlowName, NewUser, User};
use crate::ports::{AccessList, UserRepository};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<BTreeMap<UserId, User>>>,
    reads: AtomicUsize,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store lookups by id, for cache assertions.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                format!("User {} already exists", user.id),
            ));
        }
        let stored = user.clone().into_user(Timestamp::now());
        users.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn update_flow(&self, id: UserId, flow: FlowName) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or_else(|| {
            DomainError::new(ErrorCode::UserNotFound, format!("User {} not found", id))
        })?;
        user.flow = flow;
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryAccessList {
    allowed: Arc<RwLock<HashSet<UserId>>>,
}

impl InMemoryAccessList {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn allow(&self, id: UserId) {
        self.allowed.write().await.insert(id);
    }
}

#[async_trait]
impl AccessList for InMemoryAccessList {
    async fn contains(&self, id: UserId) -> Result<bool, DomainError> {
        Ok(self.allowed.read().await.contains(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timezone;

    fn new_user(id: i64) -> NewUser {
        NewUser {
            id: UserId::new(id),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            city: String::new(),
            timezone: Timezone::default(),
            flow: FlowName::Menu,
        }
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let repo = InMemoryUserRepository::new();
        repo.create(&new_user(1)).await.unwrap();

        let err = repo.create(&new_user(1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn update_flow_of_unknown_user_fails() {
        let repo = InMemoryUserRepository::new();
        let err = repo.update_flow(UserId::new(3), FlowName::Rate).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNotFound);
    }

    #[tokio::test]
    async fn access_list_contains_only_allowed() {
        let list = InMemoryAccessList::new();
        list.allow(UserId::new(1)).await;

        assert!(list.contains(UserId::new(1)).await.unwrap());
        assert!(!list.contains(UserId::new(2)).await.unwrap());
    }
}
