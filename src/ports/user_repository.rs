//! User registry ports.

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::users::{FlowName, NewUser, User};
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// # Errors
    ///
    /// - `Conflict` if the user is already registered
    /// - `DatabaseError` on persistence failure
    async fn create(&self, user: &NewUser) -> Result<User, DomainError>;

    /// Returns `None` if the user is not registered.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Every registered user.
    async fn list(&self) -> Result<Vec<User>, DomainError>;

    /// # Errors
    ///
    /// - `UserNotFound` if the user is not registered
    async fn update_flow(&self, id: UserId, flow: FlowName) -> Result<(), DomainError>;
}

/// Enrollment allow-list checked before registration.
#[async_trait]
pub trait AccessList: Send + Sync {
    async fn contains(&self, id: UserId) -> Result<bool, DomainError>;
}
