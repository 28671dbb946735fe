//! Goal catalog ports.
//!
//! Catalog rows are read-mostly. Goals are created on first use (free-text
//! input) and never modified afterwards.

use crate::domain::foundation::{DomainError, GoalId, GoalTypeId};
use crate::domain::goals::{Goal, GoalType, NewGoal};
use async_trait::async_trait;

/// Read access to goal categories.
#[async_trait]
pub trait GoalTypeRepository: Send + Sync {
    /// All categories, ordered by id.
    async fn list(&self) -> Result<Vec<GoalType>, DomainError>;

    /// Returns `None` if the category does not exist.
    async fn find_by_id(&self, id: GoalTypeId) -> Result<Option<GoalType>, DomainError>;
}

/// Storage for concrete goals.
#[async_trait]
pub trait GoalRepository: Send + Sync {
    /// Persists a new goal and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// - `GoalTypeNotFound` if the category does not exist
    /// - `DatabaseError` on persistence failure
    async fn create(&self, goal: &NewGoal) -> Result<Goal, DomainError>;

    /// Returns `None` if the goal does not exist.
    async fn find_by_id(&self, id: GoalId) -> Result<Option<Goal>, DomainError>;

    /// Catalog goals of one category, ordered by id.
    async fn list_by_type(&self, goal_type: GoalTypeId) -> Result<Vec<Goal>, DomainError>;
}
