//! Binding repository port.
//!
//! Conversation turns and the lifecycle sweep write bindings independently,
//! last write wins. Each update touches only the columns it names.

use crate::domain::foundation::{DomainError, GoalId, Timestamp, UserGoalId, UserId};
use crate::domain::goals::{GoalStatus, NewUserGoal, Phase, UserGoal};
use async_trait::async_trait;

#[async_trait]
pub trait UserGoalRepository: Send + Sync {
    /// Inserts a binding in `Planning/Soon`.
    ///
    /// # Errors
    ///
    /// - `Conflict` if a binding for the same user, category and window start
    ///   already exists
    /// - `DatabaseError` on persistence failure
    async fn create(&self, binding: &NewUserGoal) -> Result<UserGoal, DomainError>;

    /// Returns `None` if the binding does not exist.
    async fn find_by_id(&self, id: UserGoalId) -> Result<Option<UserGoal>, DomainError>;

    /// The user's bindings of the local day opening at `from`.
    ///
    /// Matches the window start exactly. Adjacent windows may overlap around
    /// a DST jump, so containment would also return the neighbouring day.
    async fn list_by_window_start(
        &self,
        user: UserId,
        from: Timestamp,
    ) -> Result<Vec<UserGoal>, DomainError>;

    /// Every binding currently in `phase`, across all users.
    async fn list_by_phase(&self, phase: Phase) -> Result<Vec<UserGoal>, DomainError>;

    /// Points the binding at another goal, leaving phase and status alone.
    async fn update_goal(&self, id: UserGoalId, goal: GoalId) -> Result<(), DomainError>;

    /// Writes phase and status together.
    async fn update_lifecycle(
        &self,
        id: UserGoalId,
        phase: Phase,
        status: GoalStatus,
    ) -> Result<(), DomainError>;

    async fn update_status(&self, id: UserGoalId, status: GoalStatus) -> Result<(), DomainError>;

    /// Hard delete. Deleting a missing binding is not an error.
    async fn delete(&self, id: UserGoalId) -> Result<(), DomainError>;
}
