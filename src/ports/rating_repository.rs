//! Peer rating ports.

use crate::domain::foundation::{DomainError, UserGoalId, UserId};
use crate::domain::goals::{Evaluation, PendingRating};
use async_trait::async_trait;

/// Append-only log of votes.
#[async_trait]
pub trait EvaluationRepository: Send + Sync {
    async fn create(&self, evaluation: &Evaluation) -> Result<(), DomainError>;

    /// `Σ(+1 approve, −1 disapprove)` over every vote on the binding.
    async fn score(&self, user_goal: UserGoalId) -> Result<i64, DomainError>;
}

/// Single-slot-per-rater queue of bindings awaiting review.
///
/// Populated outside this crate's flows; the rating flow only reads it.
#[async_trait]
pub trait PendingRatingRepository: Send + Sync {
    /// Returns `None` when nothing is queued for the rater.
    async fn get(&self, rater: UserId) -> Result<Option<PendingRating>, DomainError>;

    /// Replaces the rater's slot.
    async fn put(&self, pending: &PendingRating) -> Result<(), DomainError>;
}
