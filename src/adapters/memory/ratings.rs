//! In-memory rating stores.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, UserGoalId, UserId};
use crate::domain::goals::{Evaluation, PendingRating};
use crate::ports::{EvaluationRepository, PendingRatingRepository};

#[derive(Default)]
pub struct InMemoryEvaluationRepository {
    votes: Arc<RwLock<Vec<Evaluation>>>,
}

impl InMemoryEvaluationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<Evaluation> {
        self.votes.read().await.clone()
    }
}

#[async_trait]
impl EvaluationRepository for InMemoryEvaluationRepository {
    async fn create(&self, evaluation: &Evaluation) -> Result<(), DomainError> {
        self.votes.write().await.push(evaluation.clone());
        Ok(())
    }

    async fn score(&self, user_goal: UserGoalId) -> Result<i64, DomainError> {
        Ok(self
            .votes
            .read()
            .await
            .iter()
            .filter(|v| v.user_goal == user_goal)
            .map(Evaluation::weight)
            .sum())
    }
}

#[derive(Default)]
pub struct InMemoryPendingRatingRepository {
    slots: Arc<RwLock<HashMap<UserId, PendingRating>>>,
}

impl InMemoryPendingRatingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PendingRatingRepository for InMemoryPendingRatingRepository {
    async fn get(&self, rater: UserId) -> Result<Option<PendingRating>, DomainError> {
        Ok(self.slots.read().await.get(&rater).copied())
    }

    async fn put(&self, pending: &PendingRating) -> Result<(), DomainError> {
        self.slots.write().await.insert(pending.rater, *pending);
        Ok(())
    }
}
