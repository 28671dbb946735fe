//! In-memory goal catalog.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, GoalId, GoalTypeId};
use crate::domain::goals::{Goal, GoalType, NewGoal};
use crate::ports::{GoalRepository, GoalTypeRepository};

/// Categories and goals held in ordered maps.
///
/// Counts store reads so tests can observe read-through caching.
#[derive(Default)]
pub struct InMemoryGoalCatalog {
    types: Arc<RwLock<BTreeMap<GoalTypeId, GoalType>>>,
    goals: Arc<RwLock<BTreeMap<GoalId, Goal>>>,
    type_reads: AtomicUsize,
}

impl InMemoryGoalCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds categories.
    pub async fn with_types(self, types: Vec<GoalType>) -> Self {
        {
            let mut stored = self.types.write().await;
            for goal_type in types {
                stored.insert(goal_type.id, goal_type);
            }
        }
        self
    }

    /// Seeds a catalog goal with a fixed id.
    pub async fn insert_goal(&self, goal: Goal) {
        self.goals.write().await.insert(goal.id, goal);
    }

    /// How many times categories were read from the store.
    pub fn type_reads(&self) -> usize {
        self.type_reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GoalTypeRepository for InMemoryGoalCatalog {
    async fn list(&self) -> Result<Vec<GoalType>, DomainError> {
        self.type_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.types.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: GoalTypeId) -> Result<Option<GoalType>, DomainError> {
        self.type_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.types.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl GoalRepository for InMemoryGoalCatalog {
    async fn create(&self, goal: &NewGoal) -> Result<Goal, DomainError> {
        if !self.types.read().await.contains_key(&goal.goal_type()) {
            return Err(DomainError::new(
                ErrorCode::GoalTypeNotFound,
                format!("Goal type {} does not exist", goal.goal_type()),
            ));
        }
        let mut goals = self.goals.write().await;
        let next_id = goals.keys().next_back().map_or(1, |id| id.value() + 1);
        let stored = Goal {
            id: GoalId::new(next_id),
            goal_type: goal.goal_type(),
            description: goal.description().to_string(),
        };
        goals.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: GoalId) -> Result<Option<Goal>, DomainError> {
        Ok(self.goals.read().await.get(&id).cloned())
    }

    async fn list_by_type(&self, goal_type: GoalTypeId) -> Result<Vec<Goal>, DomainError> {
        Ok(self
            .goals
            .read()
            .await
            .values()
            .filter(|g| g.goal_type == goal_type)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64) -> GoalType {
        GoalType {
            id: GoalTypeId::new(id),
            name: format!("type {}", id),
            points: 1,
            evaluated: false,
            from_list: false,
        }
    }

    #[tokio::test]
    async fn created_goals_get_increasing_ids() {
        let catalog = InMemoryGoalCatalog::new().with_types(vec![category(1)]).await;

        let first = catalog.create(&NewGoal::new(GoalTypeId::new(1), "a").unwrap()).await.unwrap();
        let second = catalog.create(&NewGoal::new(GoalTypeId::new(1), "b").unwrap()).await.unwrap();

        assert!(second.id > first.id);
        assert_eq!(catalog.list_by_type(GoalTypeId::new(1)).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn creating_goal_in_unknown_type_fails() {
        let catalog = InMemoryGoalCatalog::new();
        let err = catalog
            .create(&NewGoal::new(GoalTypeId::new(9), "a").unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::GoalTypeNotFound);
    }
}
