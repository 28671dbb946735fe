//! GoalCatalog - cached read access to categories and goals.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, GoalId, GoalTypeId};
use crate::domain::goals::{Goal, GoalType, NewGoal};
use crate::ports::{Cache, GoalRepository, GoalTypeRepository};

use super::read_through::{cached, remember};

pub const GOAL_TYPE_LIST_KEY: &str = "goal_type_list";

fn goal_type_key(id: GoalTypeId) -> String {
    format!("goal_type_{}", id)
}

/// Category list and per-category lookups go through the cache without
/// expiry; categories are immutable once seeded.
pub struct GoalCatalog {
    types: Arc<dyn GoalTypeRepository>,
    goals: Arc<dyn GoalRepository>,
    cache: Arc<dyn Cache>,
}

impl GoalCatalog {
    pub fn new(
        types: Arc<dyn GoalTypeRepository>,
        goals: Arc<dyn GoalRepository>,
        cache: Arc<dyn Cache>,
    ) -> Self {
        Self {
            types,
            goals,
            cache,
        }
    }

    /// All categories, ordered by id.
    pub async fn goal_types(&self) -> Result<Vec<GoalType>, DomainError> {
        if let Some(types) = cached(self.cache.as_ref(), GOAL_TYPE_LIST_KEY).await {
            return Ok(types);
        }
        let types = self.types.list().await?;
        remember(self.cache.as_ref(), GOAL_TYPE_LIST_KEY, &types, None).await;
        Ok(types)
    }

    pub async fn goal_type(&self, id: GoalTypeId) -> Result<Option<GoalType>, DomainError> {
        let key = goal_type_key(id);
        if let Some(goal_type) = cached(self.cache.as_ref(), &key).await {
            return Ok(Some(goal_type));
        }
        let found = self.types.find_by_id(id).await?;
        if let Some(goal_type) = &found {
            remember(self.cache.as_ref(), &key, goal_type, None).await;
        }
        Ok(found)
    }

    pub async fn goal(&self, id: GoalId) -> Result<Option<Goal>, DomainError> {
        self.goals.find_by_id(id).await
    }

    pub async fn goals_of_type(&self, goal_type: GoalTypeId) -> Result<Vec<Goal>, DomainError> {
        self.goals.list_by_type(goal_type).await
    }

    pub async fn create_goal(&self, draft: &NewGoal) -> Result<Goal, DomainError> {
        self.goals.create(draft).await
    }
}
