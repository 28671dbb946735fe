//! In-memory binding store.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{
    DomainError, ErrorCode, GoalId, Timestamp, UserGoalId, UserId,
};
use crate::domain::goals::{GoalStatus, NewUserGoal, Phase, UserGoal};
use crate::ports::UserGoalRepository;

/// Bindings keyed by id, with the same uniqueness rule as the SQL schema:
/// one row per `(user, category, window start)`.
#[derive(Default)]
pub struct InMemoryUserGoalRepository {
    rows: Arc<RwLock<BTreeMap<UserGoalId, UserGoal>>>,
}

impl InMemoryUserGoalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored binding, ordered by id.
    pub async fn all(&self) -> Vec<UserGoal> {
        self.rows.read().await.values().cloned().collect()
    }

    /// Inserts a fully formed row, bypassing the uniqueness check.
    pub async fn insert(&self, binding: UserGoal) {
        self.rows.write().await.insert(binding.id, binding);
    }

    async fn modify(
        &self,
        id: UserGoalId,
        f: impl FnOnce(&mut UserGoal) + Send,
    ) -> Result<(), DomainError> {
        let mut rows = self.rows.write().await;
        let row = rows.get_mut(&id).ok_or_else(|| {
            DomainError::new(ErrorCode::UserGoalNotFound, format!("Binding {} not found", id))
        })?;
        f(row);
        Ok(())
    }
}

#[async_trait]
impl UserGoalRepository for InMemoryUserGoalRepository {
    async fn create(&self, binding: &NewUserGoal) -> Result<UserGoal, DomainError> {
        let mut rows = self.rows.write().await;
        let duplicate = rows.values().any(|row| {
            row.user_id == binding.user_id
                && row.goal_type == binding.goal_type
                && row.from() == binding.window.from()
        });
        if duplicate {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                "A binding for this user, goal type and day already exists",
            ));
        }
        let next_id = rows.keys().next_back().map_or(1, |id| id.value() + 1);
        let stored = binding.clone().into_user_goal(UserGoalId::new(next_id));
        rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: UserGoalId) -> Result<Option<UserGoal>, DomainError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn list_by_window_start(
        &self,
        user: UserId,
        from: Timestamp,
    ) -> Result<Vec<UserGoal>, DomainError> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .filter(|row| row.user_id == user && row.from() == from)
            .cloned()
            .collect())
    }

    async fn list_by_phase(&self, phase: Phase) -> Result<Vec<UserGoal>, DomainError> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .filter(|row| row.phase == phase)
            .cloned()
            .collect())
    }

    async fn update_goal(&self, id: UserGoalId, goal: GoalId) -> Result<(), DomainError> {
        self.modify(id, |row| row.goal_id = goal).await
    }

    async fn update_lifecycle(
        &self,
        id: UserGoalId,
        phase: Phase,
        status: GoalStatus,
    ) -> Result<(), DomainError> {
        self.modify(id, |row| {
            row.phase = phase;
            row.status = status;
        })
        .await
    }

    async fn update_status(&self, id: UserGoalId, status: GoalStatus) -> Result<(), DomainError> {
        self.modify(id, |row| row.status = status).await
    }

    async fn delete(&self, id: UserGoalId) -> Result<(), DomainError> {
        self.rows.write().await.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DayWindow, GoalTypeId, Timezone};

    fn draft(user: i64, goal_type: i64) -> NewUserGoal {
        NewUserGoal {
            user_id: UserId::new(user),
            goal_id: GoalId::new(1),
            goal_type: GoalTypeId::new(goal_type),
            window: DayWindow::containing(Timestamp::from_unix_secs(1_709_280_000).unwrap(), Timezone::default()),
        }
    }

    #[tokio::test]
    async fn duplicate_day_binding_conflicts() {
        let repo = InMemoryUserGoalRepository::new();
        repo.create(&draft(1, 1)).await.unwrap();

        let err = repo.create(&draft(1, 1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert!(repo.create(&draft(1, 2)).await.is_ok());
        assert!(repo.create(&draft(2, 1)).await.is_ok());
    }

    #[tokio::test]
    async fn list_by_window_start_filters_by_user_and_exact_start() {
        let repo = InMemoryUserGoalRepository::new();
        let stored = repo.create(&draft(1, 1)).await.unwrap();
        repo.create(&draft(2, 1)).await.unwrap();

        let found = repo.list_by_window_start(UserId::new(1), stored.from()).await.unwrap();
        assert_eq!(found, vec![stored.clone()]);

        let inside = repo
            .list_by_window_start(UserId::new(1), stored.from().add_secs(3600))
            .await
            .unwrap();
        assert!(inside.is_empty());
    }

    #[tokio::test]
    async fn updating_missing_binding_is_not_found() {
        let repo = InMemoryUserGoalRepository::new();
        let err = repo
            .update_status(UserGoalId::new(99), GoalStatus::Complete)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UserGoalNotFound);
    }
}
