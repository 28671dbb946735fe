//! GoalAssignmentManager - binds goals to users for a category and local day.
//!
//! At most one binding exists per (user, category, local day). Reassigning a
//! category for a day that already has a binding rewrites its goal in place
//! and keeps its phase and status, so an active slot keeps its progress.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, GoalTypeId, Timestamp, UserGoalId};
use crate::domain::goals::{Goal, GoalChoice, NewUserGoal, UserGoal};
use crate::domain::users::User;
use crate::ports::UserGoalRepository;

use super::GoalCatalog;

/// A binding together with the goal it points at.
///
/// `goal` is `None` only if the goal row vanished underneath the binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedGoal {
    pub binding: UserGoal,
    pub goal: Option<Goal>,
}

pub struct GoalAssignmentManager {
    catalog: Arc<GoalCatalog>,
    user_goals: Arc<dyn UserGoalRepository>,
}

impl GoalAssignmentManager {
    pub fn new(catalog: Arc<GoalCatalog>, user_goals: Arc<dyn UserGoalRepository>) -> Self {
        Self {
            catalog,
            user_goals,
        }
    }

    /// Binds `choice` to the user's local day containing `instant`.
    ///
    /// A new goal is persisted first. An existing binding for the same
    /// category and day only has its goal replaced; otherwise a binding is
    /// created in `Planning/Soon`.
    ///
    /// # Errors
    ///
    /// - `Conflict` if a concurrent turn created the same binding between the
    ///   lookup and the insert
    /// - `DatabaseError` on persistence failure
    pub async fn assign_goal(
        &self,
        user: &User,
        choice: GoalChoice,
        instant: Timestamp,
    ) -> Result<UserGoal, DomainError> {
        let goal = match choice {
            GoalChoice::Existing(goal) => goal,
            GoalChoice::New(draft) => self.catalog.create_goal(&draft).await?,
        };

        if let Some(mut binding) = self.get_by_type(user, instant, goal.goal_type).await? {
            self.user_goals.update_goal(binding.id, goal.id).await?;
            tracing::debug!(
                user_id = %user.id,
                user_goal_id = %binding.id,
                goal_id = %goal.id,
                "Reassigned goal of existing binding"
            );
            binding.goal_id = goal.id;
            return Ok(binding);
        }

        let created = self
            .user_goals
            .create(&NewUserGoal {
                user_id: user.id,
                goal_id: goal.id,
                goal_type: goal.goal_type,
                window: user.day_window(instant),
            })
            .await?;
        tracing::debug!(user_id = %user.id, user_goal_id = %created.id, "Created binding");
        Ok(created)
    }

    /// Toggles the status of the day's binding of `goal_type`:
    /// `Complete` goes back to `InProgress`, anything else becomes `Complete`.
    ///
    /// Returns the updated bindings (at most one by invariant).
    pub async fn set_status(
        &self,
        user: &User,
        instant: Timestamp,
        goal_type: GoalTypeId,
    ) -> Result<Vec<UserGoal>, DomainError> {
        let mut updated = Vec::new();
        for mut binding in self.user_goals(user, instant).await? {
            if binding.goal_type != goal_type {
                continue;
            }
            let status = binding.status.toggled();
            self.user_goals.update_status(binding.id, status).await?;
            binding.status = status;
            updated.push(binding);
        }
        Ok(updated)
    }

    /// Hard-deletes a binding.
    pub async fn reject_goal(&self, id: UserGoalId) -> Result<(), DomainError> {
        self.user_goals.delete(id).await?;
        tracing::info!(user_goal_id = %id, "Binding rejected");
        Ok(())
    }

    /// True iff every category has a binding on the local day of `instant`.
    pub async fn check_date(&self, user: &User, instant: Timestamp) -> Result<bool, DomainError> {
        let planned: HashSet<GoalTypeId> = self
            .user_goals(user, instant)
            .await?
            .into_iter()
            .map(|b| b.goal_type)
            .collect();
        let types = self.catalog.goal_types().await?;
        Ok(types.iter().all(|t| planned.contains(&t.id)))
    }

    /// The day's binding of one category.
    pub async fn get_by_type(
        &self,
        user: &User,
        instant: Timestamp,
        goal_type: GoalTypeId,
    ) -> Result<Option<UserGoal>, DomainError> {
        Ok(self
            .user_goals(user, instant)
            .await?
            .into_iter()
            .find(|b| b.goal_type == goal_type))
    }

    /// All bindings of the user's local day containing `instant`.
    pub async fn user_goals(&self, user: &User, instant: Timestamp) -> Result<Vec<UserGoal>, DomainError> {
        let from = user.day_window(instant).from();
        self.user_goals.list_by_window_start(user.id, from).await
    }

    /// The day's bindings with their goals, for display.
    pub async fn day_plan(&self, user: &User, instant: Timestamp) -> Result<Vec<PlannedGoal>, DomainError> {
        let mut plan = Vec::new();
        for binding in self.user_goals(user, instant).await? {
            let goal = self.catalog.goal(binding.goal_id).await?;
            plan.push(PlannedGoal { binding, goal });
        }
        plan.sort_by_key(|p| p.binding.goal_type);
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryCache, InMemoryGoalCatalog, InMemoryUserGoalRepository, ManualClock};
    use crate::domain::foundation::{GoalId, Timezone, UserId};
    use crate::domain::goals::{GoalStatus, GoalType, NewGoal, Phase};
    use crate::domain::users::FlowName;
    use crate::ports::GoalRepository;
    use chrono::{DateTime, Utc};

    fn ts(s: &str) -> Timestamp {
        Timestamp::from_datetime(DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc))
    }

    fn category(id: i64) -> GoalType {
        GoalType {
            id: GoalTypeId::new(id),
            name: format!("type {}", id),
            points: 1,
            evaluated: false,
            from_list: false,
        }
    }

    fn user() -> User {
        User {
            id: UserId::new(100),
            first_name: "Test".to_string(),
            last_name: String::new(),
            city: String::new(),
            timezone: Timezone::parse("Asia/Yekaterinburg").unwrap(),
            active: true,
            flow: FlowName::Tasks,
            created_at: Timestamp::now(),
        }
    }

    struct Fixture {
        store: Arc<InMemoryGoalCatalog>,
        bindings: Arc<InMemoryUserGoalRepository>,
        manager: GoalAssignmentManager,
    }

    async fn setup() -> Fixture {
        let store = Arc::new(
            InMemoryGoalCatalog::new()
                .with_types(vec![category(1), category(2), category(3)])
                .await,
        );
        let cache = Arc::new(InMemoryCache::new(Arc::new(ManualClock::new(Timestamp::now()))));
        let catalog = Arc::new(GoalCatalog::new(store.clone(), store.clone(), cache));
        let bindings = Arc::new(InMemoryUserGoalRepository::new());
        let manager = GoalAssignmentManager::new(catalog, bindings.clone());
        Fixture {
            store,
            bindings,
            manager,
        }
    }

    fn fresh(goal_type: i64, text: &str) -> GoalChoice {
        GoalChoice::New(NewGoal::new(GoalTypeId::new(goal_type), text).unwrap())
    }

    #[tokio::test]
    async fn assign_creates_planning_binding_for_local_day() {
        let f = setup().await;
        let binding = f
            .manager
            .assign_goal(&user(), fresh(1, "run"), ts("2024-03-01T10:00:00Z"))
            .await
            .unwrap();

        assert_eq!(binding.phase, Phase::Planning);
        assert_eq!(binding.status, GoalStatus::Soon);
        assert_eq!(binding.from(), ts("2024-03-01T01:00:00Z"));
        assert_eq!(binding.to(), ts("2024-03-02T00:59:59Z"));
    }

    #[tokio::test]
    async fn reassigning_same_day_updates_goal_in_place() {
        let f = setup().await;
        let first = f
            .manager
            .assign_goal(&user(), fresh(1, "run"), ts("2024-03-01T02:00:00Z"))
            .await
            .unwrap();
        f.bindings
            .update_lifecycle(first.id, Phase::Active, GoalStatus::Complete)
            .await
            .unwrap();

        let second = f
            .manager
            .assign_goal(&user(), fresh(1, "swim"), ts("2024-03-01T20:00:00Z"))
            .await
            .unwrap();

        let all = f.bindings.all().await;
        assert_eq!(all.len(), 1);
        assert_eq!(second.id, first.id);
        assert_ne!(all[0].goal_id, first.goal_id);
        assert_eq!(all[0].phase, Phase::Active);
        assert_eq!(all[0].status, GoalStatus::Complete);
    }

    #[tokio::test]
    async fn existing_catalog_goal_is_not_duplicated() {
        let f = setup().await;
        let goal = Goal {
            id: GoalId::new(50),
            goal_type: GoalTypeId::new(2),
            description: "wake at 6".to_string(),
        };
        f.store.insert_goal(goal.clone()).await;

        let binding = f
            .manager
            .assign_goal(&user(), GoalChoice::Existing(goal), ts("2024-03-01T10:00:00Z"))
            .await
            .unwrap();

        assert_eq!(binding.goal_id, GoalId::new(50));
        assert_eq!(f.store.list_by_type(GoalTypeId::new(2)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn set_status_toggles_only_matching_type() {
        let f = setup().await;
        let at = ts("2024-03-01T10:00:00Z");
        f.manager.assign_goal(&user(), fresh(1, "run"), at).await.unwrap();
        f.manager.assign_goal(&user(), fresh(2, "read"), at).await.unwrap();

        let updated = f.manager.set_status(&user(), at, GoalTypeId::new(1)).await.unwrap();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].status, GoalStatus::Complete);

        let again = f.manager.set_status(&user(), at, GoalTypeId::new(1)).await.unwrap();
        assert_eq!(again[0].status, GoalStatus::InProgress);

        let other = f.manager.get_by_type(&user(), at, GoalTypeId::new(2)).await.unwrap().unwrap();
        assert_eq!(other.status, GoalStatus::Soon);
    }

    #[tokio::test]
    async fn check_date_requires_every_category() {
        let f = setup().await;
        let at = ts("2024-03-01T10:00:00Z");
        f.manager.assign_goal(&user(), fresh(1, "a"), at).await.unwrap();
        f.manager.assign_goal(&user(), fresh(2, "b"), at).await.unwrap();
        assert!(!f.manager.check_date(&user(), at).await.unwrap());

        f.manager.assign_goal(&user(), fresh(3, "c"), at).await.unwrap();
        assert!(f.manager.check_date(&user(), at).await.unwrap());
        assert!(!f.manager.check_date(&user(), at.add_days(1)).await.unwrap());
    }

    #[tokio::test]
    async fn spring_forward_day_gets_its_own_binding() {
        let f = setup().await;
        let mut owner = user();
        owner.timezone = Timezone::parse("America/New_York").unwrap();
        let saturday = ts("2024-03-09T15:00:00Z");
        let sunday = ts("2024-03-10T15:00:00Z");

        let first = f.manager.assign_goal(&owner, fresh(1, "run"), saturday).await.unwrap();
        f.manager.assign_goal(&owner, fresh(2, "read"), saturday).await.unwrap();
        f.manager.assign_goal(&owner, fresh(3, "cook"), saturday).await.unwrap();
        let second = f.manager.assign_goal(&owner, fresh(1, "swim"), sunday).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(second.from(), ts("2024-03-10T10:00:00Z"));
        assert_eq!(f.bindings.all().await.len(), 4);

        let kept = f.manager.get_by_type(&owner, saturday, GoalTypeId::new(1)).await.unwrap().unwrap();
        assert_eq!(kept.goal_id, first.goal_id);
        assert_eq!(f.manager.user_goals(&owner, sunday).await.unwrap(), vec![second]);
        assert!(f.manager.check_date(&owner, saturday).await.unwrap());
        assert!(!f.manager.check_date(&owner, sunday).await.unwrap());
    }

    #[tokio::test]
    async fn reject_deletes_binding() {
        let f = setup().await;
        let at = ts("2024-03-01T10:00:00Z");
        let binding = f.manager.assign_goal(&user(), fresh(1, "a"), at).await.unwrap();

        f.manager.reject_goal(binding.id).await.unwrap();
        assert!(f.manager.user_goals(&user(), at).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn day_plan_pairs_bindings_with_goals() {
        let f = setup().await;
        let at = ts("2024-03-01T10:00:00Z");
        f.manager.assign_goal(&user(), fresh(2, "read"), at).await.unwrap();
        f.manager.assign_goal(&user(), fresh(1, "run"), at).await.unwrap();

        let plan = f.manager.day_plan(&user(), at).await.unwrap();
        let described: Vec<_> = plan
            .iter()
            .map(|p| p.goal.as_ref().map(|g| g.description.as_str()))
            .collect();
        assert_eq!(described, vec![Some("run"), Some("read")]);
    }
}
