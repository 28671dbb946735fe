//! LifecycleObserver - hourly sweep advancing bindings from the wall clock.
//!
//! Each sweep scans `Planning` bindings, then re-reads `Active` ones, so a
//! binding whose whole window has already elapsed is settled in one sweep.
//! Rows are updated independently: a failed update is logged and the sweep
//! moves on. Transitions derive from stored state only, so re-running a sweep
//! is a no-op.
//!
//! No cross-process coordination is provided; run a single replica.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::goals::Phase;
use crate::ports::{Clock, UserGoalRepository};

use super::PeriodicTask;

/// Counters for one sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepReport {
    pub activated: usize,
    pub finished: usize,
    pub failed_updates: usize,
}

pub struct LifecycleObserver {
    user_goals: Arc<dyn UserGoalRepository>,
    clock: Arc<dyn Clock>,
    interval: Duration,
}

impl LifecycleObserver {
    pub fn new(user_goals: Arc<dyn UserGoalRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            user_goals,
            clock,
            interval: Duration::from_secs(3600),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// One sweep at the clock's current time.
    pub async fn sweep(&self) -> Result<SweepReport, DomainError> {
        let now = self.clock.now();
        let mut report = SweepReport::default();

        let (ok, failed) = self.advance_phase(Phase::Planning, now).await?;
        report.activated = ok;
        report.failed_updates += failed;

        let (ok, failed) = self.advance_phase(Phase::Active, now).await?;
        report.finished = ok;
        report.failed_updates += failed;

        if report.activated + report.finished + report.failed_updates > 0 {
            tracing::info!(
                activated = report.activated,
                finished = report.finished,
                failed_updates = report.failed_updates,
                "Lifecycle sweep applied transitions"
            );
        } else {
            tracing::debug!("Lifecycle sweep found nothing to do");
        }
        Ok(report)
    }

    async fn advance_phase(&self, phase: Phase, now: Timestamp) -> Result<(usize, usize), DomainError> {
        let mut applied = 0;
        let mut failed = 0;
        for binding in self.user_goals.list_by_phase(phase).await? {
            let Some(change) = binding.due_transition(now) else {
                continue;
            };
            match self
                .user_goals
                .update_lifecycle(binding.id, change.phase, change.status)
                .await
            {
                Ok(()) => applied += 1,
                Err(e) => {
                    failed += 1;
                    tracing::warn!(
                        user_goal_id = %binding.id,
                        target_phase = %change.phase,
                        error = %e,
                        "Failed to advance binding, will retry next sweep"
                    );
                }
            }
        }
        Ok((applied, failed))
    }
}

#[async_trait]
impl PeriodicTask for LifecycleObserver {
    fn name(&self) -> &'static str {
        "lifecycle_observer"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn run_once(&self) -> Result<(), DomainError> {
        self.sweep().await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryUserGoalRepository, ManualClock};
    use crate::domain::foundation::{
        DayWindow, ErrorCode, GoalId, GoalTypeId, Timezone, UserGoalId, UserId,
    };
    use crate::domain::goals::{GoalStatus, NewUserGoal, UserGoal};
    use chrono::{DateTime, NaiveDate, Utc};

    fn ts(s: &str) -> Timestamp {
        Timestamp::from_datetime(DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc))
    }

    fn draft(user: i64) -> NewUserGoal {
        NewUserGoal {
            user_id: UserId::new(user),
            goal_id: GoalId::new(1),
            goal_type: GoalTypeId::new(1),
            window: DayWindow::for_date(
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                Timezone::parse("Asia/Yekaterinburg").unwrap(),
            ),
        }
    }

    /// Delegates to the in-memory store but refuses updates of one binding.
    struct FlakyRepo {
        inner: InMemoryUserGoalRepository,
        broken: UserGoalId,
    }

    #[async_trait]
    impl UserGoalRepository for FlakyRepo {
        async fn create(&self, binding: &NewUserGoal) -> Result<UserGoal, DomainError> {
            self.inner.create(binding).await
        }
        async fn find_by_id(&self, id: UserGoalId) -> Result<Option<UserGoal>, DomainError> {
            self.inner.find_by_id(id).await
        }
        async fn list_by_window_start(&self, user: UserId, from: Timestamp) -> Result<Vec<UserGoal>, DomainError> {
            self.inner.list_by_window_start(user, from).await
        }
        async fn list_by_phase(&self, phase: Phase) -> Result<Vec<UserGoal>, DomainError> {
            self.inner.list_by_phase(phase).await
        }
        async fn update_goal(&self, id: UserGoalId, goal: GoalId) -> Result<(), DomainError> {
            self.inner.update_goal(id, goal).await
        }
        async fn update_lifecycle(&self, id: UserGoalId, phase: Phase, status: GoalStatus) -> Result<(), DomainError> {
            if id == self.broken {
                return Err(DomainError::new(ErrorCode::DatabaseError, "connection reset"));
            }
            self.inner.update_lifecycle(id, phase, status).await
        }
        async fn update_status(&self, id: UserGoalId, status: GoalStatus) -> Result<(), DomainError> {
            self.inner.update_status(id, status).await
        }
        async fn delete(&self, id: UserGoalId) -> Result<(), DomainError> {
            self.inner.delete(id).await
        }
    }

    #[tokio::test]
    async fn sweep_activates_opened_window() {
        let repo = Arc::new(InMemoryUserGoalRepository::new());
        let binding = repo.create(&draft(1)).await.unwrap();
        let clock = Arc::new(ManualClock::new(ts("2024-03-01T01:30:00Z")));
        let observer = LifecycleObserver::new(repo.clone(), clock);

        let report = observer.sweep().await.unwrap();
        assert_eq!(report.activated, 1);

        let stored = repo.find_by_id(binding.id).await.unwrap().unwrap();
        assert_eq!(stored.phase, Phase::Active);
        assert_eq!(stored.status, GoalStatus::InProgress);
    }

    #[tokio::test]
    async fn sweep_before_window_is_noop() {
        let repo = Arc::new(InMemoryUserGoalRepository::new());
        repo.create(&draft(1)).await.unwrap();
        let clock = Arc::new(ManualClock::new(ts("2024-03-01T00:00:00Z")));

        let report = LifecycleObserver::new(repo, clock).sweep().await.unwrap();
        assert_eq!(report, SweepReport::default());
    }

    #[tokio::test]
    async fn elapsed_window_settles_in_one_sweep() {
        let repo = Arc::new(InMemoryUserGoalRepository::new());
        let binding = repo.create(&draft(1)).await.unwrap();
        let clock = Arc::new(ManualClock::new(ts("2024-03-02T01:00:00Z")));

        let report = LifecycleObserver::new(repo.clone(), clock).sweep().await.unwrap();
        assert_eq!((report.activated, report.finished), (1, 1));

        let stored = repo.find_by_id(binding.id).await.unwrap().unwrap();
        assert_eq!(stored.phase, Phase::Finished);
        assert_eq!(stored.status, GoalStatus::Failed);
    }

    #[tokio::test]
    async fn second_sweep_is_idempotent() {
        let repo = Arc::new(InMemoryUserGoalRepository::new());
        repo.create(&draft(1)).await.unwrap();
        let clock = Arc::new(ManualClock::new(ts("2024-03-02T01:00:00Z")));
        let observer = LifecycleObserver::new(repo.clone(), clock);

        observer.sweep().await.unwrap();
        let before = repo.all().await;
        let report = observer.sweep().await.unwrap();

        assert_eq!(report, SweepReport::default());
        assert_eq!(repo.all().await, before);
    }

    #[tokio::test]
    async fn failed_row_does_not_stop_sweep() {
        let inner = InMemoryUserGoalRepository::new();
        let broken = inner.create(&draft(1)).await.unwrap();
        let healthy = inner.create(&draft(2)).await.unwrap();
        let repo = Arc::new(FlakyRepo {
            inner,
            broken: broken.id,
        });
        let clock = Arc::new(ManualClock::new(ts("2024-03-01T02:00:00Z")));

        let report = LifecycleObserver::new(repo.clone(), clock).sweep().await.unwrap();

        assert_eq!(report.activated, 1);
        assert_eq!(report.failed_updates, 1);
        let stored = repo.find_by_id(healthy.id).await.unwrap().unwrap();
        assert_eq!(stored.phase, Phase::Active);
        let untouched = repo.find_by_id(broken.id).await.unwrap().unwrap();
        assert_eq!(untouched.phase, Phase::Planning);
    }
}
