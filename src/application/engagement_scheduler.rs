//! EngagementScheduler - hourly per-user reminder evaluation.
//!
//! Each pass walks every user, evaluates the trigger rules against the user's
//! local hour, and hands due reminders to [`EngagementScheduler::send`], which
//! deduplicates on `(user, code, text)` through a marker in the cache. The
//! marker outlives the trigger window, so each reminder goes out at most once
//! per day.

use async_trait::async_trait;
use chrono::Timelike;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::domain::engagement::{EngagementSnapshot, Message, NotificationCode, WakeWindow};
use crate::domain::foundation::{DomainError, ErrorCode, GoalTypeId, UserId};
use crate::domain::users::User;
use crate::ports::{Cache, Clock};

use super::{GoalAssignmentManager, GoalCatalog, PeriodicTask, UserDirectory};

/// Tunables of the scheduler.
#[derive(Debug, Clone)]
pub struct EngagementSettings {
    /// Delay between passes.
    pub interval: Duration,
    /// Lifetime of a dedup marker.
    pub dedup_ttl: Duration,
    /// Category whose chosen goal selects the wake window.
    pub wake_goal_type: GoalTypeId,
}

impl Default for EngagementSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3600),
            dedup_ttl: Duration::from_secs(8 * 3600),
            wake_goal_type: GoalTypeId::new(1),
        }
    }
}

/// Counters for one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassReport {
    pub users: usize,
    pub enqueued: usize,
    pub failed_users: usize,
}

pub struct EngagementScheduler {
    users: Arc<UserDirectory>,
    assignments: Arc<GoalAssignmentManager>,
    catalog: Arc<GoalCatalog>,
    cache: Arc<dyn Cache>,
    clock: Arc<dyn Clock>,
    outbox: mpsc::UnboundedSender<Message>,
    settings: EngagementSettings,
}

impl EngagementScheduler {
    pub fn new(
        users: Arc<UserDirectory>,
        assignments: Arc<GoalAssignmentManager>,
        catalog: Arc<GoalCatalog>,
        cache: Arc<dyn Cache>,
        clock: Arc<dyn Clock>,
        outbox: mpsc::UnboundedSender<Message>,
    ) -> Self {
        Self {
            users,
            assignments,
            catalog,
            cache,
            clock,
            outbox,
            settings: EngagementSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: EngagementSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Enqueues `Message{user, code, text}` unless an identical one was
    /// enqueued within the dedup TTL. Returns whether it was enqueued.
    ///
    /// The marker is written before the message is queued; if the queue is
    /// closed the marker stays and the message is lost for this period.
    pub async fn send(&self, user: UserId, code: NotificationCode, text: &str) -> Result<bool, DomainError> {
        let message = Message::new(user, code, text);
        let key = message.dedup_key();

        if self.cache.get(&key).await?.is_some() {
            tracing::debug!(user_id = %user, code = %code, "Notification suppressed by dedup marker");
            return Ok(false);
        }
        self.cache.set(&key, "1", Some(self.settings.dedup_ttl)).await?;

        self.outbox.send(message).map_err(|_| {
            DomainError::new(ErrorCode::InternalError, "Outbound message queue is closed")
        })?;
        tracing::debug!(user_id = %user, code = %code, "Notification enqueued");
        Ok(true)
    }

    /// Evaluates one user and enqueues whatever is due.
    pub async fn check_user(&self, user: &User) -> Result<Vec<NotificationCode>, DomainError> {
        let now = self.clock.now();
        let today = self.assignments.user_goals(user, now).await?;
        let tomorrow_start = user.day_window(now).next(user.timezone).from();
        let tomorrow = self.assignments.user_goals(user, tomorrow_start).await?;
        let goal_types = self.catalog.goal_types().await?;

        let snapshot = EngagementSnapshot {
            local_hour: now.in_zone(&user.timezone.tz()).hour(),
            wake: WakeWindow::select(&today, self.settings.wake_goal_type),
            today_count: today.len(),
            tomorrow_count: tomorrow.len(),
            goal_type_count: goal_types.len(),
        };

        let mut enqueued = Vec::new();
        for code in snapshot.due() {
            if self.send(user.id, code, "").await? {
                enqueued.push(code);
            }
        }
        Ok(enqueued)
    }

    /// One pass over all active users; a failing user is logged and skipped.
    pub async fn run_pass(&self) -> Result<PassReport, DomainError> {
        let mut report = PassReport::default();
        for user in self.users.list().await? {
            if !user.active {
                continue;
            }
            report.users += 1;
            match self.check_user(&user).await {
                Ok(codes) => report.enqueued += codes.len(),
                Err(e) => {
                    report.failed_users += 1;
                    tracing::warn!(user_id = %user.id, error = %e, "Engagement check failed");
                }
            }
        }
        tracing::debug!(
            users = report.users,
            enqueued = report.enqueued,
            failed_users = report.failed_users,
            "Engagement pass complete"
        );
        Ok(report)
    }
}

#[async_trait]
impl PeriodicTask for EngagementScheduler {
    fn name(&self) -> &'static str {
        "engagement_scheduler"
    }

    fn interval(&self) -> Duration {
        self.settings.interval
    }

    async fn run_once(&self) -> Result<(), DomainError> {
        self.run_pass().await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryAccessList, InMemoryCache, InMemoryGoalCatalog, InMemoryUserGoalRepository,
        InMemoryUserRepository, ManualClock,
    };
    use crate::domain::foundation::{GoalId, Timestamp, Timezone};
    use crate::domain::goals::{Goal, GoalChoice, GoalType, NewGoal};
    use crate::domain::users::{FlowName, NewUser};
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
            from_list: id == 1,
        }
    }

    struct Fixture {
        clock: Arc<ManualClock>,
        cache: Arc<InMemoryCache>,
        directory: Arc<UserDirectory>,
        store: Arc<InMemoryGoalCatalog>,
        manager: Arc<GoalAssignmentManager>,
        scheduler: EngagementScheduler,
        queue: mpsc::UnboundedReceiver<Message>,
    }

    async fn setup(now: &str) -> Fixture {
        let clock = Arc::new(ManualClock::new(ts(now)));
        let cache = Arc::new(InMemoryCache::new(clock.clone()));
        let store = Arc::new(
            InMemoryGoalCatalog::new()
                .with_types(vec![category(1), category(2)])
                .await,
        );
        let catalog = Arc::new(GoalCatalog::new(store.clone(), store.clone(), cache.clone()));
        let manager = Arc::new(GoalAssignmentManager::new(
            catalog.clone(),
            Arc::new(InMemoryUserGoalRepository::new()),
        ));
        let directory = Arc::new(UserDirectory::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryAccessList::new()),
            cache.clone(),
        ));
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = EngagementScheduler::new(
            directory.clone(),
            manager.clone(),
            catalog,
            cache.clone(),
            clock.clone(),
            tx,
        );
        Fixture {
            clock,
            cache,
            directory,
            store,
            manager,
            scheduler,
            queue: rx,
        }
    }

    async fn register(directory: &UserDirectory, id: i64) -> User {
        directory
            .register(NewUser {
                id: UserId::new(id),
                first_name: "U".to_string(),
                last_name: String::new(),
                city: String::new(),
                timezone: Timezone::parse("Asia/Yekaterinburg").unwrap(),
                flow: FlowName::Menu,
            })
            .await
            .unwrap()
    }

    fn drain(queue: &mut mpsc::UnboundedReceiver<Message>) -> Vec<Message> {
        let mut out = Vec::new();
        while let Ok(msg) = queue.try_recv() {
            out.push(msg);
        }
        out
    }

    #[tokio::test]
    async fn duplicate_send_within_ttl_is_suppressed() {
        let mut f = setup("2024-03-01T07:00:00Z").await;
        let user = UserId::new(1);

        assert!(f.scheduler.send(user, NotificationCode::TaskList, "").await.unwrap());
        f.clock.advance_secs(3600);
        assert!(!f.scheduler.send(user, NotificationCode::TaskList, "").await.unwrap());
        assert_eq!(drain(&mut f.queue).len(), 1);

        f.clock.advance_secs(7 * 3600);
        assert!(f.scheduler.send(user, NotificationCode::TaskList, "").await.unwrap());
        assert_eq!(drain(&mut f.queue).len(), 1);
    }

    #[tokio::test]
    async fn different_text_is_not_deduplicated() {
        let mut f = setup("2024-03-01T07:00:00Z").await;
        let user = UserId::new(1);

        f.scheduler.send(user, NotificationCode::Disapprove, "a").await.unwrap();
        f.scheduler.send(user, NotificationCode::Disapprove, "b").await.unwrap();
        assert_eq!(drain(&mut f.queue).len(), 2);
    }

    #[tokio::test]
    async fn cache_outage_fails_send() {
        let f = setup("2024-03-01T07:00:00Z").await;
        f.cache.set_unavailable(true);

        let err = f
            .scheduler
            .send(UserId::new(1), NotificationCode::TaskList, "")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CacheError);
    }

    #[tokio::test]
    async fn morning_reminder_follows_wake_goal() {
        // 08:30 local in Yekaterinburg
        let mut f = setup("2024-03-01T03:30:00Z").await;
        let user = register(&f.directory, 1).await;
        let wake = Goal {
            id: GoalId::new(2),
            goal_type: GoalTypeId::new(1),
            description: "wake at 8".to_string(),
        };
        f.store.insert_goal(wake.clone()).await;
        f.manager
            .assign_goal(&user, GoalChoice::Existing(wake), f.clock.now())
            .await
            .unwrap();

        let codes = f.scheduler.check_user(&user).await.unwrap();
        assert_eq!(codes, vec![NotificationCode::TaskList]);
        assert_eq!(drain(&mut f.queue)[0].code, NotificationCode::TaskList);
    }

    #[tokio::test]
    async fn no_morning_reminder_without_plan() {
        // 12:30 local, default window, nothing planned
        let f = setup("2024-03-01T07:30:00Z").await;
        let user = register(&f.directory, 1).await;

        assert!(f.scheduler.check_user(&user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn evening_pass_sends_mark_and_next_day_once() {
        // 22:30 local: mark_tasks (20-22) and next_day (22-24) overlap
        let mut f = setup("2024-03-01T17:30:00Z").await;
        let user = register(&f.directory, 1).await;
        f.manager
            .assign_goal(
                &user,
                GoalChoice::New(NewGoal::new(GoalTypeId::new(2), "read").unwrap()),
                f.clock.now(),
            )
            .await
            .unwrap();

        let report = f.scheduler.run_pass().await.unwrap();
        assert_eq!(report.enqueued, 2);
        let codes: Vec<_> = drain(&mut f.queue).into_iter().map(|m| m.code).collect();
        assert_eq!(codes, vec![NotificationCode::NextDay, NotificationCode::MarkTasks]);

        let again = f.scheduler.run_pass().await.unwrap();
        assert_eq!(again.enqueued, 0);
    }

    #[tokio::test]
    async fn fully_planned_tomorrow_suppresses_nudge() {
        let mut f = setup("2024-03-01T18:30:00Z").await;
        let user = register(&f.directory, 1).await;
        let tomorrow = f.clock.now().add_days(1);
        for goal_type in [1, 2] {
            f.manager
                .assign_goal(
                    &user,
                    GoalChoice::New(NewGoal::new(GoalTypeId::new(goal_type), "x").unwrap()),
                    tomorrow,
                )
                .await
                .unwrap();
        }

        f.scheduler.run_pass().await.unwrap();
        assert!(drain(&mut f.queue).is_empty());
    }
}
