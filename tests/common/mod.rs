//! Shared harness for the integration tests.
//!
//! Wires an [`AppContext`] over the in-memory adapters and a manual clock.
//! Every user registers without a city and lands in Asia/Yekaterinburg
//! (UTC+5), so `07:00Z` is noon local time.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use std::sync::Arc;

use goal_oracle::adapters::memory::{
    InMemoryAccessList, InMemoryCache, InMemoryEvaluationRepository, InMemoryGoalCatalog,
    InMemoryPendingRatingRepository, InMemoryUserGoalRepository, InMemoryUserRepository,
    ManualClock, RecordingTransport, ScriptedMessage, StaticTimezoneResolver,
};
use goal_oracle::application::{AppContext, AppDependencies, AppSettings};
use goal_oracle::domain::dialog::Command;
use goal_oracle::domain::foundation::{GoalId, GoalTypeId, Timestamp, Timezone, UserId};
use goal_oracle::domain::goals::{Goal, GoalType};
use goal_oracle::domain::users::User;
use goal_oracle::ports::{PeerProfile, TimezoneResolver};

pub const OWNER: UserId = UserId::new(101);
pub const RATER: UserId = UserId::new(202);
pub const STRANGER: UserId = UserId::new(999);

pub const WAKE_UP: GoalTypeId = GoalTypeId::new(1);
pub const SPORT: GoalTypeId = GoalTypeId::new(2);

pub fn ts(s: &str) -> Timestamp {
    Timestamp::from_datetime(DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc))
}

pub struct World {
    pub clock: Arc<ManualClock>,
    pub transport: Arc<RecordingTransport>,
    pub catalog: Arc<InMemoryGoalCatalog>,
    pub user_goals: Arc<InMemoryUserGoalRepository>,
    pub evaluations: Arc<InMemoryEvaluationRepository>,
    pub pending: Arc<InMemoryPendingRatingRepository>,
    pub cache: Arc<InMemoryCache>,
    pub app: AppContext,
}

/// Wake-up goals 1..=3 pick the 6-8, 8-10 and 10-12 morning windows.
pub async fn world_at(now: &str) -> World {
    build(now, None).await
}

pub async fn world_with_resolver(now: &str, resolver: StaticTimezoneResolver) -> World {
    build(now, Some(Arc::new(resolver))).await
}

async fn build(now: &str, resolver: Option<Arc<dyn TimezoneResolver>>) -> World {
    let clock = Arc::new(ManualClock::new(ts(now)));
    let catalog = Arc::new(
        InMemoryGoalCatalog::new()
            .with_types(vec![
                GoalType {
                    id: WAKE_UP,
                    name: "Wake up".to_string(),
                    points: 1,
                    evaluated: false,
                    from_list: true,
                },
                GoalType {
                    id: SPORT,
                    name: "Sport".to_string(),
                    points: 2,
                    evaluated: true,
                    from_list: false,
                },
            ])
            .await,
    );
    for (id, text) in [(1, "at 6:00"), (2, "at 8:00"), (3, "at 10:00")] {
        catalog
            .insert_goal(Goal {
                id: GoalId::new(id),
                goal_type: WAKE_UP,
                description: text.to_string(),
            })
            .await;
    }

    let access = Arc::new(InMemoryAccessList::new());
    let transport = Arc::new(RecordingTransport::new());
    for peer in [OWNER, RATER] {
        access.allow(peer).await;
        transport
            .set_profile(
                peer,
                PeerProfile {
                    first_name: format!("user{}", peer),
                    last_name: "Test".to_string(),
                    city: String::new(),
                },
            )
            .await;
    }

    let user_goals = Arc::new(InMemoryUserGoalRepository::new());
    let evaluations = Arc::new(InMemoryEvaluationRepository::new());
    let pending = Arc::new(InMemoryPendingRatingRepository::new());
    let cache = Arc::new(InMemoryCache::new(clock.clone()));

    let deps = AppDependencies {
        goal_types: catalog.clone(),
        goals: catalog.clone(),
        user_goals: user_goals.clone(),
        evaluations: evaluations.clone(),
        pending_ratings: pending.clone(),
        users: Arc::new(InMemoryUserRepository::new()),
        access,
        cache: cache.clone(),
        transport: transport.clone(),
        timezone_resolver: resolver,
        clock: clock.clone(),
    };
    let settings = AppSettings {
        default_timezone: Timezone::default(),
        ..AppSettings::default()
    };

    World {
        clock,
        transport,
        catalog,
        user_goals,
        evaluations,
        pending,
        cache,
        app: AppContext::new(deps, settings),
    }
}

impl World {
    pub async fn tap(&self, peer: UserId, command: Command) {
        self.app
            .route(&ScriptedMessage::command(peer, command))
            .await
            .unwrap();
    }

    pub async fn type_text(&self, peer: UserId, text: &str) {
        self.app
            .route(&ScriptedMessage::text(peer, text))
            .await
            .unwrap();
    }

    pub async fn register(&self, peer: UserId) -> User {
        self.tap(peer, Command::Register).await;
        self.user(peer).await
    }

    pub async fn user(&self, peer: UserId) -> User {
        self.app.directory.find(peer).await.unwrap().unwrap()
    }

    pub async fn last_text(&self, peer: UserId) -> String {
        self.transport.last_to(peer).await.unwrap().text
    }
}
