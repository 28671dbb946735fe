//! AppContext - the wired application, built once at startup.
//!
//! Every port arrives through [`AppDependencies`]; the context builds the
//! services and flows on top of them and owns the in-process queues.
//! [`AppContext::start`] spawns the background tasks and returns a
//! [`RunningApp`] handle used to stop them.

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;

use crate::domain::engagement::Message;
use crate::domain::foundation::{DomainError, ErrorCode, Timezone};
use crate::ports::{
    AccessList, Cache, Clock, EvaluationRepository, GoalRepository, GoalTypeRepository,
    InboundMessage, PendingRatingRepository, TimezoneResolver, Transport, UserGoalRepository,
    UserRepository,
};

use super::handlers::{
    ConversationError, ConversationRouter, DisapprovalNotice, DisapprovalNotifier, MenuFlow,
    NotificationDelivery, RateFlow, RegistrationFlow, TasksFlow,
};
use super::{
    spawn_consumer, spawn_periodic, DialogStore, EngagementScheduler, EngagementSettings,
    GoalAssignmentManager, GoalCatalog, LifecycleObserver, QueueConsumer, RatingQueue,
    UserDirectory,
};

/// Every external collaborator the application needs.
#[derive(Clone)]
pub struct AppDependencies {
    pub goal_types: Arc<dyn GoalTypeRepository>,
    pub goals: Arc<dyn GoalRepository>,
    pub user_goals: Arc<dyn UserGoalRepository>,
    pub evaluations: Arc<dyn EvaluationRepository>,
    pub pending_ratings: Arc<dyn PendingRatingRepository>,
    pub users: Arc<dyn UserRepository>,
    pub access: Arc<dyn AccessList>,
    pub cache: Arc<dyn Cache>,
    pub transport: Arc<dyn Transport>,
    /// `None` gives every new user the default timezone.
    pub timezone_resolver: Option<Arc<dyn TimezoneResolver>>,
    pub clock: Arc<dyn Clock>,
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub default_timezone: Timezone,
    pub lifecycle_interval: Duration,
    pub engagement: EngagementSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_timezone: Timezone::default(),
            lifecycle_interval: Duration::from_secs(3600),
            engagement: EngagementSettings::default(),
        }
    }
}

pub struct AppContext {
    pub catalog: Arc<GoalCatalog>,
    pub directory: Arc<UserDirectory>,
    pub assignments: Arc<GoalAssignmentManager>,
    pub ratings: Arc<RatingQueue>,
    pub observer: Arc<LifecycleObserver>,
    pub scheduler: Arc<EngagementScheduler>,
    pub tasks: Arc<TasksFlow>,
    pub notifier: Arc<DisapprovalNotifier>,
    pub delivery: Arc<NotificationDelivery>,
    router: ConversationRouter,
    outbox: Mutex<Option<mpsc::UnboundedReceiver<Message>>>,
    notices: Mutex<Option<mpsc::UnboundedReceiver<DisapprovalNotice>>>,
}

impl AppContext {
    pub fn new(deps: AppDependencies, settings: AppSettings) -> Self {
        let (outbox_tx, outbox_rx) = mpsc::unbounded_channel();
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();

        let catalog = Arc::new(GoalCatalog::new(
            deps.goal_types.clone(),
            deps.goals.clone(),
            deps.cache.clone(),
        ));
        let directory = Arc::new(UserDirectory::new(
            deps.users.clone(),
            deps.access.clone(),
            deps.cache.clone(),
        ));
        let assignments = Arc::new(GoalAssignmentManager::new(
            catalog.clone(),
            deps.user_goals.clone(),
        ));
        let ratings = Arc::new(RatingQueue::new(
            deps.pending_ratings.clone(),
            deps.user_goals.clone(),
            catalog.clone(),
            deps.evaluations.clone(),
            directory.clone(),
        ));
        let dialogs = Arc::new(DialogStore::new(deps.cache.clone()));

        let observer = Arc::new(
            LifecycleObserver::new(deps.user_goals.clone(), deps.clock.clone())
                .with_interval(settings.lifecycle_interval),
        );
        let scheduler = Arc::new(
            EngagementScheduler::new(
                directory.clone(),
                assignments.clone(),
                catalog.clone(),
                deps.cache.clone(),
                deps.clock.clone(),
                outbox_tx,
            )
            .with_settings(settings.engagement.clone()),
        );

        let tasks = Arc::new(TasksFlow::new(
            directory.clone(),
            assignments.clone(),
            catalog.clone(),
            dialogs,
            deps.transport.clone(),
            deps.clock.clone(),
        ));
        let registration = Arc::new(RegistrationFlow::new(
            directory.clone(),
            deps.transport.clone(),
            deps.timezone_resolver.clone(),
            settings.default_timezone,
        ));
        let menu = Arc::new(MenuFlow::new(directory.clone(), deps.transport.clone()));
        let rate = Arc::new(RateFlow::new(
            directory.clone(),
            ratings.clone(),
            deps.transport.clone(),
            notice_tx,
        ));
        let router = ConversationRouter::new(
            directory.clone(),
            registration,
            menu,
            tasks.clone(),
            rate,
        );

        let notifier = Arc::new(DisapprovalNotifier::new(
            deps.user_goals.clone(),
            catalog.clone(),
            directory.clone(),
            scheduler.clone(),
        ));
        let delivery = Arc::new(NotificationDelivery::new(
            directory.clone(),
            tasks.clone(),
            deps.transport.clone(),
            deps.clock.clone(),
        ));

        Self {
            catalog,
            directory,
            assignments,
            ratings,
            observer,
            scheduler,
            tasks,
            notifier,
            delivery,
            router,
            outbox: Mutex::new(Some(outbox_rx)),
            notices: Mutex::new(Some(notice_rx)),
        }
    }

    /// Handles one inbound turn and returns why it ended early, if it did.
    pub async fn route(&self, message: &dyn InboundMessage) -> Result<(), ConversationError> {
        self.router.route(message).await
    }

    /// Handles one inbound turn, logging instead of returning failures.
    pub async fn handle_turn(&self, message: &dyn InboundMessage) {
        match self.route(message).await {
            Ok(()) => {}
            Err(ConversationError::Malformed(reason)) => {
                tracing::warn!(user_id = %message.peer(), reason = %reason, "Malformed turn ignored");
            }
            Err(ConversationError::Upstream(e)) => {
                tracing::error!(user_id = %message.peer(), error = %e, "Turn aborted");
            }
        }
    }

    /// Processes whatever sits in the in-process queues right now.
    ///
    /// Only meaningful before [`start`](Self::start), which hands the queues
    /// to background consumers. Returns the number of items processed.
    pub async fn flush_queues(&self) -> usize {
        let mut processed = 0;
        if let Some(notices) = self.notices.lock().await.as_mut() {
            while let Ok(notice) = notices.try_recv() {
                if let Err(e) = self.notifier.consume(notice).await {
                    tracing::warn!(error = %e, "Disapproval notice failed");
                }
                processed += 1;
            }
        }
        if let Some(outbox) = self.outbox.lock().await.as_mut() {
            while let Ok(message) = outbox.try_recv() {
                if let Err(e) = self.delivery.consume(message).await {
                    tracing::warn!(error = %e, "Notification delivery failed");
                }
                processed += 1;
            }
        }
        processed
    }

    /// Spawns the lifecycle observer, the engagement scheduler and both queue
    /// consumers.
    ///
    /// # Errors
    ///
    /// - `InternalError` if the context was already started
    pub async fn start(&self) -> Result<RunningApp, DomainError> {
        let outbox = self.outbox.lock().await.take();
        let notices = self.notices.lock().await.take();
        let (Some(outbox), Some(notices)) = (outbox, notices) else {
            return Err(DomainError::new(
                ErrorCode::InternalError,
                "Application context already started",
            ));
        };

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handles = vec![
            spawn_periodic(self.observer.clone(), shutdown_rx.clone()),
            spawn_periodic(self.scheduler.clone(), shutdown_rx.clone()),
            spawn_consumer::<Message>(self.delivery.clone(), outbox, shutdown_rx.clone()),
            spawn_consumer::<DisapprovalNotice>(self.notifier.clone(), notices, shutdown_rx),
        ];
        tracing::info!(tasks = handles.len(), "Background tasks started");

        Ok(RunningApp {
            shutdown: shutdown_tx,
            handles,
        })
    }
}

/// Handle to the running background tasks.
pub struct RunningApp {
    shutdown: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl RunningApp {
    /// Signals every task and waits for all of them to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        for result in join_all(self.handles).await {
            if let Err(e) = result {
                tracing::error!(error = %e, "Background task panicked");
            }
        }
        tracing::info!("Background tasks stopped");
    }
}
