//! Application layer - services, periodic tasks and conversation flows.
//!
//! Services orchestrate the domain over the ports. Periodic tasks expose a
//! single iteration so tests can drive them without timers. `AppContext`
//! wires everything together.

mod consumer;
mod context;
mod dialog_state_machine;
mod engagement_scheduler;
mod goal_assignment;
mod goal_catalog;
pub mod handlers;
mod lifecycle_observer;
mod periodic;
mod rating_queue;
mod read_through;
mod user_directory;

pub use consumer::{spawn_consumer, QueueConsumer};
pub use context::{AppContext, AppDependencies, AppSettings, RunningApp};
pub use dialog_state_machine::DialogStore;
pub use engagement_scheduler::{EngagementScheduler, EngagementSettings, PassReport};
pub use goal_assignment::{GoalAssignmentManager, PlannedGoal};
pub use goal_catalog::{GoalCatalog, GOAL_TYPE_LIST_KEY};
pub use handlers::{ConversationError, DisapprovalNotice};
pub use lifecycle_observer::{LifecycleObserver, SweepReport};
pub use periodic::{spawn_periodic, PeriodicTask};
pub use rating_queue::{RatingQueue, Review};
pub use user_directory::UserDirectory;
