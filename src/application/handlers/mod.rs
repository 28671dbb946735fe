//! Conversation flows and the background consumers that talk to users.
//!
//! ## Flows
//!
//! - `RegistrationFlow` - enrollment of allow-listed peers
//! - `MenuFlow` - main menu
//! - `TasksFlow` - today's plan, status marks, planning ahead
//! - `RateFlow` - peer review of other users' goals
//!
//! `ConversationRouter` dispatches each inbound turn to the peer's flow.
//!
//! ## Consumers
//!
//! - `NotificationDelivery` - renders queued engagement messages
//! - `DisapprovalNotifier` - tells owners about disapproving votes

mod appraisal;
mod disapproval_notifier;
mod error;
mod flow;
mod menu;
mod notification_delivery;
mod registration;
pub mod render;
mod router;
mod tasks;

pub use appraisal::{DisapprovalNotice, RateFlow};
pub use disapproval_notifier::DisapprovalNotifier;
pub use error::ConversationError;
pub use flow::FlowHandler;
pub use menu::MenuFlow;
pub use notification_delivery::NotificationDelivery;
pub use registration::RegistrationFlow;
pub use router::{ConversationRouter, MAX_HOPS};
pub use tasks::{TasksFlow, PLANNING_HORIZON_DAYS};
