//! Engagement module - reminder kinds, queued messages and trigger rules.

mod notification;
mod wake_window;

pub use notification::{Message, NotificationCode};
pub use wake_window::{EngagementSnapshot, WakeWindow};
