//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, time arithmetic and error types
//! that form the vocabulary of the goal tracking domain.

mod errors;
mod ids;
mod local_day;
mod state_machine;
mod timestamp;
mod timezone;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{GoalId, GoalTypeId, UserGoalId, UserId};
pub use local_day::{local_date_of, DayWindow, DAY_START_HOUR};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
pub use timezone::Timezone;
