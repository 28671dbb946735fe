//! Goals module - catalog, per-day bindings and peer evaluations.

mod binding;
mod catalog;
mod evaluation;

pub use binding::{GoalStatus, LifecycleChange, NewUserGoal, Phase, UserGoal};
pub use catalog::{Goal, GoalChoice, GoalType, NewGoal};
pub use evaluation::{Evaluation, PendingRating, Verdict};
