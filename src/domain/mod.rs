//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, timestamps, local-day windows, errors)
//! - `goals` - Goal catalog, per-day bindings and their lifecycle, evaluations
//! - `users` - Registered users and their conversation flow
//! - `dialog` - Typed menu commands and resumable dialog state
//! - `engagement` - Reminder kinds and the rules that trigger them

pub mod dialog;
pub mod engagement;
pub mod foundation;
pub mod goals;
pub mod users;
