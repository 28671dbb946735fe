//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `GoalTypeRepository`, `GoalRepository` - Goal catalog
//! - `UserGoalRepository` - Per-day goal bindings
//! - `EvaluationRepository`, `PendingRatingRepository` - Peer rating
//! - `UserRepository`, `AccessList` - User registry and enrollment gate
//!
//! ## Infrastructure Ports
//!
//! - `Cache` - Read-through cache and short-lived marker ledger
//! - `Clock` - Injectable time source
//! - `TimezoneResolver` - Place name to IANA timezone
//! - `Transport`, `InboundMessage` - Chat platform

mod cache;
mod clock;
mod goal_catalog_repository;
mod rating_repository;
mod timezone_resolver;
mod transport;
mod user_goal_repository;
mod user_repository;

pub use cache::Cache;
pub use clock::{Clock, SystemClock};
pub use goal_catalog_repository::{GoalRepository, GoalTypeRepository};
pub use rating_repository::{EvaluationRepository, PendingRatingRepository};
pub use timezone_resolver::TimezoneResolver;
pub use transport::{InboundMessage, PeerProfile, Transport};
pub use user_goal_repository::UserGoalRepository;
pub use user_repository::{AccessList, UserRepository};
