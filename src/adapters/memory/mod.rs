//! In-memory adapters for tests and local runs.
//!
//! Every port has an implementation here so the application layer can be
//! exercised without PostgreSQL, Redis or the chat platform.

mod cache;
mod catalog;
mod clock;
mod geo;
mod ratings;
mod transport;
mod user_goals;
mod users;

pub use cache::InMemoryCache;
pub use catalog::InMemoryGoalCatalog;
pub use clock::ManualClock;
pub use geo::StaticTimezoneResolver;
pub use ratings::{InMemoryEvaluationRepository, InMemoryPendingRatingRepository};
pub use transport::{RecordingTransport, ScriptedMessage, SentMessage};
pub use user_goals::InMemoryUserGoalRepository;
pub use users::{InMemoryAccessList, InMemoryUserRepository};
