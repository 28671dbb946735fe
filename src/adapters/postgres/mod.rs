//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresGoalTypeRepository`, `PostgresGoalRepository` - Goal catalog
//! - `PostgresUserGoalRepository` - Per-day bindings
//! - `PostgresEvaluationRepository`, `PostgresPendingRatingRepository` - Peer rating
//! - `PostgresUserRepository`, `PostgresAccessList` - Users and enrollment

mod goal_catalog;
mod rating_repository;
mod user_goal_repository;
mod user_repository;

pub use goal_catalog::{PostgresGoalRepository, PostgresGoalTypeRepository};
pub use rating_repository::{PostgresEvaluationRepository, PostgresPendingRatingRepository};
pub use user_goal_repository::PostgresUserGoalRepository;
pub use user_repository::{PostgresAccessList, PostgresUserRepository};

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;
use crate::domain::foundation::{DomainError, ErrorCode};

/// Opens a connection pool sized by `config`.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DomainError> {
    PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .connect(&config.url)
        .await
        .map_err(|e| database_error("connect to database", e))
}

/// Applies the embedded migrations.
pub async fn migrate(pool: &PgPool) -> Result<(), DomainError> {
    sqlx::migrate!("./migrations").run(pool).await.map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to run migrations: {}", e),
        )
    })
}

pub(super) fn database_error(action: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("Failed to {}: {}", action, e))
}
