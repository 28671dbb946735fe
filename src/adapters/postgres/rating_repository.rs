//! PostgreSQL implementations of the peer rating ports.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, UserGoalId, UserId};
use crate::domain::goals::{Evaluation, PendingRating};
use crate::ports::{EvaluationRepository, PendingRatingRepository};

use super::database_error;

pub struct PostgresEvaluationRepository {
    pool: PgPool,
}

impl PostgresEvaluationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EvaluationRepository for PostgresEvaluationRepository {
    async fn create(&self, evaluation: &Evaluation) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO evaluations (rater_id, user_goal_id, approved)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(evaluation.rater.value())
        .bind(evaluation.user_goal.value())
        .bind(evaluation.approved)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("evaluations_user_goal_id_fkey") {
                    return DomainError::new(
                        ErrorCode::UserGoalNotFound,
                        format!("Binding {} not found", evaluation.user_goal),
                    );
                }
            }
            database_error("record evaluation", e)
        })?;

        Ok(())
    }

    async fn score(&self, user_goal: UserGoalId) -> Result<i64, DomainError> {
        let score: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(CASE WHEN approved THEN 1 ELSE -1 END), 0)::BIGINT
            FROM evaluations
            WHERE user_goal_id = $1
            "#,
        )
        .bind(user_goal.value())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| database_error("score binding", e))?;

        Ok(score)
    }
}

pub struct PostgresPendingRatingRepository {
    pool: PgPool,
}

impl PostgresPendingRatingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PendingRatingRow {
    rater_id: i64,
    user_goal_id: i64,
}

#[async_trait]
impl PendingRatingRepository for PostgresPendingRatingRepository {
    async fn get(&self, rater: UserId) -> Result<Option<PendingRating>, DomainError> {
        let row: Option<PendingRatingRow> = sqlx::query_as(
            "SELECT rater_id, user_goal_id FROM pending_ratings WHERE rater_id = $1",
        )
        .bind(rater.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("fetch pending rating", e))?;

        Ok(row.map(|r| PendingRating {
            rater: UserId::new(r.rater_id),
            user_goal: UserGoalId::new(r.user_goal_id),
        }))
    }

    async fn put(&self, pending: &PendingRating) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO pending_ratings (rater_id, user_goal_id)
            VALUES ($1, $2)
            ON CONFLICT (rater_id) DO UPDATE SET user_goal_id = EXCLUDED.user_goal_id
            "#,
        )
        .bind(pending.rater.value())
        .bind(pending.user_goal.value())
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("store pending rating", e))?;

        Ok(())
    }
}
