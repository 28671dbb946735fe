//! PostgreSQL implementation of UserGoalRepository.
//!
//! The unique constraint on `(user_id, goal_type_id, window_start)` rejects a
//! second binding for the same slot; the violation surfaces as `Conflict`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{
    DayWindow, DomainError, ErrorCode, GoalId, GoalTypeId, Timestamp, UserGoalId, UserId,
    ValidationError,
};
use crate::domain::goals::{GoalStatus, NewUserGoal, Phase, UserGoal};
use crate::ports::UserGoalRepository;

use super::database_error;

const UNIQUE_SLOT: &str = "user_goals_user_type_window_key";

pub struct PostgresUserGoalRepository {
    pool: PgPool,
}

impl PostgresUserGoalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserGoalRow {
    id: i64,
    user_id: i64,
    goal_id: i64,
    goal_type_id: i64,
    phase: String,
    status: String,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
}

impl TryFrom<UserGoalRow> for UserGoal {
    type Error = DomainError;

    fn try_from(row: UserGoalRow) -> Result<Self, Self::Error> {
        let corrupt = |e: ValidationError| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Corrupt user_goals row {}: {}", row.id, e),
            )
        };
        let phase: Phase = row.phase.parse().map_err(corrupt)?;
        let status: GoalStatus = row.status.parse().map_err(corrupt)?;
        let window = DayWindow::new(
            Timestamp::from_datetime(row.window_start),
            Timestamp::from_datetime(row.window_end),
        )
        .map_err(corrupt)?;

        Ok(UserGoal {
            id: UserGoalId::new(row.id),
            user_id: UserId::new(row.user_id),
            goal_id: GoalId::new(row.goal_id),
            goal_type: GoalTypeId::new(row.goal_type_id),
            phase,
            status,
            window,
        })
    }
}

fn not_found(id: UserGoalId) -> DomainError {
    DomainError::new(ErrorCode::UserGoalNotFound, format!("Binding {} not found", id))
}

#[async_trait]
impl UserGoalRepository for PostgresUserGoalRepository {
    async fn create(&self, binding: &NewUserGoal) -> Result<UserGoal, DomainError> {
        let row: UserGoalRow = sqlx::query_as(
            r#"
            INSERT INTO user_goals (
                user_id, goal_id, goal_type_id, phase, status, window_start, window_end
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, goal_id, goal_type_id, phase, status, window_start, window_end
            "#,
        )
        .bind(binding.user_id.value())
        .bind(binding.goal_id.value())
        .bind(binding.goal_type.value())
        .bind(Phase::Planning.as_str())
        .bind(GoalStatus::Soon.as_str())
        .bind(*binding.window.from().as_datetime())
        .bind(*binding.window.to().as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some(UNIQUE_SLOT) {
                    return DomainError::new(
                        ErrorCode::Conflict,
                        "A binding for this user, goal type and day already exists",
                    );
                }
            }
            database_error("create binding", e)
        })?;

        row.try_into()
    }

    async fn find_by_id(&self, id: UserGoalId) -> Result<Option<UserGoal>, DomainError> {
        let row: Option<UserGoalRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, goal_id, goal_type_id, phase, status, window_start, window_end
            FROM user_goals
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("fetch binding", e))?;

        row.map(UserGoal::try_from).transpose()
    }

    async fn list_by_window_start(
        &self,
        user: UserId,
        from: Timestamp,
    ) -> Result<Vec<UserGoal>, DomainError> {
        let rows: Vec<UserGoalRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, goal_id, goal_type_id, phase, status, window_start, window_end
            FROM user_goals
            WHERE user_id = $1 AND window_start = $2
            ORDER BY goal_type_id
            "#,
        )
        .bind(user.value())
        .bind(*from.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("list bindings", e))?;

        rows.into_iter().map(UserGoal::try_from).collect()
    }

    async fn list_by_phase(&self, phase: Phase) -> Result<Vec<UserGoal>, DomainError> {
        let rows: Vec<UserGoalRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, goal_id, goal_type_id, phase, status, window_start, window_end
            FROM user_goals
            WHERE phase = $1
            ORDER BY id
            "#,
        )
        .bind(phase.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("list bindings by phase", e))?;

        rows.into_iter().map(UserGoal::try_from).collect()
    }

    async fn update_goal(&self, id: UserGoalId, goal: GoalId) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE user_goals SET goal_id = $2 WHERE id = $1")
            .bind(id.value())
            .bind(goal.value())
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("update binding goal", e))?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn update_lifecycle(
        &self,
        id: UserGoalId,
        phase: Phase,
        status: GoalStatus,
    ) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE user_goals SET phase = $2, status = $3 WHERE id = $1")
            .bind(id.value())
            .bind(phase.as_str())
            .bind(status.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("update binding lifecycle", e))?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn update_status(&self, id: UserGoalId, status: GoalStatus) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE user_goals SET status = $2 WHERE id = $1")
            .bind(id.value())
            .bind(status.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("update binding status", e))?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn delete(&self, id: UserGoalId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM user_goals WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("delete binding", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(phase: &str, status: &str) -> UserGoalRow {
        UserGoalRow {
            id: 7,
            user_id: 1,
            goal_id: 2,
            goal_type_id: 3,
            phase: phase.to_string(),
            status: status.to_string(),
            window_start: Utc.with_ymd_and_hms(2024, 3, 1, 1, 0, 0).unwrap(),
            window_end: Utc.with_ymd_and_hms(2024, 3, 2, 0, 59, 59).unwrap(),
        }
    }

    #[test]
    fn row_maps_to_binding() {
        let binding = UserGoal::try_from(row("active", "in_progress")).unwrap();

        assert_eq!(binding.id, UserGoalId::new(7));
        assert_eq!(binding.goal_type, GoalTypeId::new(3));
        assert_eq!(binding.phase, Phase::Active);
        assert_eq!(binding.status, GoalStatus::InProgress);
        assert_eq!(binding.to().as_unix_secs() - binding.from().as_unix_secs(), 86_399);
    }

    #[test]
    fn unknown_status_is_a_database_error() {
        let err = UserGoal::try_from(row("active", "paused")).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.message.contains("user_goals row 7"));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let mut bad = row("planning", "soon");
        std::mem::swap(&mut bad.window_start, &mut bad.window_end);
        assert!(UserGoal::try_from(bad).is_err());
    }
}
