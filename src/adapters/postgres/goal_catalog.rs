//! PostgreSQL implementations of the goal catalog ports.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, GoalId, GoalTypeId};
use crate::domain::goals::{Goal, GoalType, NewGoal};
use crate::ports::{GoalRepository, GoalTypeRepository};

use super::database_error;

pub struct PostgresGoalTypeRepository {
    pool: PgPool,
}

impl PostgresGoalTypeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct GoalTypeRow {
    id: i64,
    name: String,
    points: i32,
    evaluated: bool,
    from_list: bool,
}

impl From<GoalTypeRow> for GoalType {
    fn from(row: GoalTypeRow) -> Self {
        GoalType {
            id: GoalTypeId::new(row.id),
            name: row.name,
            points: row.points,
            evaluated: row.evaluated,
            from_list: row.from_list,
        }
    }
}

#[async_trait]
impl GoalTypeRepository for PostgresGoalTypeRepository {
    async fn list(&self) -> Result<Vec<GoalType>, DomainError> {
        let rows: Vec<GoalTypeRow> = sqlx::query_as(
            r#"
            SELECT id, name, points, evaluated, from_list
            FROM goal_types
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("list goal types", e))?;

        Ok(rows.into_iter().map(GoalType::from).collect())
    }

    async fn find_by_id(&self, id: GoalTypeId) -> Result<Option<GoalType>, DomainError> {
        let row: Option<GoalTypeRow> = sqlx::query_as(
            r#"
            SELECT id, name, points, evaluated, from_list
            FROM goal_types
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("fetch goal type", e))?;

        Ok(row.map(GoalType::from))
    }
}

pub struct PostgresGoalRepository {
    pool: PgPool,
}

impl PostgresGoalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct GoalRow {
    id: i64,
    goal_type_id: i64,
    description: String,
}

impl From<GoalRow> for Goal {
    fn from(row: GoalRow) -> Self {
        Goal {
            id: GoalId::new(row.id),
            goal_type: GoalTypeId::new(row.goal_type_id),
            description: row.description,
        }
    }
}

#[async_trait]
impl GoalRepository for PostgresGoalRepository {
    async fn create(&self, goal: &NewGoal) -> Result<Goal, DomainError> {
        let row: GoalRow = sqlx::query_as(
            r#"
            INSERT INTO goals (goal_type_id, description)
            VALUES ($1, $2)
            RETURNING id, goal_type_id, description
            "#,
        )
        .bind(goal.goal_type().value())
        .bind(goal.description())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("goals_goal_type_id_fkey") {
                    return DomainError::new(
                        ErrorCode::GoalTypeNotFound,
                        format!("Goal type {} not found", goal.goal_type()),
                    );
                }
            }
            database_error("create goal", e)
        })?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: GoalId) -> Result<Option<Goal>, DomainError> {
        let row: Option<GoalRow> = sqlx::query_as(
            r#"
            SELECT id, goal_type_id, description
            FROM goals
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("fetch goal", e))?;

        Ok(row.map(Goal::from))
    }

    async fn list_by_type(&self, goal_type: GoalTypeId) -> Result<Vec<Goal>, DomainError> {
        let rows: Vec<GoalRow> = sqlx::query_as(
            r#"
            SELECT id, goal_type_id, description
            FROM goals
            WHERE goal_type_id = $1
            ORDER BY id
            "#,
        )
        .bind(goal_type.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("list goals", e))?;

        Ok(rows.into_iter().map(Goal::from).collect())
    }
}
