//! PostgreSQL implementations of the user registry and access list.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{
    DomainError, ErrorCode, Timestamp, Timezone, UserId, ValidationError,
};
use crate::domain::users::{FlowName, NewUser, User};
use crate::ports::{AccessList, UserRepository};

use super::database_error;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    first_name: String,
    last_name: String,
    city: String,
    timezone: String,
    active: bool,
    flow: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let corrupt = |e: ValidationError| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Corrupt users row {}: {}", row.id, e),
            )
        };
        let timezone = Timezone::parse(&row.timezone).map_err(corrupt)?;
        let flow: FlowName = row.flow.parse().map_err(corrupt)?;

        Ok(User {
            id: UserId::new(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            city: row.city,
            timezone,
            active: row.active,
            flow,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, DomainError> {
        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users (id, first_name, last_name, city, timezone, flow)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, first_name, last_name, city, timezone, active, flow, created_at
            "#,
        )
        .bind(user.id.value())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.city)
        .bind(user.timezone.name())
        .bind(user.flow.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("users_pkey") {
                    return DomainError::new(
                        ErrorCode::Conflict,
                        format!("User {} is already registered", user.id),
                    );
                }
            }
            database_error("create user", e)
        })?;

        row.try_into()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, first_name, last_name, city, timezone, active, flow, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("fetch user", e))?;

        row.map(User::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let rows: Vec<UserRow> = sqlx::query_as(
            r#"
            SELECT id, first_name, last_name, city, timezone, active, flow, created_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("list users", e))?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn update_flow(&self, id: UserId, flow: FlowName) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE users SET flow = $2 WHERE id = $1")
            .bind(id.value())
            .bind(flow.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("update user flow", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::UserNotFound,
                format!("User {} not found", id),
            ));
        }
        Ok(())
    }
}

/// Enrollment gate backed by the `access_list` table.
pub struct PostgresAccessList {
    pool: PgPool,
}

impl PostgresAccessList {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessList for PostgresAccessList {
    async fn contains(&self, id: UserId) -> Result<bool, DomainError> {
        let found: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM access_list WHERE user_id = $1)")
                .bind(id.value())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| database_error("check access list", e))?;

        Ok(found)
    }
}
