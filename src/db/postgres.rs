//! PostgreSQL-backed store built on a shared `sqlx::PgPool`.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::db::{Store, TaskStore, UserStore, DUPLICATE_EMAIL};
use crate::error::AppError;
use crate::models::{SortField, Task, TaskFilter, TaskUpdate, User, UserChanges};

const USER_COLUMNS: &str = "id, name, email, age, password_hash, created_at, updated_at";
const TASK_COLUMNS: &str = "id, description, completed, owner, created_at, updated_at";

// Applied one statement at a time; every statement is idempotent.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        age INTEGER NOT NULL DEFAULT 0,
        password_hash TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE UNIQUE INDEX IF NOT EXISTS users_email_key ON users (email)",
    "CREATE TABLE IF NOT EXISTS user_tokens (
        user_id UUID NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        token TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        PRIMARY KEY (user_id, token)
    )",
    "CREATE TABLE IF NOT EXISTS tasks (
        id UUID PRIMARY KEY,
        description TEXT NOT NULL,
        completed BOOLEAN NOT NULL DEFAULT FALSE,
        owner UUID NOT NULL REFERENCES users (id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE INDEX IF NOT EXISTS tasks_owner_idx ON tasks (owner, created_at)",
];

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

/// Turns a unique-constraint violation on `users.email` into a client error.
fn map_unique_violation(error: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.is_unique_violation() {
            return AppError::BadRequest(DUPLICATE_EMAIL.into());
        }
    }
    error.into()
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens the pool used for the whole process lifetime.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Creates tables and indexes that do not exist yet.
    pub async fn init_schema(&self) -> Result<(), AppError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        log::info!("Database schema is ready");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: &User) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.age)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_token(
        &self,
        user_id: Uuid,
        token: &str,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT u.id, u.name, u.email, u.age, u.password_hash, u.created_at, u.updated_at
             FROM users u
             JOIN user_tokens t ON t.user_id = u.id
             WHERE u.id = $1 AND t.token = $2",
        )
        .bind(user_id)
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn add_token(&self, user_id: Uuid, token: &str) -> Result<(), AppError> {
        sqlx::query("INSERT INTO user_tokens (user_id, token) VALUES ($1, $2)")
            .bind(user_id)
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn remove_token(&self, user_id: Uuid, token: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM user_tokens WHERE user_id = $1 AND token = $2")
            .bind(user_id)
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn clear_tokens(&self, user_id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM user_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_user(
        &self,
        user_id: Uuid,
        changes: &UserChanges,
    ) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET name = COALESCE($1, name),
                 email = COALESCE($2, email),
                 password_hash = COALESCE($3, password_hash),
                 age = COALESCE($4, age),
                 updated_at = NOW()
             WHERE id = $5
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(&changes.password_hash)
        .bind(changes.age)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        let mut tx = self.pool.begin().await?;
        let removed = sqlx::query("DELETE FROM tasks WHERE owner = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let user = sqlx::query_as::<_, User>(&format!(
            "DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
        tx.commit().await?;
        log::debug!("Deleted user {} and {} owned task(s)", user_id, removed);
        Ok(user)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn insert_task(&self, task: &Task) -> Result<Task, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks ({TASK_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(task.id)
        .bind(&task.description)
        .bind(task.completed)
        .bind(task.owner)
        .bind(task.created_at)
        .bind(task.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(task)
    }

    async fn list_tasks(&self, owner: Uuid, filter: &TaskFilter) -> Result<Vec<Task>, AppError> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {TASK_COLUMNS} FROM tasks WHERE owner = "));
        query.push_bind(owner);

        if let Some(completed) = filter.completed {
            query.push(" AND completed = ").push_bind(completed);
        }

        // Sort columns come from a closed enum, never from the request text.
        query.push(" ORDER BY ");
        if let Some(sort) = &filter.sort {
            query.push(sort.field.column());
            if sort.field == SortField::Description {
                query.push(" COLLATE \"C\"");
            }
            query
                .push(" ")
                .push(sort.direction.sql())
                .push(", ");
        }
        query.push("created_at ASC, id ASC");

        if let Some(limit) = filter.limit {
            query.push(" LIMIT ").push_bind(limit);
        }
        if filter.skip > 0 {
            query.push(" OFFSET ").push_bind(filter.skip);
        }

        let tasks = query
            .build_query_as::<Task>()
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn find_task(&self, id: Uuid, owner: Uuid) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND owner = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn update_task(
        &self,
        id: Uuid,
        owner: Uuid,
        update: &TaskUpdate,
    ) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks
             SET description = COALESCE($1, description),
                 completed = COALESCE($2, completed),
                 updated_at = NOW()
             WHERE id = $3 AND owner = $4
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(update.description.as_deref().map(str::trim))
        .bind(update.completed)
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn delete_task(&self, id: Uuid, owner: Uuid) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "DELETE FROM tasks WHERE id = $1 AND owner = $2 RETURNING {TASK_COLUMNS}"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
