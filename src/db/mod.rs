//! Storage abstraction for users, their session tokens, and tasks.
//!
//! Every task query takes the requesting user's id as `owner`, so a handler
//! cannot reach another user's task by forgetting a filter.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Task, TaskFilter, TaskUpdate, User, UserChanges};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Message used when an insert or update collides with an existing e-mail.
pub const DUPLICATE_EMAIL: &str = "Email already registered";

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a new user. Fails with `BadRequest` when the e-mail is taken.
    async fn insert_user(&self, user: &User) -> Result<User, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Returns the user only if `token` is currently in its token list.
    async fn find_user_by_token(&self, user_id: Uuid, token: &str)
        -> Result<Option<User>, AppError>;

    async fn add_token(&self, user_id: Uuid, token: &str) -> Result<(), AppError>;

    /// Removes exactly one token. Removing an absent token is not an error.
    async fn remove_token(&self, user_id: Uuid, token: &str) -> Result<(), AppError>;

    async fn clear_tokens(&self, user_id: Uuid) -> Result<(), AppError>;

    async fn update_user(
        &self,
        user_id: Uuid,
        changes: &UserChanges,
    ) -> Result<Option<User>, AppError>;

    /// Deletes the user, its tokens and every task it owns.
    async fn delete_user(&self, user_id: Uuid) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert_task(&self, task: &Task) -> Result<Task, AppError>;

    async fn list_tasks(&self, owner: Uuid, filter: &TaskFilter) -> Result<Vec<Task>, AppError>;

    async fn find_task(&self, id: Uuid, owner: Uuid) -> Result<Option<Task>, AppError>;

    async fn update_task(
        &self,
        id: Uuid,
        owner: Uuid,
        update: &TaskUpdate,
    ) -> Result<Option<Task>, AppError>;

    /// Removes the task and returns its last state.
    async fn delete_task(&self, id: Uuid, owner: Uuid) -> Result<Option<Task>, AppError>;
}

/// Everything the HTTP layer needs from a backend.
#[async_trait]
pub trait Store: UserStore + TaskStore {
    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
