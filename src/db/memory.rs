//! In-process store used by the test suite and for running without PostgreSQL.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::{Store, TaskStore, UserStore, DUPLICATE_EMAIL};
use crate::error::AppError;
use crate::models::{Task, TaskFilter, TaskUpdate, User, UserChanges};

struct UserRecord {
    user: User,
    tokens: Vec<String>,
}

#[derive(Default)]
struct State {
    users: Vec<UserRecord>,
    // Kept in insertion order, which is the default listing order.
    tasks: Vec<Task>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tasks across all owners.
    pub async fn task_count(&self) -> usize {
        self.state.read().await.tasks.len()
    }
}

impl State {
    fn record_mut(&mut self, user_id: Uuid) -> Option<&mut UserRecord> {
        self.users.iter_mut().find(|record| record.user.id == user_id)
    }

    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.users
            .iter()
            .any(|record| record.user.email == email && Some(record.user.id) != except)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<User, AppError> {
        let mut state = self.state.write().await;
        if state.email_taken(&user.email, None) {
            return Err(AppError::BadRequest(DUPLICATE_EMAIL.into()));
        }
        state.users.push(UserRecord {
            user: user.clone(),
            tokens: Vec::new(),
        });
        Ok(user.clone())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .find(|record| record.user.email == email)
            .map(|record| record.user.clone()))
    }

    async fn find_user_by_token(
        &self,
        user_id: Uuid,
        token: &str,
    ) -> Result<Option<User>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .find(|record| record.user.id == user_id && record.tokens.iter().any(|t| t == token))
            .map(|record| record.user.clone()))
    }

    async fn add_token(&self, user_id: Uuid, token: &str) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        let record = state
            .record_mut(user_id)
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        record.tokens.push(token.to_string());
        Ok(())
    }

    async fn remove_token(&self, user_id: Uuid, token: &str) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        if let Some(record) = state.record_mut(user_id) {
            record.tokens.retain(|t| t != token);
        }
        Ok(())
    }

    async fn clear_tokens(&self, user_id: Uuid) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        if let Some(record) = state.record_mut(user_id) {
            record.tokens.clear();
        }
        Ok(())
    }

    async fn update_user(
        &self,
        user_id: Uuid,
        changes: &UserChanges,
    ) -> Result<Option<User>, AppError> {
        let mut state = self.state.write().await;
        if let Some(email) = &changes.email {
            if state.email_taken(email, Some(user_id)) {
                return Err(AppError::BadRequest(DUPLICATE_EMAIL.into()));
            }
        }
        Ok(state.record_mut(user_id).map(|record| {
            record.user.apply(changes);
            record.user.clone()
        }))
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        let mut state = self.state.write().await;
        let Some(position) = state.users.iter().position(|r| r.user.id == user_id) else {
            return Ok(None);
        };
        let record = state.users.remove(position);
        state.tasks.retain(|task| task.owner != user_id);
        Ok(Some(record.user))
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert_task(&self, task: &Task) -> Result<Task, AppError> {
        let mut state = self.state.write().await;
        state.tasks.push(task.clone());
        Ok(task.clone())
    }

    async fn list_tasks(&self, owner: Uuid, filter: &TaskFilter) -> Result<Vec<Task>, AppError> {
        let state = self.state.read().await;
        let mut tasks: Vec<Task> = state
            .tasks
            .iter()
            .filter(|task| task.owner == owner)
            .filter(|task| filter.completed.map_or(true, |c| task.completed == c))
            .cloned()
            .collect();
        if let Some(sort) = &filter.sort {
            tasks.sort_by(|a, b| sort.compare(a, b));
        }
        let skip = usize::try_from(filter.skip).unwrap_or(usize::MAX);
        let limit = filter
            .limit
            .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(tasks.into_iter().skip(skip).take(limit).collect())
    }

    async fn find_task(&self, id: Uuid, owner: Uuid) -> Result<Option<Task>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .tasks
            .iter()
            .find(|task| task.id == id && task.owner == owner)
            .cloned())
    }

    async fn update_task(
        &self,
        id: Uuid,
        owner: Uuid,
        update: &TaskUpdate,
    ) -> Result<Option<Task>, AppError> {
        let mut state = self.state.write().await;
        Ok(state
            .tasks
            .iter_mut()
            .find(|task| task.id == id && task.owner == owner)
            .map(|task| {
                task.apply(update);
                task.clone()
            }))
    }

    async fn delete_task(&self, id: Uuid, owner: Uuid) -> Result<Option<Task>, AppError> {
        let mut state = self.state.write().await;
        let position = state
            .tasks
            .iter()
            .position(|task| task.id == id && task.owner == owner);
        Ok(position.map(|index| state.tasks.remove(index)))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
