//! Shared fixtures for the integration tests.
//!
//! Every test seeds a fresh `MemoryStore` with two users and three tasks:
//! "Mike" owns "First Task" (open) and "Second Task" (completed), "Sins" owns
//! "Three Task" (open). Each user has one live session token.

#![allow(dead_code)]

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::test;
use serde_json::Value;
use taskmanager::auth::TokenKeys;
use taskmanager::db::{MemoryStore, TaskStore, UserStore};
use taskmanager::models::{Task, TaskInput, User, UserInput};
use taskmanager::AppState;

pub const JWT_SECRET: &str = "integration-test-secret";

/// Builds the application the way `main` does, minus CORS, on top of `$state`.
macro_rules! init_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state))
                .wrap(taskmanager::auth::AuthMiddleware)
                .wrap(actix_web::middleware::Logger::default())
                .configure(taskmanager::routes::config),
        )
        .await
    };
}

pub struct SeededUser {
    pub user: User,
    pub password: &'static str,
    pub token: String,
}

impl SeededUser {
    pub fn bearer(&self) -> (header::HeaderName, String) {
        bearer(&self.token)
    }
}

pub struct Fixture {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub user_one: SeededUser,
    pub user_two: SeededUser,
    pub task_one: Task,
    pub task_two: Task,
    pub task_three: Task,
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

async fn seed_user(
    store: &MemoryStore,
    keys: &TokenKeys,
    name: &str,
    email: &str,
    password: &'static str,
) -> SeededUser {
    // Low cost keeps the suite fast; verification reads the cost from the hash.
    let password_hash = bcrypt::hash(password, 4).unwrap();
    let user = User::new(
        UserInput {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            age: None,
        },
        password_hash,
    );
    let user = store.insert_user(&user).await.unwrap();
    let token = keys.generate_token(user.id).unwrap();
    store.add_token(user.id, &token).await.unwrap();
    SeededUser {
        user,
        password,
        token,
    }
}

async fn seed_task(store: &MemoryStore, description: &str, completed: bool, owner: &User) -> Task {
    let task = Task::new(
        TaskInput {
            description: description.into(),
            completed,
        },
        owner.id,
    );
    store.insert_task(&task).await.unwrap()
}

pub async fn setup_database() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let keys = TokenKeys::new(JWT_SECRET);

    let user_one = seed_user(&store, &keys, "Mike", "mike@example.com", "mikepass").await;
    let user_two = seed_user(&store, &keys, "Sins", "sins@example.com", "sinspass").await;

    let task_one = seed_task(&store, "First Task", false, &user_one.user).await;
    let task_two = seed_task(&store, "Second Task", true, &user_one.user).await;
    let task_three = seed_task(&store, "Three Task", false, &user_two.user).await;

    Fixture {
        state: AppState::new(store.clone(), keys),
        store,
        user_one,
        user_two,
        task_one,
        task_two,
        task_three,
    }
}

/// Sends `req` and returns the status with the body parsed as JSON
/// (`Value::Null` for an empty body).
pub async fn send<S, B>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    if body.is_empty() {
        return (status, Value::Null);
    }
    let json = serde_json::from_slice(&body).unwrap_or_else(|e| {
        panic!(
            "Response body is not JSON ({}): {}",
            e,
            String::from_utf8_lossy(&body)
        )
    });
    (status, json)
}

/// The ids in a JSON array of tasks, in response order.
pub fn ids(tasks: &Value) -> Vec<String> {
    tasks
        .as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|task| task["id"].as_str().unwrap().to_string())
        .collect()
}
