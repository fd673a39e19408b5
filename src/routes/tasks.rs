use crate::{
    auth::Session,
    db::TaskStore,
    error::AppError,
    models::{Task, TaskFilter, TaskInput, TaskQuery, TaskUpdate},
    state::AppState,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

/// A malformed id cannot name one of the caller's tasks, so it is a plain 404.
fn parse_task_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| task_not_found())
}

/// Lists the authenticated user's tasks.
///
/// ## Query Parameters:
/// - `completed` (optional): `true` or `false`; keeps only tasks with that flag.
/// - `sortBy` (optional): `<field>_<asc|desc>` where field is one of `description`,
///   `completed`, `createdAt`, `updatedAt`. Without it tasks come in creation order.
/// - `limit` (optional): maximum number of tasks to return; `0` means no limit.
/// - `skip` (optional): number of tasks to skip first.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects, possibly empty.
/// - `400 Bad Request`: A query parameter could not be parsed.
/// - `401 Unauthorized`: Missing or revoked token.
#[get("")]
pub async fn get_tasks(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    let filter = TaskFilter::try_from(query.into_inner())?;
    let tasks = state.store.list_tasks(session.user.id, &filter).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task owned by the authenticated user.
///
/// ## Request Body:
/// - `description`: required, must not be blank.
/// - `completed` (optional): defaults to `false`.
///
/// Any other field is rejected; in particular the owner cannot be chosen.
///
/// ## Responses:
/// - `201 Created`: The stored `Task`, including its generated id.
/// - `400 Bad Request`: Missing or blank description, or an unknown field.
/// - `401 Unauthorized`: Missing or revoked token.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    session: Session,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = Task::new(task_data.into_inner(), session.user.id);
    let task = state.store.insert_task(&task).await?;
    log::debug!("User {} created task {}", session.user.id, task.id);

    Ok(HttpResponse::Created().json(task))
}

/// Fetches one of the authenticated user's tasks.
///
/// ## Responses:
/// - `200 OK`: The `Task`.
/// - `404 Not Found`: No task with that id is owned by the caller.
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    session: Session,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let id = parse_task_id(&task_id)?;
    let task = state
        .store
        .find_task(id, session.user.id)
        .await?
        .ok_or_else(task_not_found)?;
    Ok(HttpResponse::Ok().json(task))
}

/// Updates `description` and/or `completed` on one of the caller's tasks.
///
/// ## Responses:
/// - `200 OK`: The updated `Task`.
/// - `400 Bad Request`: An unknown field was sent or the description is blank.
/// - `404 Not Found`: No task with that id is owned by the caller.
#[patch("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    session: Session,
    task_id: web::Path<String>,
    task_data: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let id = parse_task_id(&task_id)?;

    let task = state
        .store
        .update_task(id, session.user.id, &task_data)
        .await?
        .ok_or_else(task_not_found)?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes one of the caller's tasks and returns it as it was.
///
/// ## Responses:
/// - `200 OK`: The deleted `Task`.
/// - `404 Not Found`: No task with that id is owned by the caller.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    session: Session,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let id = parse_task_id(&task_id)?;
    let task = state
        .store
        .delete_task(id, session.user.id)
        .await?
        .ok_or_else(task_not_found)?;
    log::debug!("User {} deleted task {}", session.user.id, task.id);
    Ok(HttpResponse::Ok().json(task))
}
