pub mod health;
pub mod tasks;
pub mod users;

use actix_web::web;

use crate::error::AppError;

/// Registers every route. Extraction failures on JSON bodies and query strings
/// are reported as `AppError::BadRequest` so clients always get a JSON error.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .service(health::health)
    .service(
        web::scope("/users")
            .service(users::signup)
            .service(users::login)
            .service(users::logout)
            .service(users::logout_all)
            .service(users::profile)
            .service(users::update_profile)
            .service(users::delete_account),
    )
    .service(
        web::scope("/tasks")
            .service(tasks::get_tasks)
            .service(tasks::create_task)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    );
}
