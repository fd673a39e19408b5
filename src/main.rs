use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use taskmanager::auth::{AuthMiddleware, TokenKeys};
use taskmanager::config::Config;
use taskmanager::db::PgStore;
use taskmanager::{routes, AppState};

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env()?;

    let store = PgStore::connect(&config.database_url, config.database_max_connections)
        .await
        .map_err(|e| startup_error("Failed to connect to database", e))?;
    store
        .init_schema()
        .await
        .map_err(|e| startup_error("Failed to prepare database schema", e))?;

    let state = web::Data::new(AppState::new(
        Arc::new(store),
        TokenKeys::new(&config.jwt_secret),
    ));

    log::info!("Starting task manager at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(AuthMiddleware)
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
