#![doc = "The `taskmanager` library crate."]
#![doc = ""]
#![doc = "Domain models, the storage seam with its PostgreSQL and in-memory backends,"]
#![doc = "bearer-token authentication, routing and error handling for the task manager API."]
#![doc = "The binary (`main.rs`) wires these together into an `HttpServer`."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;

pub use crate::error::AppError;
pub use crate::state::AppState;
