//! dailydo-server: todo CRUD over HTTP
//!
//! Exposes create/list/get/update/delete endpoints for `Todo` items.
//! Every request works against its own unit of work handed out by a
//! [`db::Gateway`].

pub mod config;
pub mod db;
pub mod http;
pub mod models;

pub use config::{ConfigError, DatabaseConfig};
pub use db::{DbError, Gateway, MemoryGateway, PgGateway, Session};
pub use http::{build_router, run_server, ApiError, AppState, ServerConfig, ServerError};
pub use models::{NewTodo, Todo, TodoContent, TodoPayload, ValidationError};
