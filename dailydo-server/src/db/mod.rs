//! Persistence gateway - connection pool, schema and per-request sessions
//!
//! # Design Principles
//!
//! - One gateway per process, built at startup and closed at shutdown
//! - Schema creation is idempotent and runs before the listener is bound
//! - One [`Session`] per request; never shared between requests
//! - A session that is dropped without [`Session::commit`] is rolled back

pub mod memory;
pub mod postgres;
pub mod schema;

use async_trait::async_trait;

use crate::config::ConfigError;
use crate::models::{NewTodo, Todo};

pub use memory::MemoryGateway;
pub use postgres::PgGateway;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("schema has not been initialized")]
    NotInitialized,

    #[error("todo {id} does not exist")]
    RowNotFound { id: i32 },
}

/// Process-wide owner of the store.
#[async_trait]
pub trait Gateway: Send + Sync + 'static {
    /// Create the `todo` table and its index if they do not exist yet.
    async fn initialize(&self) -> Result<(), DbError>;

    /// Hand out a fresh unit of work.
    async fn acquire_session(&self) -> Result<Box<dyn Session>, DbError>;

    /// Release the underlying connections.
    async fn close(&self);
}

/// Scoped unit of work over the `todo` table.
///
/// Reads and writes are only visible to other sessions after `commit`.
#[async_trait]
pub trait Session: Send {
    async fn insert(&mut self, new: NewTodo) -> Result<Todo, DbError>;

    /// All rows, ordered by id.
    async fn list(&mut self) -> Result<Vec<Todo>, DbError>;

    async fn get(&mut self, id: i32) -> Result<Option<Todo>, DbError>;

    /// Write back `content` and `is_completed` of a row previously read in
    /// this session.
    async fn update(&mut self, todo: &Todo) -> Result<Todo, DbError>;

    async fn delete(&mut self, todo: &Todo) -> Result<(), DbError>;

    async fn commit(self: Box<Self>) -> Result<(), DbError>;
}
