//! In-process gateway for tests and local runs without PostgreSQL
//!
//! A session takes exclusive ownership of the table for its lifetime and
//! works on a private copy. `commit` swaps the copy in; dropping the session
//! discards it.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{DbError, Gateway, Session};
use crate::models::{NewTodo, Todo};

#[derive(Debug, Clone, Default)]
struct Table {
    rows: BTreeMap<i32, Todo>,
    last_id: i32,
}

/// Gateway keeping the `todo` table in memory
#[derive(Clone, Default)]
pub struct MemoryGateway {
    // None until initialize() creates the table
    table: Arc<Mutex<Option<Table>>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn initialize(&self) -> Result<(), DbError> {
        let mut table = self.table.lock().await;
        if table.is_none() {
            *table = Some(Table::default());
            tracing::info!("In-memory todo table created");
        }
        Ok(())
    }

    async fn acquire_session(&self) -> Result<Box<dyn Session>, DbError> {
        let guard = Arc::clone(&self.table).lock_owned().await;
        let staged = (*guard).clone().ok_or(DbError::NotInitialized)?;
        Ok(Box::new(MemorySession { guard, staged }))
    }

    async fn close(&self) {}
}

pub struct MemorySession {
    guard: OwnedMutexGuard<Option<Table>>,
    staged: Table,
}

#[async_trait]
impl Session for MemorySession {
    async fn insert(&mut self, new: NewTodo) -> Result<Todo, DbError> {
        self.staged.last_id += 1;
        let todo = Todo {
            id: self.staged.last_id,
            content: new.content.into_string(),
            is_completed: new.is_completed,
        };
        self.staged.rows.insert(todo.id, todo.clone());

        tracing::debug!(id = todo.id, "inserted todo");
        Ok(todo)
    }

    async fn list(&mut self) -> Result<Vec<Todo>, DbError> {
        Ok(self.staged.rows.values().cloned().collect())
    }

    async fn get(&mut self, id: i32) -> Result<Option<Todo>, DbError> {
        Ok(self.staged.rows.get(&id).cloned())
    }

    async fn update(&mut self, todo: &Todo) -> Result<Todo, DbError> {
        let row = self
            .staged
            .rows
            .get_mut(&todo.id)
            .ok_or(DbError::RowNotFound { id: todo.id })?;
        row.content.clone_from(&todo.content);
        row.is_completed = todo.is_completed;

        tracing::debug!(id = todo.id, "updated todo");
        Ok(row.clone())
    }

    async fn delete(&mut self, todo: &Todo) -> Result<(), DbError> {
        self.staged.rows.remove(&todo.id);

        tracing::debug!(id = todo.id, "deleted todo");
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DbError> {
        let MemorySession { mut guard, staged } = *self;
        *guard = Some(staged);
        Ok(())
    }
}
