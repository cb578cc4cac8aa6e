//! PostgreSQL gateway
//!
//! Uses sqlx PgPool with explicit connection limits and a recycle
//! threshold. Each session is one database transaction.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};

use super::{schema, DbError, Gateway, Session};
use crate::config::DatabaseConfig;
use crate::models::{NewTodo, Todo};

/// Gateway backed by a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    /// Build the pool and open a first connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the connection fails.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let gateway = PgGateway::connect(&DatabaseConfig::new(url)).await?;
    /// gateway.initialize().await?;
    /// ```
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbError> {
        let options = config.connect_options()?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .max_lifetime(config.pool_recycle)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl Gateway for PgGateway {
    async fn initialize(&self) -> Result<(), DbError> {
        schema::run(&self.pool).await
    }

    async fn acquire_session(&self) -> Result<Box<dyn Session>, DbError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgSession { tx }))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Session over one open transaction.
///
/// Dropping the transaction without committing rolls it back.
pub struct PgSession {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl Session for PgSession {
    async fn insert(&mut self, new: NewTodo) -> Result<Todo, DbError> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todo (content, is_completed)
            VALUES ($1, $2)
            RETURNING id, content, is_completed
            "#,
        )
        .bind(new.content.as_str())
        .bind(new.is_completed)
        .fetch_one(&mut *self.tx)
        .await?;

        tracing::debug!(id = todo.id, "inserted todo");
        Ok(todo)
    }

    async fn list(&mut self) -> Result<Vec<Todo>, DbError> {
        let todos = sqlx::query_as::<_, Todo>(
            "SELECT id, content, is_completed FROM todo ORDER BY id",
        )
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(todos)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Todo>, DbError> {
        let todo = sqlx::query_as::<_, Todo>(
            "SELECT id, content, is_completed FROM todo WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(todo)
    }

    async fn update(&mut self, todo: &Todo) -> Result<Todo, DbError> {
        let updated = sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todo
            SET content = $2, is_completed = $3
            WHERE id = $1
            RETURNING id, content, is_completed
            "#,
        )
        .bind(todo.id)
        .bind(&todo.content)
        .bind(todo.is_completed)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or(DbError::RowNotFound { id: todo.id })?;

        tracing::debug!(id = updated.id, "updated todo");
        Ok(updated)
    }

    async fn delete(&mut self, todo: &Todo) -> Result<(), DbError> {
        sqlx::query("DELETE FROM todo WHERE id = $1")
            .bind(todo.id)
            .execute(&mut *self.tx)
            .await?;

        tracing::debug!(id = todo.id, "deleted todo");
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DbError> {
        self.tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TodoPayload;

    // Integration tests require a real database
    // Run with: DATABASE_URL=postgres://... cargo test -p dailydo-server -- --ignored

    async fn gateway() -> PgGateway {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let gateway = PgGateway::connect(&DatabaseConfig::new(url))
            .await
            .expect("pool creation failed");
        gateway.initialize().await.expect("schema creation failed");
        gateway
    }

    fn new_todo(content: &str) -> NewTodo {
        TodoPayload {
            content: content.into(),
            is_completed: false,
        }
        .validate()
        .unwrap()
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn initialize_is_idempotent() {
        let gateway = gateway().await;
        gateway.initialize().await.expect("second initialize failed");
        gateway.initialize().await.expect("third initialize failed");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn committed_insert_is_visible() {
        let gateway = gateway().await;

        let mut session = gateway.acquire_session().await.unwrap();
        let todo = session.insert(new_todo("committed row")).await.unwrap();
        session.commit().await.unwrap();

        let mut session = gateway.acquire_session().await.unwrap();
        let fetched = session.get(todo.id).await.unwrap();
        assert_eq!(fetched, Some(todo.clone()));

        session.delete(&todo).await.unwrap();
        session.commit().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn dropped_session_rolls_back() {
        let gateway = gateway().await;

        let id = {
            let mut session = gateway.acquire_session().await.unwrap();
            session.insert(new_todo("never committed")).await.unwrap().id
        };

        let mut session = gateway.acquire_session().await.unwrap();
        assert_eq!(session.get(id).await.unwrap(), None);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn update_of_missing_row_is_row_not_found() {
        let gateway = gateway().await;

        let mut session = gateway.acquire_session().await.unwrap();
        let ghost = Todo {
            id: i32::MAX,
            content: "nobody home".into(),
            is_completed: false,
        };
        let err = session.update(&ghost).await.unwrap_err();
        assert!(matches!(err, DbError::RowNotFound { id: i32::MAX }));
    }
}
