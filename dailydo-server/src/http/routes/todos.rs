//! Todo endpoints
//!
//! Each handler acquires its own session, performs one lookup or write,
//! and commits only when it mutated something. Read-only sessions are
//! simply dropped.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use super::root::MessageResponse;
use crate::http::error::ApiError;
use crate::http::extractors::{TodoId, ValidTodo};
use crate::http::server::AppState;
use crate::models::Todo;

/// POST /todos/ - create a todo
async fn create_todo(
    State(state): State<Arc<AppState>>,
    ValidTodo(new): ValidTodo,
) -> Result<Json<Todo>, ApiError> {
    let mut session = state.gateway.acquire_session().await?;
    let todo = session.insert(new).await?;
    session.commit().await?;

    tracing::info!(id = todo.id, "todo created");
    Ok(Json(todo))
}

/// GET /todos/ - list every todo
///
/// An empty table is reported as 404, not as an empty list.
async fn list_todos(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Todo>>, ApiError> {
    let mut session = state.gateway.acquire_session().await?;
    let todos = session.list().await?;

    if todos.is_empty() {
        return Err(ApiError::no_todos());
    }
    Ok(Json(todos))
}

/// GET /todos/{id} - get a single todo
async fn get_todo(
    State(state): State<Arc<AppState>>,
    TodoId(id): TodoId,
) -> Result<Json<Todo>, ApiError> {
    let mut session = state.gateway.acquire_session().await?;
    let todo = session
        .get(id)
        .await?
        .ok_or_else(ApiError::todo_not_found)?;

    Ok(Json(todo))
}

/// PUT /todos/{id} - replace content and completion flag
async fn update_todo(
    State(state): State<Arc<AppState>>,
    TodoId(id): TodoId,
    ValidTodo(new): ValidTodo,
) -> Result<Json<Todo>, ApiError> {
    let mut session = state.gateway.acquire_session().await?;
    let mut todo = session
        .get(id)
        .await?
        .ok_or_else(ApiError::todo_not_found)?;

    new.apply_to(&mut todo);
    let todo = session.update(&todo).await?;
    session.commit().await?;

    tracing::info!(id = todo.id, "todo updated");
    Ok(Json(todo))
}

/// DELETE /todos/{id} - remove a todo
async fn delete_todo(
    State(state): State<Arc<AppState>>,
    TodoId(id): TodoId,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut session = state.gateway.acquire_session().await?;
    let todo = session
        .get(id)
        .await?
        .ok_or_else(ApiError::todo_not_found)?;

    session.delete(&todo).await?;
    session.commit().await?;

    tracing::info!(id = todo.id, "todo deleted");
    Ok(Json(MessageResponse {
        message: "Task successfully deleted",
    }))
}

/// Todo routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
}
