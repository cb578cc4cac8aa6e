//! API error types with IntoResponse
//!
//! Every error becomes `{"detail": "..."}` with a matching status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Request input rejected before touching the store (422)
    Validation(ValidationError),

    /// Lookup matched no rows (404)
    NotFound { detail: &'static str },

    /// Database error (500, logged)
    Database(DbError),
}

impl ApiError {
    pub fn todo_not_found() -> Self {
        Self::NotFound {
            detail: "Todo not found",
        }
    }

    pub fn no_todos() -> Self {
        Self::NotFound {
            detail: "No todos found",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Self::Validation(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            Self::NotFound { detail } => (StatusCode::NOT_FOUND, detail.to_owned()),
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_owned(),
                )
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            // Row vanished between lookup and write
            DbError::RowNotFound { .. } => Self::todo_not_found(),
            e => Self::Database(e),
        }
    }
}
