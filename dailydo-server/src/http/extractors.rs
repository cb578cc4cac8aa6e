//! Custom Axum extractors

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;

use super::error::ApiError;
use crate::models::{NewTodo, TodoPayload, ValidationError};

/// Extract a todo id from the path
///
/// Non-numeric ids are a validation error. Integers outside the `i32`
/// primary key range can never match a row, so they are reported as missing.
pub struct TodoId(pub i32);

impl<S> FromRequestParts<S> for TodoId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<i64> = Path::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiError::Validation(ValidationError::Malformed {
                    what: "id",
                    reason: rejection.body_text(),
                })
            })?;

        let id = i32::try_from(id).map_err(|_| ApiError::todo_not_found())?;
        Ok(Self(id))
    }
}

/// Extract a JSON todo body and validate it.
///
/// Runs before the handler, so invalid content never reaches a session.
pub struct ValidTodo(pub NewTodo);

impl<S> FromRequest<S> for ValidTodo
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload): Json<TodoPayload> = Json::from_request(req, state)
            .await
            .map_err(|rejection| {
                ApiError::Validation(ValidationError::Malformed {
                    what: "request body",
                    reason: rejection.body_text(),
                })
            })?;

        Ok(Self(payload.validate()?))
    }
}
