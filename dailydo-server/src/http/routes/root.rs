//! Welcome endpoint

use axum::{routing::get, Json, Router};
use serde::Serialize;

/// Plain `{"message": ...}` body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// GET /
async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to dailyDo todo app",
    })
}

/// Root routes
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/", get(root))
}
