//! Liveness and store reachability

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
}

/// GET /health
///
/// Opens and immediately drops a session, so a 200 means the store can hand
/// out a unit of work right now.
async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let version = env!("CARGO_PKG_VERSION");

    match state.gateway.acquire_session().await {
        Ok(_session) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                version,
                database: "ok",
            }),
        ),
        Err(err) => {
            tracing::warn!(error = %err, "health check could not acquire a session");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded",
                    version,
                    database: "unavailable",
                }),
            )
        }
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}
