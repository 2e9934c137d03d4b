//! Common routes: welcome, health, readiness, version.

use crate::error::AppError;
use crate::response::Message;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

#[derive(Serialize)]
struct ReadyBody {
    status: &'static str,
    database: &'static str,
}

async fn root(State(state): State<AppState>) -> Json<Message> {
    Json(Message {
        message: format!("Welcome to the {}!", state.service.title),
    })
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn ready(State(state): State<AppState>) -> Result<Json<ReadyBody>, AppError> {
    let mut session = state
        .sessions
        .open()
        .await
        .map_err(|e| AppError::Unavailable(format!("database: {}", e)))?;
    sqlx::query("SELECT 1")
        .execute(&mut *session)
        .await
        .map_err(|e| AppError::Unavailable(format!("database: {}", e)))?;
    Ok(Json(ReadyBody {
        status: "ok",
        database: "ok",
    }))
}

async fn version(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "service": state.service.title,
        "description": state.service.description,
    }))
}

/// GET /, /health, /ready, /version, /info.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .route("/info", get(version))
        .with_state(state)
}
