//! Welcome and health endpoints

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::state::AppState;

/// Root endpoint, answers with a welcome message.
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({ "message": format!("Welcome to {}", state.config.app_name) }))
}

/// Health endpoint polled by the service registry and container orchestration.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({ "status": "UP", "service": state.config.app_name }))
}
