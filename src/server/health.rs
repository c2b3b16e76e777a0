//! Health check handler

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use std::sync::Arc;

use crate::shared::state::AppState;

pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<serde_json::Value>) {
    let (todos_count, completed_count) = state.tasks.counts().await;

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "healthy",
            "todos_count": todos_count,
            "completed_count": completed_count,
            "timestamp": Utc::now().to_rfc3339()
        })),
    )
}
