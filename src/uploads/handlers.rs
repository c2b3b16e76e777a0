//! HTTP handler serving stored task images
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use log::warn;
use std::sync::Arc;

use crate::shared::state::AppState;
use crate::uploads::store::{content_type_for, is_safe_name};

/// GET /uploads/:filename - serve a stored image
///
/// Names with path separators or parent-directory segments answer 404
/// before the filesystem is consulted.
pub async fn serve_image(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Response {
    if !is_safe_name(&filename) {
        warn!("Rejected upload path {:?}", filename);
        return StatusCode::NOT_FOUND.into_response();
    }

    match state.images.read(&filename).await {
        Some(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type_for(&filename))],
            bytes,
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub fn configure() -> Router<Arc<AppState>> {
    Router::new().route("/uploads/:filename", get(serve_image))
}
