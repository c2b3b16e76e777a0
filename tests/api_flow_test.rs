//! End-to-end flows through the assembled router.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

use taskserver::config::{AppConfig, ServerConfig, UploadConfig};
use taskserver::server::build_router;
use taskserver::shared::state::AppState;
use taskserver::uploads::store::MAX_UPLOAD_BYTES;

const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

fn test_state(max_bytes: usize) -> (Arc<AppState>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        uploads: UploadConfig {
            dir: dir.path().to_path_buf(),
            max_bytes,
        },
    };
    (Arc::new(AppState::new(config)), dir)
}

fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn post_task(uri: &str, fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(fields, file)))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_reports_counts() {
    let (state, _dir) = test_state(MAX_UPLOAD_BYTES);
    let app = build_router(state);

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["todos_count"], 0);
    assert_eq!(json["completed_count"], 0);
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn create_toggle_delete_flow() {
    let (state, _dir) = test_state(MAX_UPLOAD_BYTES);
    let app = build_router(state.clone());

    let response = app
        .clone()
        .oneshot(post_task(
            "/",
            &[
                ("todo", "Buy milk"),
                ("priority", "high"),
                ("category", "errands"),
            ],
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let stats = state.tasks.stats().await;
    assert_eq!(stats.total, 1);
    assert_eq!(stats.high_priority, 1);

    let response = app.clone().oneshot(get("/toggle/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let stats = state.tasks.stats().await;
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.pending, 0);

    let response = app.clone().oneshot(get("/delete/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(state.tasks.stats().await.total, 0);
}

#[tokio::test]
async fn empty_text_does_not_create_a_task() {
    let (state, _dir) = test_state(MAX_UPLOAD_BYTES);
    let app = build_router(state.clone());

    let response = app
        .oneshot(post_task("/", &[("todo", "   ")], None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.contains("notice="));
    assert_eq!(state.tasks.stats().await.total, 0);
}

#[tokio::test]
async fn disallowed_extension_still_creates_the_task() {
    let (state, dir) = test_state(MAX_UPLOAD_BYTES);
    let app = build_router(state.clone());

    let response = app
        .oneshot(post_task(
            "/",
            &[("todo", "attach plain text")],
            Some(("notes.txt", b"hello")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let task = state.tasks.get(1).await.unwrap();
    assert_eq!(task.text, "attach plain text");
    assert_eq!(task.image, None);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn uploaded_image_is_stored_and_served() {
    let (state, dir) = test_state(MAX_UPLOAD_BYTES);
    let app = build_router(state.clone());

    let response = app
        .clone()
        .oneshot(post_task(
            "/",
            &[("todo", "with picture")],
            Some(("cat.png", b"png-bytes")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let image = state.tasks.get(1).await.unwrap().image.unwrap();
    assert!(dir.path().join(&image).exists());

    let response = app
        .oneshot(get(&format!("/uploads/{image}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE].to_str().unwrap(),
        "image/png"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"png-bytes");
}

#[tokio::test]
async fn clear_removes_tasks_and_their_files() {
    let (state, dir) = test_state(MAX_UPLOAD_BYTES);
    let app = build_router(state.clone());

    for (text, file) in [("one", "a.png"), ("two", "b.jpg")] {
        let response = app
            .clone()
            .oneshot(post_task("/", &[("todo", text)], Some((file, b"bytes"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);

    let response = app.oneshot(get("/clear")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(state.tasks.stats().await.total, 0);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn traversal_names_never_serve_files() {
    let (state, _dir) = test_state(MAX_UPLOAD_BYTES);
    let app = build_router(state);

    for uri in [
        "/uploads/../../etc/passwd",
        "/uploads/..%2F..%2Fetc%2Fpasswd",
        "/uploads/.hidden",
    ] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "uri {uri}");
    }
}

#[tokio::test]
async fn oversized_upload_is_rejected_with_a_notice() {
    let (state, dir) = test_state(1024);
    let app = build_router(state.clone());

    let big = vec![0u8; 4 * 1024];
    let response = app
        .oneshot(post_task(
            "/",
            &[("todo", "too big")],
            Some(("huge.png", &big)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.contains("notice="));
    assert_eq!(state.tasks.stats().await.total, 0);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn edit_updates_fields() {
    let (state, _dir) = test_state(MAX_UPLOAD_BYTES);
    let app = build_router(state.clone());

    let response = app
        .clone()
        .oneshot(post_task("/", &[("todo", "draft")], None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app
        .clone()
        .oneshot(post_task(
            "/edit/1",
            &[
                ("todo", "polished"),
                ("priority", "high"),
                ("category", "writing"),
            ],
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let task = state.tasks.get(1).await.unwrap();
    assert_eq!(task.text, "polished");
    assert_eq!(task.category, "writing");
    assert!(task.updated_at.is_some());

    // Editing a missing id redirects with an error notice.
    let response = app
        .oneshot(post_task("/edit/42", &[("todo", "ghost")], None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.contains("notice="));
}
