//! HTTP handlers for the task pages
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, Redirect};
use axum::routing::get;
use axum::Router;
use log::{error, info, warn};
use serde::Deserialize;
use std::sync::Arc;

use crate::shared::state::AppState;
use crate::tasks::html_renderers;
use crate::tasks::types::{NewTask, StatusFilter, TaskFilters, TaskPriority, TaskUpdate};

/// Query parameters of the index page: the three filter predicates plus the
/// transient notice carried across a redirect.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub priority: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub notice: Option<String>,
    pub kind: Option<String>,
}

#[derive(Debug, Default)]
struct TaskForm {
    text: Option<String>,
    priority: Option<TaskPriority>,
    category: Option<String>,
    image: Option<(String, Vec<u8>)>,
}

pub(crate) enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Redirect back to the index carrying a one-shot feedback banner.
fn notice_redirect(message: &str, kind: NoticeKind) -> Redirect {
    Redirect::to(&format!(
        "/?notice={}&kind={}",
        urlencoding::encode(message),
        kind.as_str()
    ))
}

fn multipart_failure(err: MultipartError) -> Redirect {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!("Rejected oversized upload: {}", err);
        notice_redirect("File is too large! Maximum size is 5 MB.", NoticeKind::Error)
    } else {
        warn!("Failed to read multipart form: {}", err);
        notice_redirect("Could not read the submitted form.", NoticeKind::Error)
    }
}

async fn read_task_form(mut multipart: Multipart) -> Result<TaskForm, MultipartError> {
    let mut form = TaskForm::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "todo" => form.text = Some(field.text().await?),
            "priority" => form.priority = TaskPriority::parse(field.text().await?.trim()),
            "category" => {
                let value = field.text().await?;
                let value = value.trim();
                if !value.is_empty() {
                    form.category = Some(value.to_string());
                }
            }
            "image" => {
                // Browsers submit an empty part when no file was chosen.
                let name = field.file_name().map(ToOwned::to_owned).unwrap_or_default();
                let bytes = field.bytes().await?;
                if !name.is_empty() && !bytes.is_empty() {
                    form.image = Some((name, bytes.to_vec()));
                }
            }
            _ => {}
        }
    }
    Ok(form)
}

/// GET / - task list honoring priority/category/status filters
pub async fn handle_index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Html<String> {
    let filters = TaskFilters {
        priority: query
            .priority
            .as_deref()
            .filter(|p| *p != "all")
            .and_then(TaskPriority::parse),
        category: query
            .category
            .clone()
            .filter(|c| c != "all" && !c.is_empty()),
        status: StatusFilter::parse(query.status.as_deref().unwrap_or("all")),
    };

    let tasks = state.tasks.list(&filters).await;
    let stats = state.tasks.stats().await;
    let categories = state.tasks.categories().await;

    Html(html_renderers::render_index(
        &tasks,
        &stats,
        &categories,
        &query,
    ))
}

/// POST / - create a task from the multipart add form
pub async fn handle_task_create(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Redirect {
    let form = match read_task_form(multipart).await {
        Ok(form) => form,
        Err(e) => return multipart_failure(e),
    };

    let image = match &form.image {
        Some((name, bytes)) => match state.images.save(name, bytes).await {
            Ok(stored) => stored,
            Err(e) => {
                error!("Failed to store upload: {}", e);
                None
            }
        },
        None => None,
    };

    let request = NewTask {
        text: form.text.unwrap_or_default(),
        priority: form.priority.unwrap_or_default(),
        category: form.category.unwrap_or_else(|| "general".to_string()),
        image: image.clone(),
    };

    match state.tasks.create(request).await {
        Ok(task) => {
            info!("Created task {}", task.id);
            notice_redirect("Task added successfully!", NoticeKind::Success)
        }
        Err(e) => {
            // The rejected submission must not leave an orphaned file behind.
            if let Some(stored) = image {
                state.images.remove(&stored).await;
            }
            warn!("Rejected task submission: {}", e);
            notice_redirect("Task text must not be empty.", NoticeKind::Error)
        }
    }
}

/// GET /toggle/:id - flip completion and bounce back to the list
pub async fn handle_toggle(State(state): State<Arc<AppState>>, Path(id): Path<u64>) -> Redirect {
    match state.tasks.toggle(id).await {
        Ok(task) => notice_redirect(
            if task.completed {
                "Task completed!"
            } else {
                "Task reopened!"
            },
            NoticeKind::Success,
        ),
        Err(e) => {
            warn!("Toggle failed: {}", e);
            notice_redirect("Task not found!", NoticeKind::Error)
        }
    }
}

/// GET /edit/:id - edit form for a single task
pub async fn handle_edit_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Html<String>, Redirect> {
    match state.tasks.get(id).await {
        Some(task) => Ok(Html(html_renderers::render_edit(&task))),
        None => Err(notice_redirect("Task not found!", NoticeKind::Error)),
    }
}

/// POST /edit/:id - apply the edit form, replacing the image when a new
/// valid file was supplied
pub async fn handle_edit_submit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    multipart: Multipart,
) -> Redirect {
    let form = match read_task_form(multipart).await {
        Ok(form) => form,
        Err(e) => return multipart_failure(e),
    };

    let updates = TaskUpdate {
        text: form.text,
        priority: form.priority,
        category: form.category,
    };
    if let Err(e) = state.tasks.update(id, updates).await {
        warn!("Update failed: {}", e);
        return notice_redirect("Task not found!", NoticeKind::Error);
    }

    if let Some((name, bytes)) = form.image {
        let current = state.tasks.get(id).await.and_then(|t| t.image);
        match state.images.replace(current.as_deref(), &name, &bytes).await {
            Ok(Some(stored)) => {
                let _ = state.tasks.attach_image(id, Some(stored)).await;
            }
            // Disallowed extension: the existing image stays attached.
            Ok(None) => {}
            Err(e) => error!("Failed to store replacement upload: {}", e),
        }
    }

    notice_redirect("Task updated successfully!", NoticeKind::Success)
}

/// GET /delete/:id - remove a task and its image; absent ids redirect
/// without feedback
pub async fn handle_delete(State(state): State<Arc<AppState>>, Path(id): Path<u64>) -> Redirect {
    match state.tasks.delete(id).await {
        Some(task) => {
            if let Some(image) = task.image {
                state.images.remove(&image).await;
            }
            info!("Deleted task {}", id);
            notice_redirect("Task deleted successfully!", NoticeKind::Success)
        }
        None => Redirect::to("/"),
    }
}

/// GET /delete-image/:id - detach and delete only the image
pub async fn handle_delete_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Redirect {
    match state.tasks.clear_image(id).await {
        Ok(Some(image)) => {
            state.images.remove(&image).await;
            notice_redirect("Image removed successfully!", NoticeKind::Success)
        }
        _ => Redirect::to("/"),
    }
}

/// GET /clear - drop every task and every stored image
pub async fn handle_clear(State(state): State<Arc<AppState>>) -> Redirect {
    let removed = state.tasks.clear().await;
    for task in &removed {
        if let Some(image) = &task.image {
            state.images.remove(image).await;
        }
    }
    info!("Cleared {} tasks", removed.len());
    notice_redirect("All tasks cleared!", NoticeKind::Success)
}

/// Configure task routes for the Axum router
pub fn configure_task_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handle_index).post(handle_task_create))
        .route("/toggle/:id", get(handle_toggle))
        .route("/edit/:id", get(handle_edit_page).post(handle_edit_submit))
        .route("/delete/:id", get(handle_delete))
        .route("/delete-image/:id", get(handle_delete_image))
        .route("/clear", get(handle_clear))
}
