//! Task store - in-memory task collection and its mutations
use chrono::Utc;
use tokio::sync::RwLock;

use crate::tasks::types::*;

struct StoreInner {
    tasks: Vec<Task>,
    next_id: u64,
}

/// Insertion-ordered task collection behind a single lock.
///
/// Ids come from a counter that survives deletions, so they are never
/// reused. The lock also covers the counter, which keeps concurrent
/// creates from racing on id assignment.
pub struct TaskStore {
    inner: RwLock<StoreInner>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                tasks: Vec::new(),
                next_id: 1,
            }),
        }
    }

    pub async fn create(&self, request: NewTask) -> Result<Task, TaskError> {
        let text = request.text.trim();
        if text.is_empty() {
            return Err(TaskError::EmptyText);
        }

        let mut inner = self.inner.write().await;
        let task = Task {
            id: inner.next_id,
            text: text.to_string(),
            completed: false,
            priority: request.priority,
            category: request.category,
            image: request.image,
            created_at: Utc::now(),
            updated_at: None,
        };
        inner.next_id += 1;
        inner.tasks.push(task.clone());
        Ok(task)
    }

    /// Matching tasks in insertion order; does not mutate state.
    pub async fn list(&self, filters: &TaskFilters) -> Vec<Task> {
        let inner = self.inner.read().await;
        inner
            .tasks
            .iter()
            .filter(|t| filters.matches(t))
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: u64) -> Option<Task> {
        let inner = self.inner.read().await;
        inner.tasks.iter().find(|t| t.id == id).cloned()
    }

    pub async fn toggle(&self, id: u64) -> Result<Task, TaskError> {
        let mut inner = self.inner.write().await;
        let task = inner
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TaskError::NotFound(id))?;
        task.completed = !task.completed;
        task.updated_at = Some(Utc::now());
        Ok(task.clone())
    }

    pub async fn update(&self, id: u64, updates: TaskUpdate) -> Result<Task, TaskError> {
        let mut inner = self.inner.write().await;
        let task = inner
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TaskError::NotFound(id))?;

        if let Some(text) = updates.text {
            let text = text.trim();
            // Blank submissions keep the existing text instead of wiping it.
            if !text.is_empty() {
                task.text = text.to_string();
            }
        }
        if let Some(priority) = updates.priority {
            task.priority = priority;
        }
        if let Some(category) = updates.category {
            task.category = category;
        }
        task.updated_at = Some(Utc::now());
        Ok(task.clone())
    }

    /// Swap the image reference, returning the superseded file name so the
    /// caller can delete it.
    pub async fn attach_image(
        &self,
        id: u64,
        image: Option<String>,
    ) -> Result<Option<String>, TaskError> {
        let mut inner = self.inner.write().await;
        let task = inner
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TaskError::NotFound(id))?;
        let previous = std::mem::replace(&mut task.image, image);
        task.updated_at = Some(Utc::now());
        Ok(previous)
    }

    /// Remove the image reference if one is set. Returns the detached file
    /// name; a task without an image is left untouched.
    pub async fn clear_image(&self, id: u64) -> Result<Option<String>, TaskError> {
        let mut inner = self.inner.write().await;
        let task = inner
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TaskError::NotFound(id))?;
        if task.image.is_none() {
            return Ok(None);
        }
        task.updated_at = Some(Utc::now());
        Ok(task.image.take())
    }

    /// Remove and return the task; the caller deletes any associated file.
    /// Absent ids are a silent no-op.
    pub async fn delete(&self, id: u64) -> Option<Task> {
        let mut inner = self.inner.write().await;
        let position = inner.tasks.iter().position(|t| t.id == id)?;
        Some(inner.tasks.remove(position))
    }

    /// Drain every task, returning them for image cleanup. The id counter
    /// keeps its value so cleared ids are not reissued.
    pub async fn clear(&self) -> Vec<Task> {
        let mut inner = self.inner.write().await;
        std::mem::take(&mut inner.tasks)
    }

    pub async fn stats(&self) -> TaskStats {
        let inner = self.inner.read().await;
        let total = inner.tasks.len();
        let completed = inner.tasks.iter().filter(|t| t.completed).count();
        let high_priority = inner
            .tasks
            .iter()
            .filter(|t| t.priority == TaskPriority::High && !t.completed)
            .count();
        let mut categories: Vec<&str> =
            inner.tasks.iter().map(|t| t.category.as_str()).collect();
        categories.sort_unstable();
        categories.dedup();

        TaskStats {
            total,
            completed,
            pending: total - completed,
            high_priority,
            categories: categories.len(),
        }
    }

    /// Distinct categories in alphabetical order, for the filter dropdown.
    pub async fn categories(&self) -> Vec<String> {
        let inner = self.inner.read().await;
        let mut categories: Vec<String> =
            inner.tasks.iter().map(|t| t.category.clone()).collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }

    /// Total/completed pair for the health endpoint.
    pub async fn counts(&self) -> (usize, usize) {
        let inner = self.inner.read().await;
        let completed = inner.tasks.iter().filter(|t| t.completed).count();
        (inner.tasks.len(), completed)
    }
}
