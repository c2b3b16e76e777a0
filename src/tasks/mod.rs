//! Tasks module - the in-memory task list and its HTTP surface
//!
//! This module is split into:
//! - types: task record, filters, stats, and error types
//! - store: TaskStore with the CRUD operations
//! - handlers: HTTP request handlers
//! - html_renderers: HTML building functions for the UI

pub mod handlers;
pub mod html_renderers;
pub mod store;
pub mod types;

pub use handlers::configure_task_routes;
pub use store::TaskStore;
pub use types::{Task, TaskError, TaskFilters, TaskPriority, TaskStats};

#[cfg(test)]
#[path = "tasks.test.rs"]
mod tasks_test;
