use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub text: String,
    pub completed: bool,
    pub priority: TaskPriority,
    pub category: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub text: String,
    pub priority: TaskPriority,
    pub category: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub text: Option<String>,
    pub priority: Option<TaskPriority>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Pending,
}

impl StatusFilter {
    pub fn parse(value: &str) -> Self {
        match value {
            "completed" => Self::Completed,
            "pending" => Self::Pending,
            _ => Self::All,
        }
    }

    pub fn matches(&self, completed: bool) -> bool {
        match self {
            Self::All => true,
            Self::Completed => completed,
            Self::Pending => !completed,
        }
    }
}

/// Conjunction of optional predicates; an unset field matches every task.
#[derive(Debug, Clone, Default)]
pub struct TaskFilters {
    pub priority: Option<TaskPriority>,
    pub category: Option<String>,
    pub status: StatusFilter,
}

impl TaskFilters {
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if task.category != *category {
                return false;
            }
        }
        self.status.matches(task.completed)
    }
}

/// Aggregate counts over the full store, not the filtered view.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Pending tasks with high priority.
    pub high_priority: usize,
    /// Distinct category strings.
    pub categories: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("task text must not be empty")]
    EmptyText,
    #[error("task {0} not found")]
    NotFound(u64),
}
