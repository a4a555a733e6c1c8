// src/dag/task_info.rs

//! Task records and the payload used to submit them.

use chrono::{DateTime, NaiveDate, Utc};

use crate::errors::{Result, TaskdagError};
use crate::types::{Priority, TaskId, TaskStatus};

/// Canonical task record owned by the [`TaskRegistry`](crate::dag::TaskRegistry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub priority: Priority,
    pub deadline: Option<NaiveDate>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub status: TaskStatus,
}

/// Everything a caller supplies when submitting a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    pub name: String,
    pub priority: Priority,
    pub deadline: Option<NaiveDate>,
    pub description: Option<String>,
}

impl TaskSpec {
    pub fn new(name: impl Into<String>, priority: Priority) -> Self {
        Self {
            name: name.into(),
            priority,
            deadline: None,
            description: None,
        }
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Reject blank names and a zero priority.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(TaskdagError::InvalidTask(
                "task name must not be empty".to_string(),
            ));
        }
        if self.priority == 0 {
            return Err(TaskdagError::InvalidTask(format!(
                "task '{}' must have a positive priority (got 0)",
                self.name
            )));
        }
        Ok(())
    }

    pub(crate) fn into_task(self, id: TaskId, created_at: DateTime<Utc>) -> Task {
        // Blank descriptions carry no information.
        let description = self.description.filter(|d| !d.trim().is_empty());

        Task {
            id,
            name: self.name,
            priority: self.priority,
            deadline: self.deadline,
            description,
            created_at,
            status: TaskStatus::Pending,
        }
    }
}
