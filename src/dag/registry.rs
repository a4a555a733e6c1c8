// src/dag/registry.rs

//! Owner of the canonical task records and their status transitions.

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::{debug, warn};

use crate::dag::task_info::{Task, TaskSpec};
use crate::errors::{Result, TaskdagError};
use crate::types::{TaskId, TaskStatus};

/// Task records keyed by id.
///
/// Ids come from a monotonically increasing counter and are never reused,
/// so iteration order is creation order.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: BTreeMap<TaskId, Task>,
    /// Last id handed out; the first task gets 1.
    id_counter: u64,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `spec`, allocate a fresh id and store the record as `Pending`.
    pub fn create(&mut self, spec: TaskSpec) -> Result<TaskId> {
        spec.validate()?;

        self.id_counter += 1;
        let id = TaskId::new(self.id_counter);
        let task = spec.into_task(id, Utc::now());

        debug!(task = %id, name = %task.name, priority = task.priority, "registered task");
        self.tasks.insert(id, task);
        Ok(id)
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.tasks.contains_key(&id)
    }

    /// Remove a record. Absent ids are a no-op.
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        self.tasks.remove(&id)
    }

    /// Move a task to `to`, enforcing the status state machine.
    ///
    /// Returns the previous status.
    pub fn transition(&mut self, id: TaskId, to: TaskStatus) -> Result<TaskStatus> {
        let task = self
            .tasks
            .get_mut(&id)
            .ok_or(TaskdagError::UnknownVertex(id))?;

        let from = task.status;
        if !from.can_transition_to(to) {
            warn!(task = %id, %from, %to, "rejected status transition");
            return Err(TaskdagError::InvalidTransition { task: id, from, to });
        }

        task.status = to;
        debug!(task = %id, %from, %to, "status changed");
        Ok(from)
    }

    /// Records in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// First task (in creation order) with exactly this name.
    pub fn find_by_name(&self, name: &str) -> Option<&Task> {
        self.tasks.values().find(|t| t.name == name)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
