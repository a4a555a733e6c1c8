// src/dag/snapshot.rs

use crate::dag::task_info::Task;
use crate::types::{PriorityOrder, TaskId};

/// Owned, point-in-time copy of the scheduler's observable state.
///
/// Taken under one borrow (or one lock, see
/// [`SharedScheduler`](crate::engine::SharedScheduler)) so consumers can
/// enumerate it while the scheduler keeps changing.
#[derive(Debug, Clone)]
pub struct SchedulerSnapshot {
    pub priority_order: PriorityOrder,
    /// All tasks in creation order.
    pub tasks: Vec<Task>,
    /// Full topological order.
    pub execution_order: Vec<TaskId>,
    /// Ready, not completed tasks in graph insertion order.
    pub ready: Vec<TaskId>,
    /// Queue contents in the order they would be executed.
    pub queue: Vec<TaskId>,
    /// `(prerequisite, dependent)` pairs.
    pub edges: Vec<(TaskId, TaskId)>,
}

impl SchedulerSnapshot {
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Name of a task, or a placeholder for ids that are not in the snapshot.
    pub fn name_of(&self, id: TaskId) -> &str {
        self.task(id).map(|t| t.name.as_str()).unwrap_or("<unknown>")
    }

    /// The task that `execute_next` would pick.
    pub fn next(&self) -> Option<TaskId> {
        self.queue.first().copied()
    }
}
