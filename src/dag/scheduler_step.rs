// src/dag/scheduler_step.rs

//! Result types returned by scheduler mutations.

use crate::dag::task_info::Task;
use crate::types::TaskId;

/// How the ready set moved during one recomputation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadySetChange {
    /// Tasks that became ready and were pushed onto the queue.
    pub entered: Vec<TaskId>,
    /// Tasks that stopped being ready and were dropped from the queue.
    pub left: Vec<TaskId>,
}

impl ReadySetChange {
    pub fn is_empty(&self) -> bool {
        self.entered.is_empty() && self.left.is_empty()
    }
}

/// Structured result of a single "execute next" step.
///
/// Useful for tests and for drivers that want to report what changed.
#[derive(Debug, Clone, Default)]
pub struct SchedulerStep {
    /// The task taken off the queue and marked completed, if any.
    pub executed: Option<Task>,
    /// Tasks that became ready because of this step.
    pub newly_ready: Vec<TaskId>,
}

impl SchedulerStep {
    /// Step result for an empty queue.
    pub fn idle() -> Self {
        Self::default()
    }
}
