// src/engine/shared.rs

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::dag::{Scheduler, SchedulerSnapshot, SchedulerStep, Task, TaskSpec};
use crate::errors::Result;
use crate::types::{PriorityOrder, TaskId, TaskStatus};

/// Cloneable handle to one scheduler guarded by a single async mutex.
///
/// Each method takes the lock once, so every call is atomic with respect to
/// the registry, the graph and the queue. Use [`SharedScheduler::with`] to
/// group several operations into one critical section.
#[derive(Debug, Clone)]
pub struct SharedScheduler {
    inner: Arc<Mutex<Scheduler>>,
}

impl SharedScheduler {
    pub fn new(scheduler: Scheduler) -> Self {
        Self {
            inner: Arc::new(Mutex::new(scheduler)),
        }
    }

    /// Run `f` with exclusive access to the scheduler.
    pub async fn with<R>(&self, f: impl FnOnce(&mut Scheduler) -> R) -> R {
        let mut guard = self.inner.lock().await;
        f(&mut guard)
    }

    pub async fn add_task(&self, spec: TaskSpec) -> Result<TaskId> {
        self.with(|s| s.add_task(spec)).await
    }

    pub async fn add_dependency(&self, prereq: TaskId, dependent: TaskId) -> Result<()> {
        self.with(|s| s.add_dependency(prereq, dependent)).await
    }

    pub async fn remove_dependency(&self, prereq: TaskId, dependent: TaskId) -> bool {
        self.with(|s| s.remove_dependency(prereq, dependent)).await
    }

    pub async fn delete_task(&self, id: TaskId) -> Option<Task> {
        self.with(|s| s.delete_task(id)).await
    }

    pub async fn mark_in_progress(&self, id: TaskId) -> Result<()> {
        self.with(|s| s.mark_in_progress(id)).await
    }

    pub async fn execute_next(&self) -> Option<Task> {
        self.with(|s| s.execute_next()).await
    }

    pub async fn step_execute(&self) -> SchedulerStep {
        self.with(|s| s.step_execute()).await
    }

    pub async fn complete_task(&self, id: TaskId) -> Result<SchedulerStep> {
        self.with(|s| s.complete_task(id)).await
    }

    pub async fn set_priority_order(&self, order: PriorityOrder) {
        self.with(|s| s.set_priority_order(order)).await
    }

    // Queries hand back owned copies; the lock is released on return.

    pub async fn task(&self, id: TaskId) -> Option<Task> {
        self.with(|s| s.task(id).cloned()).await
    }

    pub async fn ready_tasks(&self) -> Vec<TaskId> {
        self.with(|s| s.ready_tasks().to_vec()).await
    }

    pub async fn topological_order(&self) -> Vec<TaskId> {
        self.with(|s| s.topological_order().to_vec()).await
    }

    pub async fn peek_next(&self) -> Option<Task> {
        self.with(|s| s.peek_next().cloned()).await
    }

    pub async fn queue_order(&self) -> Vec<TaskId> {
        self.with(|s| s.queue_order()).await
    }

    pub async fn status_of(&self, id: TaskId) -> Option<TaskStatus> {
        self.with(|s| s.status_of(id)).await
    }

    pub async fn snapshot(&self) -> SchedulerSnapshot {
        self.with(|s| s.snapshot()).await
    }
}
