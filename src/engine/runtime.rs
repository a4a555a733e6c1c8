// src/engine/runtime.rs

use tracing::{debug, info};

use crate::dag::Task;
use crate::types::TaskId;

use super::shared::SharedScheduler;

/// Options for a [`Runtime`] drain.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeOptions {
    /// Stop after this many executed tasks. `None` drains the queue.
    pub max_steps: Option<usize>,
}

/// What a [`Runtime`] run did.
#[derive(Debug, Clone, Default)]
pub struct ExecutionReport {
    /// Tasks in the order they were executed.
    pub executed: Vec<Task>,
    /// Tasks that were not completed when the run stopped.
    pub remaining: Vec<TaskId>,
}

impl ExecutionReport {
    pub fn executed_ids(&self) -> Vec<TaskId> {
        self.executed.iter().map(|t| t.id).collect()
    }

    /// `true` if every known task ended up completed.
    pub fn is_complete(&self) -> bool {
        self.remaining.is_empty()
    }
}

/// Executes queued tasks one step at a time through a [`SharedScheduler`].
///
/// Each step takes the lock once (pop, complete, recompute), then yields, so
/// other handle holders can add tasks or dependencies between steps and the
/// run picks them up.
#[derive(Debug)]
pub struct Runtime {
    shared: SharedScheduler,
    options: RuntimeOptions,
}

impl Runtime {
    pub fn new(shared: SharedScheduler, options: RuntimeOptions) -> Self {
        Self { shared, options }
    }

    /// Execute until the queue is empty or the step limit is hit.
    pub async fn run(self) -> ExecutionReport {
        info!("taskdag runtime started");
        let mut executed = Vec::new();

        loop {
            if let Some(max) = self.options.max_steps {
                if executed.len() >= max {
                    info!(max_steps = max, "step limit reached; stopping runtime");
                    break;
                }
            }

            let step = self.shared.step_execute().await;
            let Some(task) = step.executed else {
                info!("queue drained; stopping runtime");
                break;
            };

            debug!(
                task = %task.id,
                name = %task.name,
                newly_ready = ?step.newly_ready,
                "runtime step"
            );
            executed.push(task);

            tokio::task::yield_now().await;
        }

        let remaining: Vec<TaskId> = self
            .shared
            .with(|s| {
                s.tasks()
                    .filter(|t| !t.status.is_completed())
                    .map(|t| t.id)
                    .collect()
            })
            .await;

        ExecutionReport {
            executed,
            remaining,
        }
    }
}
