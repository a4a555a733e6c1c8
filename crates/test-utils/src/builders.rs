#![allow(dead_code)]

use std::collections::BTreeMap;

use taskdag::config::{ConfigSection, DefaultSection, PlanFile, RawPlanFile, TaskConfig};
use taskdag::dag::{Scheduler, TaskSpec};
use taskdag::types::{Priority, PriorityOrder, TaskId};

/// Builder for `PlanFile` to simplify test setup.
pub struct PlanFileBuilder {
    plan: RawPlanFile,
}

impl PlanFileBuilder {
    pub fn new() -> Self {
        Self {
            plan: RawPlanFile {
                config: ConfigSection::default(),
                default: DefaultSection::default(),
                task: BTreeMap::new(),
            },
        }
    }

    pub fn with_task(mut self, name: &str, task: TaskConfig) -> Self {
        self.plan.task.insert(name.to_string(), task);
        self
    }

    pub fn with_priority_order(mut self, order: PriorityOrder) -> Self {
        self.plan.config.priority_order = order;
        self
    }

    pub fn with_default_priority(mut self, priority: Priority) -> Self {
        self.plan.default.priority = Some(priority);
        self
    }

    /// The raw plan, for tests that exercise validation failures.
    pub fn build_raw(self) -> RawPlanFile {
        self.plan
    }

    pub fn build(self) -> PlanFile {
        PlanFile::try_from(self.plan).expect("Failed to build valid plan from builder")
    }
}

impl Default for PlanFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskConfig`.
pub struct TaskConfigBuilder {
    task: TaskConfig,
}

impl TaskConfigBuilder {
    pub fn new(priority: Priority) -> Self {
        Self {
            task: TaskConfig {
                priority: Some(priority),
                ..TaskConfig::default()
            },
        }
    }

    /// Task without its own priority (falls back to `[default]`).
    pub fn unprioritised() -> Self {
        Self {
            task: TaskConfig::default(),
        }
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.task.after.push(dep.to_string());
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.task.description = Some(text.to_string());
        self
    }

    pub fn deadline(mut self, date: &str) -> Self {
        self.task.deadline = Some(date.parse().expect("deadline must be YYYY-MM-DD"));
        self
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }
}

/// Add one task per `(name, priority)` pair and return their ids in order.
pub fn add_tasks(scheduler: &mut Scheduler, tasks: &[(&str, Priority)]) -> Vec<TaskId> {
    tasks
        .iter()
        .map(|&(name, priority)| {
            scheduler
                .add_task(TaskSpec::new(name, priority))
                .expect("test task should be valid")
        })
        .collect()
}
