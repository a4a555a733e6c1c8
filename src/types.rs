// src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Opaque task identifier.
///
/// Ids are allocated from a monotonically increasing counter, so comparing
/// two ids tells you which task was created first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    pub fn new(raw: u64) -> Self {
        TaskId(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Task priority. Valid values start at 1 (low) and conventionally go up to
/// 4 (urgent).
pub type Priority = u32;

/// Lifecycle status of a task.
///
/// `Pending -> InProgress -> Completed`, with `Pending -> Completed` also
/// allowed. Nothing leaves `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn is_completed(self) -> bool {
        matches!(self, TaskStatus::Completed)
    }

    /// Whether a task in this status may move to `next`.
    ///
    /// Re-marking an in-progress task as in progress is accepted as a no-op.
    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        matches!(
            (self, next),
            (TaskStatus::Pending, TaskStatus::InProgress)
                | (TaskStatus::Pending, TaskStatus::Completed)
                | (TaskStatus::InProgress, TaskStatus::InProgress)
                | (TaskStatus::InProgress, TaskStatus::Completed)
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// Which end of the priority scale the scheduler serves first.
///
/// - `UrgentFirst`: larger priority values are extracted first (an urgent
///   task with priority 4 runs before a low one with priority 1). Default.
/// - `LowestFirst`: smaller priority values are extracted first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriorityOrder {
    #[default]
    UrgentFirst,
    LowestFirst,
}

impl fmt::Display for PriorityOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityOrder::UrgentFirst => f.write_str("urgent-first"),
            PriorityOrder::LowestFirst => f.write_str("lowest-first"),
        }
    }
}

impl FromStr for PriorityOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "urgent-first" | "urgent_first" => Ok(PriorityOrder::UrgentFirst),
            "lowest-first" | "lowest_first" => Ok(PriorityOrder::LowestFirst),
            other => Err(format!(
                "invalid priority_order: {other} (expected \"urgent-first\" or \"lowest-first\")"
            )),
        }
    }
}
