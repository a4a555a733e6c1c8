// src/queue/entry.rs

use std::cmp::Ordering;

use crate::types::{Priority, PriorityOrder, TaskId};

/// What the scheduler keeps in its priority queue: the task id plus the
/// priority it was queued with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueEntry {
    pub id: TaskId,
    pub priority: Priority,
}

/// Comparator type used by the scheduler's heap.
pub type QueueComparator = fn(&QueueEntry, &QueueEntry) -> Ordering;

impl PriorityOrder {
    /// Comparator implementing this policy.
    ///
    /// Equal priorities fall back to ascending [`TaskId`], i.e. creation
    /// order, so ties are resolved the same way on every run.
    pub fn comparator(self) -> QueueComparator {
        match self {
            PriorityOrder::UrgentFirst => urgent_first,
            PriorityOrder::LowestFirst => lowest_first,
        }
    }
}

fn urgent_first(a: &QueueEntry, b: &QueueEntry) -> Ordering {
    b.priority.cmp(&a.priority).then_with(|| a.id.cmp(&b.id))
}

fn lowest_first(a: &QueueEntry, b: &QueueEntry) -> Ordering {
    a.priority.cmp(&b.priority).then_with(|| a.id.cmp(&b.id))
}
