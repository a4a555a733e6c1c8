//! Ready-made schedulers and the invariant checks tests run against them.

use std::collections::HashSet;

use taskdag::dag::Scheduler;
use taskdag::types::{PriorityOrder, TaskId, TaskStatus};

use crate::builders::add_tasks;

/// Ids of the tasks created by [`diamond`].
#[derive(Debug, Clone, Copy)]
pub struct Diamond {
    pub root: TaskId,
    pub left: TaskId,
    pub right: TaskId,
    pub sink: TaskId,
}

impl Diamond {
    /// Ids in creation order.
    pub fn ids(&self) -> Vec<TaskId> {
        vec![self.root, self.left, self.right, self.sink]
    }
}

/// `root(1) -> {left(3), right(2)} -> sink(4)`.
///
/// Under urgent-first this executes root, left, right, sink.
pub fn diamond(order: PriorityOrder) -> (Scheduler, Diamond) {
    let mut scheduler = Scheduler::new(order);
    let ids = add_tasks(
        &mut scheduler,
        &[("root", 1), ("left", 3), ("right", 2), ("sink", 4)],
    );
    let d = Diamond {
        root: ids[0],
        left: ids[1],
        right: ids[2],
        sink: ids[3],
    };

    for (prereq, dependent) in [
        (d.root, d.left),
        (d.root, d.right),
        (d.left, d.sink),
        (d.right, d.sink),
    ] {
        scheduler
            .add_dependency(prereq, dependent)
            .expect("diamond edges are acyclic");
    }
    (scheduler, d)
}

/// Priority-1 tasks where each one depends on the one before it.
pub fn chain(names: &[&str]) -> (Scheduler, Vec<TaskId>) {
    let mut scheduler = Scheduler::default();
    let specs: Vec<(&str, u32)> = names.iter().map(|&n| (n, 1)).collect();
    let ids = add_tasks(&mut scheduler, &specs);

    for pair in ids.windows(2) {
        scheduler
            .add_dependency(pair[0], pair[1])
            .expect("chain edges are acyclic");
    }
    (scheduler, ids)
}

/// Execute until the queue is empty and return the ids in execution order.
pub fn drain(scheduler: &mut Scheduler) -> Vec<TaskId> {
    std::iter::from_fn(|| scheduler.execute_next())
        .map(|t| t.id)
        .collect()
}

/// The queue holds exactly the ready tasks, none of them completed, and
/// every prerequisite of a ready task is completed.
pub fn assert_queue_matches_ready(scheduler: &Scheduler) {
    let queued: HashSet<TaskId> = scheduler.queue_order().into_iter().collect();
    let ready: HashSet<TaskId> = scheduler.ready_tasks().iter().copied().collect();
    assert_eq!(queued, ready, "queue and ready set diverged");

    for &id in &ready {
        assert_ne!(scheduler.status_of(id), Some(TaskStatus::Completed));
        for prereq in scheduler.dependencies_of(id) {
            assert_eq!(
                scheduler.status_of(prereq),
                Some(TaskStatus::Completed),
                "{id} is ready but prerequisite {prereq} is not completed"
            );
        }
    }

    // Anything already started has all of its prerequisites behind it.
    for task in scheduler.tasks() {
        if task.status == TaskStatus::InProgress {
            assert!(ready.contains(&task.id), "{} started while blocked", task.id);
        }
    }
}
