// src/dag/mod.rs

//! Task records, the dependency graph and the scheduler that ties them to
//! the priority queue.
//!
//! - [`graph`] holds the acyclic dependency graph and its traversals.
//! - [`registry`] owns task records and status transitions.
//! - [`task_info`] defines the task record and submission payload.
//! - [`scheduler`] composes registry, graph and queue.
//! - [`scheduler_step`] defines the result types of scheduler mutations.
//! - [`snapshot`] is an owned view of scheduler state.

pub mod graph;
pub mod registry;
pub mod scheduler;
pub mod scheduler_step;
pub mod snapshot;
pub mod task_info;

pub use graph::DagGraph;
pub use registry::TaskRegistry;
pub use scheduler::Scheduler;
pub use scheduler_step::{ReadySetChange, SchedulerStep};
pub use snapshot::SchedulerSnapshot;
pub use task_info::{Task, TaskSpec};
