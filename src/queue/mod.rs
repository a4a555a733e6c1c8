// src/queue/mod.rs

//! Priority ordering for the scheduler.
//!
//! - [`heap`] is a comparator-driven binary min-heap with no knowledge of the
//!   dependency graph.
//! - [`entry`] defines what the scheduler stores in that heap and how a
//!   [`PriorityOrder`](crate::types::PriorityOrder) turns into a comparator.

pub mod entry;
pub mod heap;

pub use entry::{QueueComparator, QueueEntry};
pub use heap::PriorityQueue;
