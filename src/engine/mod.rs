// src/engine/mod.rs

//! Concurrent access to a scheduler.
//!
//! The scheduler itself is a synchronous, single-owner data structure. This
//! module is what hosts with several concurrent callers use:
//! - [`shared`] wraps one scheduler behind a single exclusive async lock, so
//!   registry, graph and queue always change together.
//! - [`runtime`] drains the queue step by step through that lock, recording
//!   the order in which tasks were executed.

pub mod runtime;
pub mod shared;

pub use runtime::{ExecutionReport, Runtime, RuntimeOptions};
pub use shared::SharedScheduler;
