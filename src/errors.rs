// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

use crate::types::{TaskId, TaskStatus};

#[derive(Error, Debug)]
pub enum TaskdagError {
    #[error("Task {0} already exists in the graph")]
    DuplicateVertex(TaskId),

    #[error("Unknown task: {0}")]
    UnknownVertex(TaskId),

    #[error("Task {0} cannot depend on itself")]
    SelfDependency(TaskId),

    #[error("Adding dependency {from} -> {to} would create a cycle")]
    CycleDetected { from: TaskId, to: TaskId },

    #[error("Invalid task: {0}")]
    InvalidTask(String),

    #[error("Task {task} cannot move from {from} to {to}")]
    InvalidTransition {
        task: TaskId,
        from: TaskStatus,
        to: TaskStatus,
    },

    #[error("Task {0} still has incomplete prerequisites")]
    PrerequisitesIncomplete(TaskId),

    #[error("Task {dependent} is already {status}; it cannot wait for {prereq}")]
    DependentAlreadyStarted {
        prereq: TaskId,
        dependent: TaskId,
        status: TaskStatus,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, TaskdagError>;
