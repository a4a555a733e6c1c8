// src/config/model.rs

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::types::{Priority, PriorityOrder};

/// Priority used when neither the task nor `[default]` sets one.
pub const FALLBACK_PRIORITY: Priority = 1;

/// Plan file exactly as deserialized from TOML, before validation.
///
/// ```toml
/// [config]
/// priority_order = "urgent-first"
///
/// [default]
/// priority = 2
///
/// [task.design]
/// priority = 3
/// deadline = "2026-11-01"
/// description = "Write the design doc"
/// after = ["research"]
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlanFile {
    /// Scheduler behaviour from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// Defaults from `[default]`.
    #[serde(default)]
    pub default: DefaultSection,

    /// All tasks from `[task.<name>]`, keyed by task name.
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,
}

/// `[config]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigSection {
    /// `"urgent-first"` (default) or `"lowest-first"`.
    #[serde(default)]
    pub priority_order: PriorityOrder,
}

/// `[default]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefaultSection {
    /// Priority for tasks that do not set one.
    #[serde(default)]
    pub priority: Option<Priority>,
}

/// `[task.<name>]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskConfig {
    /// 1 = low .. 4 = urgent. Falls back to `default.priority`, then 1.
    #[serde(default)]
    pub priority: Option<Priority>,

    /// Calendar date, e.g. `"2026-11-01"`.
    #[serde(default)]
    pub deadline: Option<NaiveDate>,

    #[serde(default)]
    pub description: Option<String>,

    /// Prerequisites: this task waits for every task listed here.
    #[serde(default)]
    pub after: Vec<String>,
}

impl TaskConfig {
    pub fn effective_priority(&self, default_priority: Option<Priority>) -> Priority {
        self.priority
            .or(default_priority)
            .unwrap_or(FALLBACK_PRIORITY)
    }
}

/// A plan file that passed validation.
///
/// Only obtainable through `TryFrom<RawPlanFile>` (see `validate.rs`), so
/// holding one means every `after` reference resolves and the dependency
/// graph is acyclic.
#[derive(Debug, Clone)]
pub struct PlanFile {
    config: ConfigSection,
    default: DefaultSection,
    task: BTreeMap<String, TaskConfig>,
}

impl PlanFile {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        default: DefaultSection,
        task: BTreeMap<String, TaskConfig>,
    ) -> Self {
        Self {
            config,
            default,
            task,
        }
    }

    pub fn config(&self) -> &ConfigSection {
        &self.config
    }

    pub fn default(&self) -> &DefaultSection {
        &self.default
    }

    pub fn tasks(&self) -> &BTreeMap<String, TaskConfig> {
        &self.task
    }
}
