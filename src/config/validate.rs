// src/config/validate.rs

use std::collections::HashMap;

use crate::config::model::{PlanFile, RawPlanFile};
use crate::dag::DagGraph;
use crate::errors::{Result, TaskdagError};
use crate::types::TaskId;

impl TryFrom<RawPlanFile> for PlanFile {
    type Error = TaskdagError;

    fn try_from(raw: RawPlanFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_plan(&raw)?;
        Ok(PlanFile::new_unchecked(raw.config, raw.default, raw.task))
    }
}

fn validate_raw_plan(plan: &RawPlanFile) -> Result<()> {
    ensure_has_tasks(plan)?;
    validate_priorities(plan)?;
    validate_task_dependencies(plan)?;
    validate_dag(plan)?;
    Ok(())
}

fn ensure_has_tasks(plan: &RawPlanFile) -> Result<()> {
    if plan.task.is_empty() {
        return Err(TaskdagError::ConfigError(
            "plan must contain at least one [task.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_priorities(plan: &RawPlanFile) -> Result<()> {
    if plan.default.priority == Some(0) {
        return Err(TaskdagError::ConfigError(
            "[default].priority must be >= 1 (got 0)".to_string(),
        ));
    }

    for (name, task) in plan.task.iter() {
        if name.trim().is_empty() {
            return Err(TaskdagError::ConfigError(
                "task names must not be empty".to_string(),
            ));
        }
        if task.priority == Some(0) {
            return Err(TaskdagError::ConfigError(format!(
                "task '{}' must have priority >= 1 (got 0)",
                name
            )));
        }
    }
    Ok(())
}

fn validate_task_dependencies(plan: &RawPlanFile) -> Result<()> {
    for (name, task) in plan.task.iter() {
        for dep in task.after.iter() {
            if !plan.task.contains_key(dep) {
                return Err(TaskdagError::ConfigError(format!(
                    "task '{}' has unknown dependency '{}' in `after`",
                    name, dep
                )));
            }
            if dep == name {
                return Err(TaskdagError::ConfigError(format!(
                    "task '{}' cannot depend on itself in `after`",
                    name
                )));
            }
        }
    }
    Ok(())
}

fn validate_dag(plan: &RawPlanFile) -> Result<()> {
    // Trial graph with throwaway ids; edge direction is dep -> task, so
    //   [task.B]
    //   after = ["A"]
    // adds A -> B.
    let mut graph: DagGraph<&str> = DagGraph::new();
    let mut ids: HashMap<&str, TaskId> = HashMap::new();

    for (index, name) in plan.task.keys().enumerate() {
        let id = TaskId::new(index as u64 + 1);
        graph.add_vertex(id, name.as_str())?;
        ids.insert(name.as_str(), id);
    }

    for (name, task) in plan.task.iter() {
        for dep in task.after.iter() {
            let (Some(&from), Some(&to)) = (ids.get(dep.as_str()), ids.get(name.as_str())) else {
                continue;
            };

            match graph.add_edge(from, to) {
                Ok(()) => {}
                Err(TaskdagError::CycleDetected { .. }) => {
                    return Err(TaskdagError::ConfigError(format!(
                        "cycle detected in task plan: '{}' after '{}' closes a loop",
                        name, dep
                    )));
                }
                Err(other) => return Err(other),
            }
        }
    }

    Ok(())
}
