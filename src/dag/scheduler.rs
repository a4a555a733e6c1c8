use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::config::PlanFile;
use crate::dag::graph::DagGraph;
use crate::dag::registry::TaskRegistry;
use crate::dag::scheduler_step::{ReadySetChange, SchedulerStep};
use crate::dag::snapshot::SchedulerSnapshot;
use crate::dag::task_info::{Task, TaskSpec};
use crate::errors::{Result, TaskdagError};
use crate::queue::{PriorityQueue, QueueComparator, QueueEntry};
use crate::types::{PriorityOrder, TaskId, TaskStatus};

/// Scheduler owns the registry, the dependency graph and the priority queue.
///
/// It is responsible for:
/// - creating and deleting tasks (cascading into the graph and the queue)
/// - accepting or rejecting dependency edges
/// - re-deriving the ready set after every mutation
/// - keeping the queue equal to "ready and not completed"
/// - handing out the next task to execute by priority
///
/// Every operation runs to completion synchronously. Callers that share one
/// scheduler between concurrent tasks should go through
/// [`SharedScheduler`](crate::engine::SharedScheduler).
#[derive(Debug)]
pub struct Scheduler {
    registry: TaskRegistry,
    /// Vertex payload is the task name, kept for diagnostics.
    graph: DagGraph<String>,
    queue: PriorityQueue<QueueEntry, QueueComparator>,
    /// Ids currently in `queue`.
    queued: HashSet<TaskId>,
    priority_order: PriorityOrder,
    /// Last published ready set, in graph insertion order.
    ready: Vec<TaskId>,
    /// Last published topological order.
    execution_order: Vec<TaskId>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(PriorityOrder::default())
    }
}

impl Scheduler {
    pub fn new(priority_order: PriorityOrder) -> Self {
        Self {
            registry: TaskRegistry::new(),
            graph: DagGraph::new(),
            queue: PriorityQueue::with_comparator(priority_order.comparator()),
            queued: HashSet::new(),
            priority_order,
            ready: Vec::new(),
            execution_order: Vec::new(),
        }
    }

    /// Build a scheduler from a validated [`PlanFile`].
    ///
    /// Tasks are created in plan key order, then every `after` entry becomes
    /// a dependency edge.
    pub fn from_plan(plan: &PlanFile) -> Result<Self> {
        let mut scheduler = Self::new(plan.config().priority_order);
        let default_priority = plan.default().priority;

        let mut ids: HashMap<&str, TaskId> = HashMap::new();
        for (name, tc) in plan.tasks() {
            let spec = TaskSpec {
                name: name.clone(),
                priority: tc.effective_priority(default_priority),
                deadline: tc.deadline,
                description: tc.description.clone(),
            };
            let id = scheduler.add_task(spec)?;
            ids.insert(name.as_str(), id);
        }

        for (name, tc) in plan.tasks() {
            let dependent = lookup(&ids, name)?;
            for dep in &tc.after {
                let prereq = lookup(&ids, dep)?;
                scheduler.add_dependency(prereq, dependent)?;
            }
        }

        info!(
            tasks = scheduler.registry.len(),
            edges = scheduler.graph.edge_count(),
            priority_order = %scheduler.priority_order,
            "scheduler built from plan"
        );
        Ok(scheduler)
    }

    /// Submit a new task. It starts `Pending` and, having no prerequisites
    /// yet, is immediately ready and queued.
    pub fn add_task(&mut self, spec: TaskSpec) -> Result<TaskId> {
        let id = self.registry.create(spec)?;
        let name = self
            .registry
            .get(id)
            .map(|t| t.name.clone())
            .unwrap_or_default();

        if let Err(err) = self.graph.add_vertex(id, name.clone()) {
            self.registry.remove(id);
            return Err(err);
        }

        info!(task = %id, name = %name, "task added");
        self.recompute_ready_set();
        Ok(id)
    }

    /// Declare that `prereq` must complete before `dependent` may start.
    ///
    /// A task that already started (in progress or completed) cannot gain a
    /// prerequisite that is not completed yet; that fails with
    /// `DependentAlreadyStarted` and leaves everything unchanged.
    pub fn add_dependency(&mut self, prereq: TaskId, dependent: TaskId) -> Result<()> {
        if prereq == dependent {
            warn!(task = %prereq, "rejected self dependency");
            return Err(TaskdagError::SelfDependency(prereq));
        }

        // Unknown endpoints fall through to the graph's own error.
        if let (Some(prereq_status), Some(status)) =
            (self.status_of(prereq), self.status_of(dependent))
        {
            if status != TaskStatus::Pending && !prereq_status.is_completed() {
                warn!(%prereq, %dependent, %status, "rejected dependency on a started task");
                return Err(TaskdagError::DependentAlreadyStarted {
                    prereq,
                    dependent,
                    status,
                });
            }
        }

        if let Err(err) = self.graph.add_edge(prereq, dependent) {
            warn!(%prereq, %dependent, error = %err, "rejected dependency");
            return Err(err);
        }

        info!(%prereq, %dependent, "dependency added");
        self.recompute_ready_set();
        Ok(())
    }

    /// Drop the dependency `prereq -> dependent`. Returns whether it existed.
    pub fn remove_dependency(&mut self, prereq: TaskId, dependent: TaskId) -> bool {
        let removed = self.graph.remove_edge(prereq, dependent);
        if removed {
            info!(%prereq, %dependent, "dependency removed");
            self.recompute_ready_set();
        }
        removed
    }

    /// Delete a task from the registry, the graph (with all its edges) and
    /// the queue. Unknown ids are a no-op.
    pub fn delete_task(&mut self, id: TaskId) -> Option<Task> {
        let Some(task) = self.registry.remove(id) else {
            debug!(task = %id, "delete of unknown task; ignoring");
            return None;
        };

        self.graph.remove_vertex(id);
        if self.queued.remove(&id) {
            self.queue.retain(|entry| entry.id != id);
        }

        info!(task = %id, name = %task.name, "task deleted");
        self.recompute_ready_set();
        Some(task)
    }

    /// Re-derive the ready set from the graph and sync the queue with it.
    ///
    /// A task is ready when it is not completed and every prerequisite is.
    /// Afterwards the queue holds exactly the ready tasks, and the
    /// topological order is republished.
    pub fn recompute_ready_set(&mut self) -> ReadySetChange {
        let registry = &self.registry;
        let is_completed =
            |id: TaskId| registry.get(id).is_some_and(|t| t.status.is_completed());

        let ready: Vec<TaskId> = self
            .graph
            .unblocked_by(&is_completed)
            .into_iter()
            .filter(|&id| !is_completed(id))
            .collect();
        let ready_set: HashSet<TaskId> = ready.iter().copied().collect();

        let mut left: Vec<TaskId> = self
            .queued
            .iter()
            .copied()
            .filter(|id| !ready_set.contains(id))
            .collect();
        left.sort();

        if !left.is_empty() {
            self.queue.retain(|entry| ready_set.contains(&entry.id));
            for id in &left {
                self.queued.remove(id);
            }
        }

        let mut entered = Vec::new();
        for &id in &ready {
            if self.queued.contains(&id) {
                continue;
            }
            let Some(task) = self.registry.get(id) else {
                continue;
            };
            self.queue.insert(QueueEntry {
                id,
                priority: task.priority,
            });
            self.queued.insert(id);
            entered.push(id);
        }

        self.ready = ready;
        self.execution_order = self.graph.topological_sort();

        let change = ReadySetChange { entered, left };
        if !change.is_empty() {
            debug!(
                entered = ?change.entered,
                left = ?change.left,
                queue_len = self.queue.len(),
                "ready set changed"
            );
        }
        change
    }

    /// Pop the highest-priority ready task, mark it completed and return it.
    ///
    /// Returns `None` straight away when nothing is ready.
    pub fn execute_next(&mut self) -> Option<Task> {
        self.step_execute().executed
    }

    /// Variant of [`Scheduler::execute_next`] that also reports which tasks
    /// became ready as a result.
    pub fn step_execute(&mut self) -> SchedulerStep {
        let Some(entry) = self.queue.extract_min() else {
            debug!("queue empty; nothing to execute");
            return SchedulerStep::idle();
        };
        self.queued.remove(&entry.id);

        if let Err(err) = self.registry.transition(entry.id, TaskStatus::Completed) {
            warn!(task = %entry.id, error = %err, "dequeued task could not be completed");
            let change = self.recompute_ready_set();
            return SchedulerStep {
                executed: None,
                newly_ready: change.entered,
            };
        }

        info!(task = %entry.id, priority = entry.priority, "task executed");
        let change = self.recompute_ready_set();

        SchedulerStep {
            executed: self.registry.get(entry.id).cloned(),
            newly_ready: change.entered,
        }
    }

    /// Complete a specific ready task, bypassing queue order.
    ///
    /// Fails with `PrerequisitesIncomplete` if the task is not ready yet.
    pub fn complete_task(&mut self, id: TaskId) -> Result<SchedulerStep> {
        let status = self
            .registry
            .get(id)
            .map(|t| t.status)
            .ok_or(TaskdagError::UnknownVertex(id))?;

        if status.is_completed() {
            return Err(TaskdagError::InvalidTransition {
                task: id,
                from: status,
                to: TaskStatus::Completed,
            });
        }
        if !self.ready.contains(&id) {
            warn!(task = %id, "cannot complete task with incomplete prerequisites");
            return Err(TaskdagError::PrerequisitesIncomplete(id));
        }

        self.registry.transition(id, TaskStatus::Completed)?;
        if self.queued.remove(&id) {
            self.queue.retain(|entry| entry.id != id);
        }

        info!(task = %id, "task completed");
        let change = self.recompute_ready_set();

        Ok(SchedulerStep {
            executed: self.registry.get(id).cloned(),
            newly_ready: change.entered,
        })
    }

    /// Mark a ready task as in progress. Graph and queue membership are
    /// unchanged.
    ///
    /// A pending task with an incomplete prerequisite cannot be started and
    /// fails with `PrerequisitesIncomplete`.
    pub fn mark_in_progress(&mut self, id: TaskId) -> Result<()> {
        let status = self
            .registry
            .get(id)
            .map(|t| t.status)
            .ok_or(TaskdagError::UnknownVertex(id))?;

        if status == TaskStatus::Pending && !self.ready.contains(&id) {
            warn!(task = %id, "cannot start task with incomplete prerequisites");
            return Err(TaskdagError::PrerequisitesIncomplete(id));
        }

        self.registry.transition(id, TaskStatus::InProgress)?;
        info!(task = %id, "task in progress");
        Ok(())
    }

    /// Switch the queue's comparator direction, re-heaping queued tasks.
    pub fn set_priority_order(&mut self, order: PriorityOrder) {
        if order == self.priority_order {
            return;
        }

        let old = std::mem::replace(
            &mut self.queue,
            PriorityQueue::with_comparator(order.comparator()),
        );
        for entry in old.iter().copied() {
            self.queue.insert(entry);
        }

        debug!(from = %self.priority_order, to = %order, "priority order changed");
        self.priority_order = order;
    }

    pub fn priority_order(&self) -> PriorityOrder {
        self.priority_order
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.registry.get(id)
    }

    /// All tasks in creation order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.registry.iter()
    }

    pub fn task_count(&self) -> usize {
        self.registry.len()
    }

    pub fn task_id_by_name(&self, name: &str) -> Option<TaskId> {
        self.registry.find_by_name(name).map(|t| t.id)
    }

    pub fn status_of(&self, id: TaskId) -> Option<TaskStatus> {
        self.registry.get(id).map(|t| t.status)
    }

    /// Topological order published by the last recomputation.
    pub fn topological_order(&self) -> &[TaskId] {
        &self.execution_order
    }

    /// Ready, not completed tasks, in graph insertion order.
    pub fn ready_tasks(&self) -> &[TaskId] {
        &self.ready
    }

    /// The task `execute_next` would pick, without removing it.
    pub fn peek_next(&self) -> Option<&Task> {
        self.queue.peek().and_then(|entry| self.registry.get(entry.id))
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Queued task ids in the order they would be executed.
    pub fn queue_order(&self) -> Vec<TaskId> {
        self.queue
            .clone()
            .into_sorted_vec()
            .into_iter()
            .map(|entry| entry.id)
            .collect()
    }

    /// `true` when nothing is left to execute.
    pub fn is_drained(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn dependencies_of(&self, id: TaskId) -> Vec<TaskId> {
        self.graph.dependencies_of(id)
    }

    pub fn dependents_of(&self, id: TaskId) -> &[TaskId] {
        self.graph.dependents_of(id)
    }

    /// Read-only access to the dependency graph.
    pub fn graph(&self) -> &DagGraph<String> {
        &self.graph
    }

    /// Owned copy of everything a consumer might want to enumerate.
    pub fn snapshot(&self) -> SchedulerSnapshot {
        SchedulerSnapshot {
            priority_order: self.priority_order,
            tasks: self.registry.iter().cloned().collect(),
            execution_order: self.execution_order.clone(),
            ready: self.ready.clone(),
            queue: self.queue_order(),
            edges: self.graph.edges().collect(),
        }
    }
}

fn lookup(ids: &HashMap<&str, TaskId>, name: &str) -> Result<TaskId> {
    ids.get(name).copied().ok_or_else(|| {
        TaskdagError::ConfigError(format!("plan references unknown task '{name}'"))
    })
}
