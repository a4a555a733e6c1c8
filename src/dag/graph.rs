// src/dag/graph.rs

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::errors::{Result, TaskdagError};
use crate::types::TaskId;

/// Internal node structure: payload plus outgoing edges.
#[derive(Debug, Clone)]
struct DagNode<P> {
    payload: P,
    /// Direct dependents: tasks that may only start once this one completes.
    dependents: Vec<TaskId>,
}

/// In-memory dependency graph keyed by [`TaskId`].
///
/// An edge `A -> B` means "A must complete before B may start". The graph is
/// kept acyclic at mutation time: [`DagGraph::add_edge`] refuses any edge
/// that would close a cycle, so traversals never need to re-validate.
///
/// Vertex insertion order is remembered and drives every traversal, which
/// makes [`DagGraph::topological_sort`] and [`DagGraph::ready_tasks`]
/// deterministic.
#[derive(Debug, Clone)]
pub struct DagGraph<P = ()> {
    nodes: HashMap<TaskId, DagNode<P>>,
    order: Vec<TaskId>,
}

impl<P> Default for DagGraph<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> DagGraph<P> {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a new vertex with an empty outgoing edge list.
    pub fn add_vertex(&mut self, id: TaskId, payload: P) -> Result<()> {
        if self.nodes.contains_key(&id) {
            return Err(TaskdagError::DuplicateVertex(id));
        }

        self.nodes.insert(
            id,
            DagNode {
                payload,
                dependents: Vec::new(),
            },
        );
        self.order.push(id);
        trace!(task = %id, "vertex added");
        Ok(())
    }

    /// Add the edge `from -> to`.
    ///
    /// Fails with `UnknownVertex` if either endpoint is missing and with
    /// `CycleDetected` if the edge would close a cycle (including `from == to`).
    /// On failure the graph is left exactly as it was. Adding an edge that
    /// already exists succeeds without creating a parallel edge.
    pub fn add_edge(&mut self, from: TaskId, to: TaskId) -> Result<()> {
        for id in [from, to] {
            if !self.nodes.contains_key(&id) {
                return Err(TaskdagError::UnknownVertex(id));
            }
        }

        if self.has_edge(from, to) {
            trace!(%from, %to, "edge already present");
            return Ok(());
        }

        if self.would_create_cycle(from, to) {
            debug!(%from, %to, "rejecting edge: would create a cycle");
            return Err(TaskdagError::CycleDetected { from, to });
        }

        if let Some(node) = self.nodes.get_mut(&from) {
            node.dependents.push(to);
        }
        debug!(%from, %to, "edge added");
        Ok(())
    }

    /// Remove the edge `from -> to`. Returns `true` if an edge was removed;
    /// absent edges (or vertices) are a no-op.
    pub fn remove_edge(&mut self, from: TaskId, to: TaskId) -> bool {
        let Some(node) = self.nodes.get_mut(&from) else {
            return false;
        };

        match node.dependents.iter().position(|&d| d == to) {
            Some(idx) => {
                node.dependents.remove(idx);
                debug!(%from, %to, "edge removed");
                true
            }
            None => false,
        }
    }

    /// Remove a vertex together with its outgoing edges and every edge that
    /// points at it. Returns the payload if the vertex existed.
    pub fn remove_vertex(&mut self, id: TaskId) -> Option<P> {
        let node = self.nodes.remove(&id)?;
        self.order.retain(|&v| v != id);

        for other in self.nodes.values_mut() {
            other.dependents.retain(|&d| d != id);
        }

        debug!(task = %id, "vertex removed");
        Some(node.payload)
    }

    /// Whether inserting `from -> to` would make the edge relation cyclic.
    ///
    /// Runs a depth-first search from every vertex over the live edges plus
    /// the candidate edge, which is treated as one extra neighbour of `from`
    /// rather than copied into the edge map. A neighbour that is still on the
    /// active DFS stack closes a cycle.
    pub fn would_create_cycle(&self, from: TaskId, to: TaskId) -> bool {
        let mut visited: HashSet<TaskId> = HashSet::with_capacity(self.order.len());
        let mut on_stack: HashSet<TaskId> = HashSet::new();
        // (vertex, index of the next neighbour to explore)
        let mut stack: Vec<(TaskId, usize)> = Vec::new();

        for &root in &self.order {
            if !visited.insert(root) {
                continue;
            }
            on_stack.insert(root);
            stack.push((root, 0));

            while let Some(frame) = stack.last_mut() {
                let (vertex, next) = *frame;

                match self.nth_neighbour(vertex, next, (from, to)) {
                    Some(neighbour) => {
                        frame.1 += 1;
                        if on_stack.contains(&neighbour) {
                            return true;
                        }
                        if visited.insert(neighbour) {
                            on_stack.insert(neighbour);
                            stack.push((neighbour, 0));
                        }
                    }
                    None => {
                        on_stack.remove(&vertex);
                        stack.pop();
                    }
                }
            }
        }

        false
    }

    /// The `index`-th outgoing neighbour of `vertex`, counting `extra` as one
    /// more edge after the live ones.
    fn nth_neighbour(&self, vertex: TaskId, index: usize, extra: (TaskId, TaskId)) -> Option<TaskId> {
        let live = self.dependents_of(vertex);
        match live.get(index) {
            Some(&neighbour) => Some(neighbour),
            None if index == live.len() && vertex == extra.0 => Some(extra.1),
            None => None,
        }
    }

    /// Every vertex exactly once, prerequisites before dependents.
    ///
    /// DFS post-order over unvisited roots in insertion order; the reversed
    /// finish order is the result. Acyclicity is guaranteed by `add_edge`, so
    /// nothing is re-validated here.
    pub fn topological_sort(&self) -> Vec<TaskId> {
        let mut visited: HashSet<TaskId> = HashSet::with_capacity(self.order.len());
        let mut finished: Vec<TaskId> = Vec::with_capacity(self.order.len());
        let mut stack: Vec<(TaskId, usize)> = Vec::new();

        for &root in &self.order {
            if !visited.insert(root) {
                continue;
            }
            stack.push((root, 0));

            while let Some(frame) = stack.last_mut() {
                let (vertex, next) = *frame;

                match self.dependents_of(vertex).get(next) {
                    Some(&neighbour) => {
                        frame.1 += 1;
                        if visited.insert(neighbour) {
                            stack.push((neighbour, 0));
                        }
                    }
                    None => {
                        stack.pop();
                        finished.push(vertex);
                    }
                }
            }
        }

        finished.reverse();
        finished
    }

    /// Vertices with in-degree zero, in insertion order.
    pub fn ready_tasks(&self) -> Vec<TaskId> {
        self.unblocked_by(|_| false)
    }

    /// Vertices that have no incoming edge from an unsatisfied vertex.
    ///
    /// Edges leaving a vertex for which `is_satisfied` returns `true` are
    /// ignored, so with a predicate that is always `false` this is exactly the
    /// in-degree-zero set. One pass over all edge lists.
    pub fn unblocked_by<F>(&self, is_satisfied: F) -> Vec<TaskId>
    where
        F: Fn(TaskId) -> bool,
    {
        let mut blocked: HashSet<TaskId> = HashSet::new();

        for (&id, node) in &self.nodes {
            if is_satisfied(id) {
                continue;
            }
            blocked.extend(node.dependents.iter().copied());
        }

        self.order
            .iter()
            .copied()
            .filter(|id| !blocked.contains(id))
            .collect()
    }

    /// Immediate prerequisites of `id` (every vertex with an edge into it).
    pub fn dependencies_of(&self, id: TaskId) -> Vec<TaskId> {
        self.order
            .iter()
            .copied()
            .filter(|v| {
                self.nodes
                    .get(v)
                    .is_some_and(|node| node.dependents.contains(&id))
            })
            .collect()
    }

    /// Immediate dependents of `id` (targets of its outgoing edges).
    pub fn dependents_of(&self, id: TaskId) -> &[TaskId] {
        self.nodes
            .get(&id)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn has_edge(&self, from: TaskId, to: TaskId) -> bool {
        self.dependents_of(from).contains(&to)
    }

    pub fn payload(&self, id: TaskId) -> Option<&P> {
        self.nodes.get(&id).map(|n| &n.payload)
    }

    /// Vertex ids in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = TaskId> {
        self.order.iter().copied()
    }

    /// All edges as `(from, to)`, grouped by source in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (TaskId, TaskId)> {
        self.order.iter().flat_map(move |&from| {
            self.dependents_of(from).iter().map(move |&to| (from, to))
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.order.len()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.dependents.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
