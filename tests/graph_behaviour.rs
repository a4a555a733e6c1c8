// tests/graph_behaviour.rs

use std::collections::HashMap;

use taskdag::dag::DagGraph;
use taskdag::errors::TaskdagError;
use taskdag::types::TaskId;

fn id(raw: u64) -> TaskId {
    TaskId::new(raw)
}

/// Graph with vertices 1..=n (payload = vertex number).
fn graph_with(n: u64) -> DagGraph<u64> {
    let mut graph = DagGraph::new();
    for raw in 1..=n {
        graph.add_vertex(id(raw), raw).unwrap();
    }
    graph
}

fn position_map(order: &[TaskId]) -> HashMap<TaskId, usize> {
    order.iter().enumerate().map(|(i, &v)| (v, i)).collect()
}

#[test]
fn chain_sorts_in_dependency_order_and_only_head_is_ready() {
    let (x, y, z) = (id(1), id(2), id(3));
    let mut graph = graph_with(3);

    graph.add_edge(x, y).unwrap();
    graph.add_edge(y, z).unwrap();

    assert_eq!(graph.topological_sort(), vec![x, y, z]);
    assert_eq!(graph.ready_tasks(), vec![x]);
}

#[test]
fn closing_a_cycle_is_rejected_and_graph_is_unchanged() {
    let (x, y) = (id(1), id(2));
    let mut graph = graph_with(2);
    graph.add_edge(x, y).unwrap();

    let err = graph.add_edge(y, x).unwrap_err();
    assert!(matches!(
        err,
        TaskdagError::CycleDetected { from, to } if from == y && to == x
    ));

    assert_eq!(graph.edge_count(), 1);
    assert!(graph.has_edge(x, y));
    assert!(!graph.has_edge(y, x));
}

#[test]
fn longer_cycle_is_detected_through_intermediate_vertices() {
    let mut graph = graph_with(4);
    graph.add_edge(id(1), id(2)).unwrap();
    graph.add_edge(id(2), id(3)).unwrap();
    graph.add_edge(id(3), id(4)).unwrap();

    assert!(graph.would_create_cycle(id(4), id(1)));
    assert!(matches!(
        graph.add_edge(id(4), id(1)),
        Err(TaskdagError::CycleDetected { .. })
    ));
    // A shortcut in the same direction is fine.
    graph.add_edge(id(1), id(4)).unwrap();
    assert_eq!(graph.edge_count(), 4);
}

#[test]
fn self_edge_counts_as_cycle() {
    let mut graph = graph_with(1);
    assert!(matches!(
        graph.add_edge(id(1), id(1)),
        Err(TaskdagError::CycleDetected { .. })
    ));
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn removing_middle_vertex_strips_incoming_and_outgoing_edges() {
    let (x, y, z) = (id(1), id(2), id(3));
    let mut graph = graph_with(3);
    graph.add_edge(x, y).unwrap();
    graph.add_edge(y, z).unwrap();

    assert_eq!(graph.remove_vertex(y), Some(2));

    assert!(graph.dependents_of(x).is_empty());
    assert!(graph.dependencies_of(z).is_empty());
    assert_eq!(graph.edge_count(), 0);
    assert_eq!(graph.vertices().collect::<Vec<_>>(), vec![x, z]);
    assert_eq!(graph.ready_tasks(), vec![x, z]);
}

#[test]
fn unknown_endpoints_are_rejected() {
    let mut graph = graph_with(1);

    assert!(matches!(
        graph.add_edge(id(1), id(9)),
        Err(TaskdagError::UnknownVertex(v)) if v == id(9)
    ));
    assert!(matches!(
        graph.add_edge(id(9), id(1)),
        Err(TaskdagError::UnknownVertex(v)) if v == id(9)
    ));
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn duplicate_vertex_is_rejected_and_payload_kept() {
    let mut graph = graph_with(1);

    assert!(matches!(
        graph.add_vertex(id(1), 42),
        Err(TaskdagError::DuplicateVertex(v)) if v == id(1)
    ));
    assert_eq!(graph.payload(id(1)), Some(&1));
    assert_eq!(graph.vertex_count(), 1);
}

#[test]
fn repeated_edge_is_not_duplicated() {
    let mut graph = graph_with(2);
    graph.add_edge(id(1), id(2)).unwrap();
    graph.add_edge(id(1), id(2)).unwrap();

    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.dependents_of(id(1)), &[id(2)]);
}

#[test]
fn removing_absent_edges_and_vertices_is_a_no_op() {
    let mut graph = graph_with(2);
    graph.add_edge(id(1), id(2)).unwrap();

    assert!(!graph.remove_edge(id(2), id(1)));
    assert!(!graph.remove_edge(id(7), id(1)));
    assert_eq!(graph.remove_vertex(id(7)), None);

    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.vertex_count(), 2);

    assert!(graph.remove_edge(id(1), id(2)));
    assert!(!graph.remove_edge(id(1), id(2)));
    assert_eq!(graph.ready_tasks(), vec![id(1), id(2)]);
}

#[test]
fn dependencies_and_dependents_are_reported_in_insertion_order() {
    // 1 -> 3, 2 -> 3, 3 -> 4, 3 -> 5
    let mut graph = graph_with(5);
    graph.add_edge(id(2), id(3)).unwrap();
    graph.add_edge(id(1), id(3)).unwrap();
    graph.add_edge(id(3), id(5)).unwrap();
    graph.add_edge(id(3), id(4)).unwrap();

    assert_eq!(graph.dependencies_of(id(3)), vec![id(1), id(2)]);
    assert_eq!(graph.dependents_of(id(3)), &[id(5), id(4)]);
    assert!(graph.dependencies_of(id(1)).is_empty());
    assert!(graph.dependents_of(id(9)).is_empty());
}

#[test]
fn topological_sort_is_deterministic_and_respects_edges_in_diamond() {
    //     1
    //    / \
    //   2   3
    //    \ /
    //     4      5 (isolated)
    let mut graph = graph_with(5);
    graph.add_edge(id(1), id(2)).unwrap();
    graph.add_edge(id(1), id(3)).unwrap();
    graph.add_edge(id(2), id(4)).unwrap();
    graph.add_edge(id(3), id(4)).unwrap();

    let order = graph.topological_sort();
    assert_eq!(order, graph.topological_sort());
    assert_eq!(order, vec![id(5), id(1), id(3), id(2), id(4)]);

    let pos = position_map(&order);
    for (from, to) in graph.edges() {
        assert!(pos[&from] < pos[&to], "{from} must come before {to}");
    }
}

#[test]
fn roots_added_later_still_precede_their_dependents() {
    // Dependent inserted before its prerequisite.
    let mut graph = graph_with(2);
    graph.add_edge(id(2), id(1)).unwrap();

    assert_eq!(graph.topological_sort(), vec![id(2), id(1)]);
    assert_eq!(graph.ready_tasks(), vec![id(2)]);
}

#[test]
fn unblocked_by_ignores_edges_from_satisfied_vertices() {
    let mut graph = graph_with(3);
    graph.add_edge(id(1), id(2)).unwrap();
    graph.add_edge(id(2), id(3)).unwrap();

    let done = |v: TaskId| v == id(1);
    assert_eq!(graph.unblocked_by(done), vec![id(1), id(2)]);
    assert_eq!(graph.unblocked_by(|_| true), vec![id(1), id(2), id(3)]);
}

#[test]
fn empty_graph_has_empty_views() {
    let graph: DagGraph = DagGraph::new();
    assert!(graph.is_empty());
    assert!(graph.topological_sort().is_empty());
    assert!(graph.ready_tasks().is_empty());
}
