// tests/shared_runtime.rs

mod common;
use crate::common::fixtures::{assert_queue_matches_ready, diamond};
use crate::common::{init_tracing, with_timeout};

use std::collections::HashSet;
use std::error::Error;

use taskdag::dag::{Scheduler, TaskSpec};
use taskdag::engine::{Runtime, RuntimeOptions, SharedScheduler};
use taskdag::errors::TaskdagError;
use taskdag::types::{PriorityOrder, TaskId, TaskStatus};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn runtime_drains_queue_in_priority_and_dependency_order() -> TestResult {
    init_tracing();
    let (scheduler, d) = diamond(PriorityOrder::UrgentFirst);
    let ids = d.ids();
    let shared = SharedScheduler::new(scheduler);

    let report = with_timeout(Runtime::new(shared.clone(), RuntimeOptions::default()).run()).await;

    assert_eq!(report.executed_ids(), vec![ids[0], ids[1], ids[2], ids[3]]);
    assert!(report.is_complete());
    assert!(report.executed.iter().all(|t| t.status == TaskStatus::Completed));

    let snapshot = shared.snapshot().await;
    assert!(snapshot.queue.is_empty());
    assert!(snapshot.ready.is_empty());
    assert_eq!(snapshot.next(), None);
    Ok(())
}

#[tokio::test]
async fn runtime_stops_at_step_limit() -> TestResult {
    init_tracing();
    let (scheduler, d) = diamond(PriorityOrder::UrgentFirst);
    let ids = d.ids();
    let shared = SharedScheduler::new(scheduler);

    let options = RuntimeOptions { max_steps: Some(2) };
    let report = with_timeout(Runtime::new(shared.clone(), options).run()).await;

    assert_eq!(report.executed_ids(), vec![ids[0], ids[1]]);
    assert!(!report.is_complete());
    assert_eq!(report.remaining, vec![ids[2], ids[3]]);

    // right is still queued; sink still waits on it.
    assert_eq!(shared.status_of(ids[2]).await, Some(TaskStatus::Pending));
    let snapshot = shared.snapshot().await;
    assert_eq!(snapshot.queue, vec![ids[2]]);
    assert_eq!(snapshot.name_of(ids[3]), "sink");

    // A second run picks up where the first stopped.
    let rest = with_timeout(Runtime::new(shared, RuntimeOptions::default()).run()).await;
    assert_eq!(rest.executed_ids(), vec![ids[2], ids[3]]);
    assert!(rest.is_complete());
    Ok(())
}

#[tokio::test]
async fn empty_scheduler_run_is_a_noop() {
    let shared = SharedScheduler::new(Scheduler::default());
    let report = with_timeout(Runtime::new(shared.clone(), RuntimeOptions::default()).run()).await;

    assert!(report.executed.is_empty());
    assert!(report.is_complete());
    assert!(shared.execute_next().await.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submissions_get_unique_ids_and_are_all_queued() -> TestResult {
    init_tracing();
    let shared = SharedScheduler::new(Scheduler::default());

    let mut handles = Vec::new();
    for worker in 0..8u32 {
        let shared = shared.clone();
        handles.push(tokio::spawn(async move {
            let mut ids = Vec::new();
            for n in 0..5u32 {
                let spec = TaskSpec::new(format!("w{worker}-t{n}"), 1 + (worker + n) % 4);
                ids.push(shared.add_task(spec).await?);
            }
            Ok::<_, TaskdagError>(ids)
        }));
    }

    let mut all: Vec<TaskId> = Vec::new();
    for handle in handles {
        all.extend(with_timeout(handle).await??);
    }

    let unique: HashSet<TaskId> = all.iter().copied().collect();
    assert_eq!(unique.len(), 40);

    let snapshot = shared.snapshot().await;
    assert_eq!(snapshot.tasks.len(), 40);
    assert_eq!(snapshot.ready.len(), 40);
    assert_eq!(snapshot.queue.len(), 40);

    // Queue order is non-increasing in priority.
    let priorities: Vec<u32> = snapshot
        .queue
        .iter()
        .map(|&id| snapshot.task(id).map(|t| t.priority).unwrap_or_default())
        .collect();
    assert!(priorities.windows(2).all(|w| w[0] >= w[1]));
    Ok(())
}

#[tokio::test]
async fn handle_operations_share_one_scheduler() -> TestResult {
    init_tracing();
    let shared = SharedScheduler::new(Scheduler::default());
    let other = shared.clone();

    let build = shared.add_task(TaskSpec::new("build", 2)).await?;
    let test = other.add_task(TaskSpec::new("test", 4)).await?;
    other.add_dependency(build, test).await?;

    other.mark_in_progress(build).await?;
    assert_eq!(shared.status_of(build).await, Some(TaskStatus::InProgress));

    // In-progress tasks stay queued and are executed like any other.
    let step = shared.step_execute().await;
    assert_eq!(step.executed.map(|t| t.id), Some(build));
    assert_eq!(step.newly_ready, vec![test]);

    assert!(shared.add_dependency(test, build).await.is_err());

    let removed = other.delete_task(test).await;
    assert_eq!(removed.map(|t| t.name), Some("test".to_string()));
    assert!(shared.execute_next().await.is_none());

    let count = shared.with(|s| s.task_count()).await;
    assert_eq!(count, 1);
    Ok(())
}

#[tokio::test]
async fn tasks_added_between_runs_are_picked_up() -> TestResult {
    let shared = SharedScheduler::new(Scheduler::default());
    let first = shared.add_task(TaskSpec::new("first", 1)).await?;

    let report = with_timeout(Runtime::new(shared.clone(), RuntimeOptions::default()).run()).await;
    assert_eq!(report.executed_ids(), vec![first]);

    let (late, after_late) = shared
        .with(|s| -> taskdag::errors::Result<(TaskId, TaskId)> {
            let late = s.add_task(TaskSpec::new("late", 1))?;
            let after_late = s.add_task(TaskSpec::new("after-late", 4))?;
            s.add_dependency(late, after_late)?;
            Ok((late, after_late))
        })
        .await?;

    let report = with_timeout(Runtime::new(shared, RuntimeOptions::default()).run()).await;
    assert_eq!(report.executed_ids(), vec![late, after_late]);
    assert!(report.is_complete());
    Ok(())
}

#[tokio::test]
async fn handle_exposes_the_full_scheduler_surface() -> TestResult {
    init_tracing();
    let (scheduler, d) = diamond(PriorityOrder::UrgentFirst);
    let shared = SharedScheduler::new(scheduler);

    assert_eq!(shared.ready_tasks().await, vec![d.root]);
    assert_eq!(
        shared.topological_order().await,
        vec![d.root, d.right, d.left, d.sink]
    );
    assert_eq!(shared.peek_next().await.map(|t| t.id), Some(d.root));

    let step = shared.complete_task(d.root).await?;
    assert_eq!(step.newly_ready, vec![d.left, d.right]);
    assert_eq!(shared.queue_order().await, vec![d.left, d.right]);

    shared.set_priority_order(PriorityOrder::LowestFirst).await;
    assert_eq!(shared.queue_order().await, vec![d.right, d.left]);

    assert!(shared.remove_dependency(d.left, d.sink).await);
    assert!(!shared.remove_dependency(d.left, d.sink).await);
    assert!(matches!(
        shared.complete_task(d.sink).await,
        Err(TaskdagError::PrerequisitesIncomplete(_))
    ));
    assert!(matches!(
        shared.mark_in_progress(d.sink).await,
        Err(TaskdagError::PrerequisitesIncomplete(_))
    ));

    assert_eq!(shared.task(d.sink).await.map(|t| t.name), Some("sink".to_string()));
    assert!(shared.task(TaskId::new(99)).await.is_none());
    shared.with(|s| assert_queue_matches_ready(s)).await;
    Ok(())
}
