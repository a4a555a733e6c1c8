// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod queue;
pub mod types;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::dag::{Scheduler, SchedulerSnapshot};
use crate::engine::{ExecutionReport, Runtime, RuntimeOptions, SharedScheduler};
use crate::types::TaskId;

/// How a [`run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// `--dry-run`: the plan was printed, nothing executed.
    Planned,
    /// Every task in the plan completed.
    Completed,
    /// The run stopped (step limit) with tasks still open.
    Incomplete,
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - plan loading and validation
/// - scheduler construction (priority order from the plan or the CLI)
/// - a runtime that drains the ready queue and reports the execution order
pub async fn run(args: CliArgs) -> Result<RunStatus> {
    let plan = load_and_validate(&args.plan)
        .with_context(|| format!("loading plan from {:?}", args.plan))?;

    let mut scheduler = Scheduler::from_plan(&plan)?;
    if let Some(order) = args.priority_order {
        scheduler.set_priority_order(order);
    }

    let snapshot = scheduler.snapshot();
    print_plan(&snapshot);

    if args.dry_run {
        debug!("dry-run complete (no execution)");
        return Ok(RunStatus::Planned);
    }

    let shared = SharedScheduler::new(scheduler);
    let options = RuntimeOptions {
        max_steps: args.max_steps,
    };
    let report = Runtime::new(shared.clone(), options).run().await;

    let final_snapshot = shared.snapshot().await;
    print_report(&report, &final_snapshot);
    info!(
        executed = report.executed.len(),
        remaining = report.remaining.len(),
        "run finished"
    );

    if report.is_complete() {
        Ok(RunStatus::Completed)
    } else {
        Ok(RunStatus::Incomplete)
    }
}

/// Print tasks, dependencies, topological order and the current ready set.
fn print_plan(snapshot: &SchedulerSnapshot) {
    println!("taskdag plan");
    println!("  config.priority_order = {}", snapshot.priority_order);
    println!();

    println!("tasks ({}):", snapshot.tasks.len());
    for task in &snapshot.tasks {
        println!(
            "  - {} {} (priority {}, {})",
            task.id, task.name, task.priority, task.status
        );
        if let Some(deadline) = task.deadline {
            println!("      deadline: {deadline}");
        }
        if let Some(ref description) = task.description {
            println!("      description: {description}");
        }
        let after: Vec<&str> = snapshot
            .edges
            .iter()
            .filter(|(_, to)| *to == task.id)
            .map(|(from, _)| snapshot.name_of(*from))
            .collect();
        if !after.is_empty() {
            println!("      after: {after:?}");
        }
    }
    println!();

    println!("execution order: {}", join_names(snapshot, &snapshot.execution_order, " -> "));
    println!("ready: {}", join_names(snapshot, &snapshot.ready, ", "));
    match snapshot.next() {
        Some(id) => println!("next: {}", snapshot.name_of(id)),
        None => println!("next: none"),
    }
}

fn print_report(report: &ExecutionReport, snapshot: &SchedulerSnapshot) {
    println!();
    println!("executed ({}):", report.executed.len());
    for (index, task) in report.executed.iter().enumerate() {
        println!("  {}. {} (priority {})", index + 1, task.name, task.priority);
    }
    if !report.is_complete() {
        println!("not completed: {}", join_names(snapshot, &report.remaining, ", "));
    }
}

fn join_names(snapshot: &SchedulerSnapshot, ids: &[TaskId], separator: &str) -> String {
    if ids.is_empty() {
        return "none".to_string();
    }
    ids.iter()
        .map(|&id| snapshot.name_of(id))
        .collect::<Vec<_>>()
        .join(separator)
}
