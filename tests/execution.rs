//! Tests for mirroring execution status records onto nodes.
mod common;
use common::*;
use serde_json::json;
use vines_core::execution::split_iteration;
use vines_core::graph::WORKFLOW_START;
use vines_core::prelude::*;

#[test]
fn test_split_iteration_suffix() {
    assert_eq!(split_iteration("http_abc__3"), ("http_abc", Some(3)));
    assert_eq!(split_iteration("http_abc"), ("http_abc", None));
    assert_eq!(split_iteration("http__x"), ("http__x", None));
    assert_eq!(split_iteration("__4"), ("__4", None));
    assert_eq!(split_iteration("loop__1__2"), ("loop__1", Some(2)));
    assert_eq!(split_iteration("a___3"), ("a_", Some(3)));
}

#[test]
fn test_status_helpers() {
    assert!(ExecutionStatus::Completed.is_terminal());
    assert!(ExecutionStatus::TimedOut.is_terminal());
    assert!(!ExecutionStatus::InProgress.is_terminal());
    assert!(ExecutionStatus::Scheduled.is_active());
    assert!(!ExecutionStatus::Default.is_active());
    assert_eq!(ExecutionStatus::default(), ExecutionStatus::Default);
}

#[test]
fn test_records_parse_from_engine_json() {
    let record: ExecutionTask = serde_json::from_value(json!({
        "referenceTaskName": "a",
        "workflowInstanceId": "run-1",
        "status": "IN_PROGRESS",
        "updateTime": 10,
    }))
    .expect("Failed to parse record");

    assert_eq!(record.task_reference_name, "a");
    assert_eq!(record.instance_id.as_deref(), Some("run-1"));
    assert_eq!(record.status, ExecutionStatus::InProgress);
    assert_eq!(record.last_activity(), Some(10));
}

#[test]
fn test_overlay_keeps_most_recent_record() {
    let mut overlay = ExecutionOverlay::new();

    assert!(overlay.ingest(ExecutionTask::new("a", ExecutionStatus::InProgress).with_update_time(5)));
    assert!(!overlay.ingest(ExecutionTask::new("a", ExecutionStatus::Scheduled).with_update_time(1)));
    assert_eq!(overlay.status("a", None), ExecutionStatus::InProgress);

    assert!(overlay.ingest(ExecutionTask::new("a", ExecutionStatus::Completed).with_update_time(9)));
    assert_eq!(overlay.status("a", None), ExecutionStatus::Completed);
    assert_eq!(overlay.status("unknown", None), ExecutionStatus::Default);
}

#[test]
fn test_overlay_prefers_later_record_without_timestamps() {
    let mut overlay = ExecutionOverlay::new();

    overlay.ingest(ExecutionTask::new("a", ExecutionStatus::Scheduled).with_update_time(100));
    let accepted = overlay.ingest(ExecutionTask::new("a", ExecutionStatus::Completed));

    assert!(accepted);
    assert_eq!(overlay.status("a", None), ExecutionStatus::Completed);
}

#[test]
fn test_overlay_maps_loop_iterations_to_task() {
    let mut overlay = ExecutionOverlay::new();

    overlay.ingest(ExecutionTask::new("body__1", ExecutionStatus::Completed));
    overlay.ingest(ExecutionTask::new("body__2", ExecutionStatus::InProgress));
    overlay.ingest(ExecutionTask::new("body__1", ExecutionStatus::Failed));

    assert_eq!(overlay.status("body", None), ExecutionStatus::InProgress);
    assert_eq!(overlay.len(), 1);
}

#[test]
fn test_overlay_is_keyed_by_instance() {
    let mut overlay = ExecutionOverlay::new();

    overlay.ingest(
        ExecutionTask::new("a", ExecutionStatus::Completed)
            .with_instance("run-1")
            .with_update_time(1),
    );
    overlay.ingest(
        ExecutionTask::new("a", ExecutionStatus::Failed)
            .with_instance("run-2")
            .with_update_time(2),
    );

    assert_eq!(overlay.status("a", Some("run-1")), ExecutionStatus::Completed);
    assert_eq!(overlay.status("a", Some("run-2")), ExecutionStatus::Failed);
    assert_eq!(overlay.status("a", Some("run-3")), ExecutionStatus::Default);
    assert_eq!(overlay.status("a", None), ExecutionStatus::Failed);
    assert_eq!(overlay.len(), 2);

    overlay.clear();
    assert!(overlay.is_empty());
}

#[test]
fn test_engine_mirrors_statuses_onto_nodes() {
    let mut core = create_core(vec![simple("a"), simple("b")]);
    assert_eq!(
        core.node("a").and_then(|n| n.execution_status),
        Some(ExecutionStatus::Default)
    );

    let mut feed = vec![
        ExecutionTask::new("a", ExecutionStatus::Completed).with_instance("run-1"),
        ExecutionTask::new("b", ExecutionStatus::InProgress).with_instance("run-1"),
    ];
    let count = core.refresh_execution(&mut feed);

    assert_eq!(count, 2);
    assert!(feed.is_empty());
    let a = core.node("a").expect("Failed to find node");
    assert_eq!(a.execution_status, Some(ExecutionStatus::Completed));
    assert_eq!(
        a.execution_task.as_ref().and_then(|t| t.instance_id.as_deref()),
        Some("run-1")
    );
    assert_eq!(
        core.node(WORKFLOW_START).and_then(|n| n.execution_status),
        Some(ExecutionStatus::Default)
    );
}

#[test]
fn test_statuses_survive_rebuilds() {
    let mut core = create_core(vec![simple("a")]);
    core.ingest_execution(ExecutionTask::new("a", ExecutionStatus::Failed));

    core.insert_task("a", simple("b"), false);

    assert_eq!(
        core.node("a").and_then(|n| n.execution_status),
        Some(ExecutionStatus::Failed)
    );
    assert_eq!(
        core.node("b").and_then(|n| n.execution_status),
        Some(ExecutionStatus::Default)
    );
}

#[test]
fn test_instance_selection_and_clear() {
    let mut core = create_core(vec![simple("a")]);
    core.ingest_execution(ExecutionTask::new("a", ExecutionStatus::Completed).with_instance("run-1"));
    core.ingest_execution(ExecutionTask::new("a", ExecutionStatus::Failed).with_instance("run-2"));

    core.set_execution_instance(Some("run-1".to_string()));
    assert_eq!(
        core.node("a").and_then(|n| n.execution_status),
        Some(ExecutionStatus::Completed)
    );

    core.clear_execution();
    assert_eq!(
        core.node("a").and_then(|n| n.execution_status),
        Some(ExecutionStatus::Default)
    );
    assert!(core.overlay().is_empty());
}

#[test]
fn test_stale_records_for_removed_tasks_are_harmless() {
    let mut core = create_core(vec![simple("a"), simple("b")]);
    core.ingest_execution(ExecutionTask::new("b", ExecutionStatus::Completed));

    core.remove_node("b");

    assert!(core.node("b").is_none());
    assert_eq!(core.overlay().status("b", None), ExecutionStatus::Completed);
}
