//! End-to-end tests: tool catalog to task factory to engine and back to JSON.
mod common;
use common::*;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use vines_core::graph::WORKFLOW_END;
use vines_core::prelude::*;
use vines_core::task::tree;

#[test]
fn test_end_to_end_editing_session() {
    let mut factory = TaskFactory::builder(create_catalog())
        .with_id_source(Box::new(IdGenerator::seeded(11)))
        .build();
    let mut core = VinesCore::builder("wf-e2e")
        .with_tools(Box::new(create_catalog()))
        .with_id_source(Box::new(IdGenerator::seeded(12)))
        .build()
        .expect("Failed to build engine");

    let fetch = factory.create("http", None).expect("Failed to create task");
    let fetch_ref = fetch.task_reference_name.clone();
    core.insert_task(WORKFLOW_END, fetch, false);

    let repeat = factory.create("loop", None).expect("Failed to create loop");
    let repeat_ref = repeat.task_reference_name.clone();
    let placeholder = repeat.branches()[0].1[0].task_reference_name.clone();
    core.insert_task(&fetch_ref, repeat, false);

    let inner = factory
        .create(
            "http",
            Some(&as_object(json!({ "inputParameters": { "url": "https://inner" } }))),
        )
        .expect("Failed to create task");
    let inner_ref = inner.task_reference_name.clone();
    let outcome = core.insert_task(&placeholder, inner, false);
    assert_eq!(outcome.placement, Placement::ReplacedPlaceholder);

    let ids: Vec<&str> = core.nodes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["workflow_start", fetch_ref.as_str(), repeat_ref.as_str(), inner_ref.as_str(), WORKFLOW_END]
    );
    assert_eq!(
        core.node(&repeat_ref).and_then(|n| n.parent_id.as_deref()),
        None
    );
    assert_eq!(
        core.node(&inner_ref).and_then(|n| n.parent_id.as_deref()),
        Some(repeat_ref.as_str())
    );

    core.ingest_execution(ExecutionTask::new(format!("{}__2", inner_ref), ExecutionStatus::InProgress));
    assert_eq!(
        core.node(&inner_ref).and_then(|n| n.execution_status),
        Some(ExecutionStatus::InProgress)
    );

    core.remove_node(&inner_ref).expect("Failed to remove node");
    let body = core.graph().children(&repeat_ref);
    assert_eq!(body.len(), 1);
    assert!(body[0].is_fake());

    let data = &core.node(&fetch_ref).expect("Failed to find node").custom_data;
    assert_eq!(data["name"], "http");
    assert_eq!(data["taskType"], "SIMPLE");
}

#[test]
fn test_open_from_json_and_round_trip() {
    let tasks_json = json!([
        { "name": "http", "taskReferenceName": "a", "type": "SIMPLE", "inputParameters": { "url": "x" } },
        {
            "name": "switch",
            "taskReferenceName": "s",
            "type": "SWITCH",
            "expression": "$.mode",
            "decisionCases": { "fast": [], "slow": [{ "name": "http", "taskReferenceName": "b", "type": "SIMPLE" }] }
        },
        { "name": "join", "taskReferenceName": "j", "type": "JOIN", "joinOn": ["b"] }
    ])
    .to_string();

    let core = VinesCore::builder("wf-json")
        .with_tasks_json(&tasks_json)
        .expect("Failed to parse tasks")
        .with_id_source(seeded_ids())
        .build()
        .expect("Failed to build engine");

    let exported = serde_json::to_value(core.tasks()).expect("Failed to serialize tasks");
    let cases = exported[1]["decisionCases"]
        .as_object()
        .expect("Failed to read cases");
    assert_eq!(cases.keys().collect::<Vec<_>>(), vec!["fast", "slow"]);
    assert_eq!(cases["fast"].as_array().map(Vec::len), Some(1));
    assert_eq!(cases["fast"][0]["name"], "fake_node");
    assert_eq!(exported[2]["joinOn"], json!(["b"]));

    let reopened = VinesCore::builder("wf-json-2")
        .with_tasks_json(&exported.to_string())
        .expect("Failed to parse tasks")
        .build()
        .expect("Failed to build engine");
    assert_eq!(reopened.tasks(), core.tasks());
    assert_eq!(reopened.nodes().len(), core.nodes().len());
}

#[test]
fn test_open_rejects_invalid_task_lists() {
    let duplicate = VinesCore::builder("wf")
        .with_tasks(vec![simple("a"), do_while("l", vec![simple("a")])])
        .build();
    assert!(matches!(duplicate, Err(WorkflowError::DuplicateReference(ref r)) if r == "a"));

    let reserved = VinesCore::builder("wf")
        .with_tasks(vec![simple("workflow_end")])
        .build();
    assert!(matches!(reserved, Err(WorkflowError::ReservedReference(_))));

    let malformed = VinesCore::builder("wf").with_tasks_json("[{\"name\": 1}]");
    assert!(matches!(malformed, Err(WorkflowError::JsonParseError(_))));
}

#[test]
fn test_layout_change_rebuilds_graph() {
    let mut core = create_core(vec![simple("a"), simple("b")]);
    let vertical = core.boundary();

    core.set_layout(LayoutConfig::default().with_direction(RenderDirection::Horizontal));
    let horizontal = core.boundary();

    assert_eq!(vertical.width(), horizontal.height());
    assert_eq!(vertical.height(), horizontal.width());
    assert_eq!(core.graph().direction(), RenderDirection::Horizontal);
}

#[test]
fn test_persist_without_sink_reports_nothing() {
    let mut core = create_core(vec![simple("a")]);
    assert!(core.persist().is_empty());
    assert_eq!(core.snapshot().tasks.len(), 1);
}

#[test]
fn test_persist_hands_over_tasks_and_variables() {
    let snapshots = Rc::new(RefCell::new(Vec::new()));
    let mut core = VinesCore::builder("wf-save")
        .with_tasks(create_nested_workflow())
        .with_id_source(seeded_ids())
        .with_persistence(Box::new(RecordingSink {
            snapshots: Rc::clone(&snapshots),
            issues: Vec::new(),
        }))
        .build()
        .expect("Failed to build engine");
    core.set_variables(vec![PropertyDef::new("region", PropertyType::String)]);

    let issues = core.persist().len();

    assert_eq!(issues, 0);
    let recorded = snapshots.borrow();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].tasks, core.tasks());
    assert_eq!(recorded[0].variables[0].name, "region");
    let value = serde_json::to_value(&recorded[0]).expect("Failed to serialize snapshot");
    assert_eq!(value["workflowId"], "wf-save");
}

#[test]
fn test_workflow_registry_lifecycle() {
    let mut registry = WorkflowRegistry::new();
    assert!(registry.is_empty());

    registry.open(
        VinesCore::builder("wf-b")
            .with_tasks(vec![simple("a")])
            .build()
            .expect("Failed to build engine"),
    );
    let opened = registry.open(create_core(vec![simple("x")]));
    opened.insert_task(WORKFLOW_END, simple("y"), false);

    assert_eq!(registry.ids(), vec!["wf-b", "wf-test"]);
    assert_eq!(registry.get("wf-test").map(|c| c.tasks().len()), Some(2));

    registry
        .get_mut("wf-b")
        .expect("Failed to find engine")
        .remove_node("a");
    assert_eq!(registry.get("wf-b").map(|c| c.tasks().len()), Some(0));

    registry.open(create_core(vec![]));
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.get("wf-test").map(|c| c.tasks().len()), Some(0));

    let closed = registry.close("wf-b").expect("Failed to close engine");
    assert_eq!(closed.workflow_id(), "wf-b");
    assert!(!registry.contains("wf-b"));
    assert!(registry.close("wf-b").is_none());
}

#[test]
fn test_every_flattened_task_has_a_node() {
    let core = create_core(create_nested_workflow());
    for task in tree::flatten(core.tasks()) {
        assert!(core.graph().contains(&task.task_reference_name));
    }
    assert_eq!(core.nodes().len(), tree::flatten(core.tasks()).len() + 2);
}
