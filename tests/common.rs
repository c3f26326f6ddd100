//! Common test utilities for building tools, workflows and engines.
use serde_json::{Map, Value, json};
use vines_core::prelude::*;
use vines_core::task::SubWorkflowParam;

/// A catalog with one tool per task type plus an HTTP tool with typed inputs.
#[allow(dead_code)]
pub fn create_catalog() -> ToolCatalog {
    let mut catalog = ToolCatalog::new();
    catalog
        .register(
            ToolDefinition::new("http", TaskType::Simple)
                .with_input(PropertyDef::new("url", PropertyType::String))
                .with_input(PropertyDef::new("retries", PropertyType::Number).with_default(json!("3")))
                .with_input(PropertyDef::new("verbose", PropertyType::Boolean))
                .with_input(PropertyDef::new("headers", PropertyType::String).multiple()),
        )
        .register(ToolDefinition::new("loop", TaskType::DoWhile))
        .register(ToolDefinition::new("switch", TaskType::Switch))
        .register(ToolDefinition::new("fork", TaskType::ForkJoin))
        .register(ToolDefinition::new("join", TaskType::Join))
        .register(ToolDefinition::new("child_flow", TaskType::SubWorkflow));
    catalog
}

/// An engine id source with reproducible output.
#[allow(dead_code)]
pub fn seeded_ids() -> Box<dyn IdSource> {
    Box::new(IdGenerator::seeded(7))
}

#[allow(dead_code)]
pub fn simple(reference: &str) -> Task {
    Task::simple("http", reference)
}

#[allow(dead_code)]
pub fn do_while(reference: &str, body: Vec<Task>) -> Task {
    Task::with_kind(
        "loop",
        reference,
        TaskKind::DoWhile {
            loop_condition: "true".to_string(),
            loop_over: body,
        },
    )
}

#[allow(dead_code)]
pub fn switch(reference: &str, cases: Vec<(&str, Vec<Task>)>) -> Task {
    Task::with_kind(
        "switch",
        reference,
        TaskKind::Switch {
            evaluator_type: "javascript".to_string(),
            expression: "$.value".to_string(),
            decision_cases: cases.into_iter().collect(),
        },
    )
}

#[allow(dead_code)]
pub fn fork(reference: &str, forks: Vec<Vec<Task>>) -> Task {
    Task::with_kind("fork", reference, TaskKind::ForkJoin { fork_tasks: forks })
}

#[allow(dead_code)]
pub fn join(reference: &str, join_on: &[&str]) -> Task {
    Task::with_kind(
        "join",
        reference,
        TaskKind::Join {
            join_on: join_on.iter().map(|r| r.to_string()).collect(),
        },
    )
}

#[allow(dead_code)]
pub fn sub_workflow(reference: &str, tasks: Option<Vec<Task>>) -> Task {
    Task::with_kind(
        "child_flow",
        reference,
        TaskKind::SubWorkflow {
            sub_workflow_param: SubWorkflowParam {
                name: "child".to_string(),
                version: Some(1),
                workflow_definition: tasks
                    .map(|tasks| vines_core::task::SubWorkflowDefinition { tasks }),
            },
        },
    )
}

/// `a`, a loop around `b`, a two-way switch (`c` / `d`), a fork (`e` / `f`)
/// and a join on both fork branches.
#[allow(dead_code)]
pub fn create_nested_workflow() -> Vec<Task> {
    vec![
        simple("a"),
        do_while("loop_1", vec![simple("b")]),
        switch(
            "switch_1",
            vec![("yes", vec![simple("c")]), ("no", vec![simple("d")])],
        ),
        fork("fork_1", vec![vec![simple("e")], vec![simple("f")]]),
        join("join_1", &["e", "f"]),
    ]
}

#[allow(dead_code)]
pub fn create_core(tasks: Vec<Task>) -> VinesCore {
    VinesCore::builder("wf-test")
        .with_tasks(tasks)
        .with_id_source(seeded_ids())
        .build()
        .expect("Failed to build engine")
}

#[allow(dead_code)]
pub fn as_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}

/// Sink that records every snapshot and answers with a fixed issue list.
#[allow(dead_code)]
pub struct RecordingSink {
    pub snapshots: std::rc::Rc<std::cell::RefCell<Vec<WorkflowSnapshot>>>,
    pub issues: Vec<ValidationIssue>,
}

impl PersistenceSink for RecordingSink {
    fn persist(&mut self, snapshot: &WorkflowSnapshot) -> Vec<ValidationIssue> {
        self.snapshots.borrow_mut().push(snapshot.clone());
        self.issues.clone()
    }
}
