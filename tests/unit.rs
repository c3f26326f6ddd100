//! Unit tests for ids, value transforms, boundaries and the task model.
mod common;
use common::*;
use serde_json::{Map, json};
use vines_core::id::{ALPHABET, ID_LENGTH, is_generated_id};
use vines_core::prelude::*;
use vines_core::task::tree;
use vines_core::transform::is_variable_reference;

#[test]
fn test_generated_ids_use_alphabet() {
    for _ in 0..50 {
        let id = generate_id();
        assert_eq!(id.len(), ID_LENGTH);
        assert!(id.bytes().all(|b| ALPHABET.contains(&b)), "bad id {}", id);
        assert!(is_generated_id(&id));
    }
    assert!(!is_generated_id("aeiou123"));
    assert!(!is_generated_id("BCDF"));
}

#[test]
fn test_id_generator_never_repeats() {
    let mut ids = IdGenerator::seeded(42);
    let issued: std::collections::HashSet<String> = (0..2000).map(|_| ids.next_id()).collect();
    assert_eq!(issued.len(), 2000);
}

#[test]
fn test_seeded_generators_agree() {
    let mut a = IdGenerator::seeded(3);
    let mut b = IdGenerator::seeded(3);
    for _ in 0..10 {
        assert_eq!(a.next_id(), b.next_id());
    }
}

#[test]
fn test_coercion_examples() {
    let properties = vec![
        PropertyDef::new("count", PropertyType::Number),
        PropertyDef::new("tags", PropertyType::String).multiple(),
        PropertyDef::new("enabled", PropertyType::Boolean),
        PropertyDef::new("label", PropertyType::String),
    ];
    let mut params = as_object(json!({
        "count": "5",
        "tags": "a, b",
        "enabled": "true",
        "label": "   ",
    }));

    auto_type_transform(&properties, &mut params);

    assert_eq!(params["count"], json!(5));
    assert_eq!(params["tags"], json!(["a", "b"]));
    assert_eq!(params["enabled"], json!(true));
    assert_eq!(params["label"], json!(null));
}

#[test]
fn test_coercion_fills_missing_values() {
    let properties = vec![
        PropertyDef::new("url", PropertyType::String),
        PropertyDef::new("flag", PropertyType::Boolean),
        PropertyDef::new("list", PropertyType::Number).multiple(),
        PropertyDef::new("limit", PropertyType::Number).with_default(json!("10")),
        PropertyDef::new("body", PropertyType::JsonObject),
    ];
    let mut params = Map::new();

    auto_type_transform(&properties, &mut params);

    assert_eq!(params["url"], json!(null));
    assert_eq!(params["flag"], json!(false));
    assert_eq!(params["list"], json!([]));
    assert_eq!(params["limit"], json!(10));
    assert!(!params.contains_key("body"));
}

#[test]
fn test_coercion_keeps_variable_references() {
    let properties = vec![
        PropertyDef::new("count", PropertyType::Number),
        PropertyDef::new("tags", PropertyType::String).multiple(),
    ];
    let mut params = as_object(json!({
        "count": "${workflow.input.count}",
        "tags": "${previous.output.tags}",
    }));

    auto_type_transform(&properties, &mut params);

    assert_eq!(params["count"], json!("${workflow.input.count}"));
    assert_eq!(params["tags"], json!("${previous.output.tags}"));
}

#[test]
fn test_variable_reference_detection() {
    assert!(is_variable_reference("${a.b}"));
    assert!(is_variable_reference("prefix ${workflow.input.x} suffix"));
    assert!(!is_variable_reference("${}"));
    assert!(!is_variable_reference("${ }"));
    assert!(!is_variable_reference("a ${x"));
    assert!(!is_variable_reference("plain"));
}

#[test]
fn test_defaults_are_coerced_like_user_values() {
    let properties = vec![
        PropertyDef::new("padded", PropertyType::String).with_default(json!(" x ")),
        PropertyDef::new("blank", PropertyType::String).with_default(json!("")),
        PropertyDef::new("ports", PropertyType::Number)
            .multiple()
            .with_default(json!("80, 443")),
    ];
    let mut params = Map::new();

    auto_type_transform(&properties, &mut params);

    assert_eq!(params["padded"], json!("x"));
    assert_eq!(params["blank"], json!(null));
    assert_eq!(params["ports"], json!([80, 443]));
}

#[test]
fn test_coercion_is_idempotent() {
    let properties = vec![
        PropertyDef::new("count", PropertyType::Number).with_default(json!("2")),
        PropertyDef::new("ids", PropertyType::Number).multiple(),
        PropertyDef::new("on", PropertyType::Boolean),
        PropertyDef::new("name", PropertyType::String),
    ];
    let mut params = as_object(json!({ "ids": "1, 2,3", "name": " x " }));

    auto_type_transform(&properties, &mut params);
    let once = params.clone();
    auto_type_transform(&properties, &mut params);

    assert_eq!(params, once);
    assert_eq!(params["ids"], json!([1, 2, 3]));
    assert_eq!(params["name"], json!("x"));
}

#[test]
fn test_coercion_leaves_unparseable_values() {
    let properties = vec![
        PropertyDef::new("count", PropertyType::Number),
        PropertyDef::new("on", PropertyType::Boolean),
    ];
    let mut params = as_object(json!({ "count": "many", "on": "yes" }));

    auto_type_transform(&properties, &mut params);

    assert_eq!(params["count"], json!("many"));
    assert_eq!(params["on"], json!("yes"));
}

#[test]
fn test_coercion_on_task() {
    let properties = vec![PropertyDef::new("retries", PropertyType::Number)];
    let mut task = simple("t1");
    task.input_parameters.insert("retries".to_string(), json!("4"));

    let task = auto_type_transform(&properties, &mut task);

    assert_eq!(task.input_parameters["retries"], json!(4));
}

#[test]
fn test_replace_built_in_value_in_nested_strings() {
    let mut value = json!({
        "a": "{{$self}}",
        "b": ["x-{{$self}}", 1, true, null],
        "c": { "{{$self}}": "keep key" },
    });
    let replacements = vec![("{{$self}}".to_string(), "node_1".to_string())];

    replace_built_in_value(&mut value, &replacements);

    assert_eq!(
        value,
        json!({
            "a": "node_1",
            "b": ["x-node_1", 1, true, null],
            "c": { "{{$self}}": "keep key" },
        })
    );
}

#[test]
fn test_replacements_apply_in_order() {
    let mut value = json!("A");
    let replacements = vec![
        ("A".to_string(), "B".to_string()),
        ("B".to_string(), "C".to_string()),
    ];

    replace_built_in_value(&mut value, &replacements);

    assert_eq!(value, json!("C"));
}

#[test]
fn test_built_in_bindings_reach_nested_tasks() {
    let mut task = do_while("outer", vec![simple("inner")]);
    if let TaskKind::DoWhile { loop_over, .. } = &mut task.kind {
        loop_over[0]
            .input_parameters
            .insert("owner".to_string(), json!("{{$self}}"));
    }

    BuiltInBindings::new()
        .bind(BuiltInValue::SelfReference, "outer")
        .apply(&mut task);

    let inner = tree::find(std::slice::from_ref(&task), "inner").expect("Failed to find inner");
    assert_eq!(inner.input_parameters["owner"], json!("outer"));
}

#[test]
fn test_boundary_of_nothing_is_empty() {
    let boundary = get_boundary(std::iter::empty::<&VinesNode>());
    assert!(boundary.is_empty());
    assert_eq!(boundary, Boundary::EMPTY);
    assert_eq!(boundary.width(), 0.0);
    assert!(boundary.center().is_none());
}

#[test]
fn test_boundary_covers_all_nodes() {
    let core = create_core(vec![simple("a"), simple("b")]);
    let boundary = get_boundary(core.nodes());

    assert!(!boundary.is_empty());
    for node in core.nodes() {
        assert!(boundary.contains(&node.boundary()), "{} outside", node.id);
    }
    let single = get_boundary(core.node("a"));
    assert_eq!(single, core.node("a").expect("Failed to find node").boundary());
}

#[test]
fn test_task_json_shape() {
    let task = switch("s1", vec![("zeta", vec![simple("z")]), ("alpha", vec![])]);
    let value = serde_json::to_value(&task).expect("Failed to serialize task");

    assert_eq!(value["type"], json!("SWITCH"));
    assert_eq!(value["taskReferenceName"], json!("s1"));
    assert_eq!(value["evaluatorType"], json!("javascript"));
    let keys: Vec<&String> = value["decisionCases"]
        .as_object()
        .expect("Failed to read cases")
        .keys()
        .collect();
    assert_eq!(keys, vec!["zeta", "alpha"]);

    let parsed: Task = serde_json::from_value(value).expect("Failed to parse task");
    assert_eq!(parsed, task);
}

#[test]
fn test_task_json_defaults() {
    let task: Task = serde_json::from_value(json!({
        "name": "loop",
        "taskReferenceName": "l1",
        "type": "DO_WHILE",
    }))
    .expect("Failed to parse task");

    assert_eq!(task.task_type(), TaskType::DoWhile);
    assert!(task.input_parameters.is_empty());
    assert_eq!(task.branches().len(), 1);
    assert!(task.branches()[0].1.is_empty());
}

#[test]
fn test_branch_labels() {
    let task = fork("f", vec![vec![simple("x")], vec![simple("y")]]);
    let labels: Vec<String> = task.branches().iter().map(|(k, _)| k.to_string()).collect();
    assert_eq!(labels, vec!["fork:0", "fork:1"]);

    let task = switch("s", vec![("on", vec![])]);
    assert_eq!(task.branches()[0].0.to_string(), "case:on");
    assert_eq!(BranchKey::LoopOver.to_string(), "loopOver");
    assert_eq!(BranchKey::SubWorkflow.to_string(), "subWorkflow");
}

#[test]
fn test_tree_helpers() {
    let tasks = create_nested_workflow();

    let order: Vec<&str> = tree::flatten(&tasks)
        .iter()
        .map(|t| t.task_reference_name.as_str())
        .collect();
    assert_eq!(
        order,
        vec!["a", "loop_1", "b", "switch_1", "c", "d", "fork_1", "e", "f", "join_1"]
    );
    assert_eq!(
        tree::parent_of(&tasks, "e").map(|t| t.task_reference_name.as_str()),
        Some("fork_1")
    );
    assert!(tree::parent_of(&tasks, "a").is_none());
    assert!(tree::duplicate_references(&tasks).is_empty());

    let mut duplicated = tasks.clone();
    duplicated.push(simple("c"));
    assert_eq!(tree::duplicate_references(&duplicated), vec!["c".to_string()]);
}

#[test]
fn test_fill_empty_branches_adds_defaults() {
    let mut tasks = vec![
        switch("s", vec![]),
        fork("f", vec![]),
        do_while("l", vec![]),
        sub_workflow("sw", Some(vec![])),
    ];
    let mut counter = 0;
    let filled = tree::fill_empty_branches(&mut tasks, &mut |_: &str, _: &BranchKey| {
        counter += 1;
        Task::fake(format!("fake_node_{}", counter))
    });

    assert_eq!(filled, 5);
    let TaskKind::Switch { decision_cases, .. } = &tasks[0].kind else {
        panic!("expected a switch");
    };
    assert_eq!(decision_cases.keys().collect::<Vec<_>>(), vec!["switchTrue", "switchFalse"]);
    assert!(tasks[3].branches()[0].1.is_empty());
}

#[test]
fn test_layout_config_from_json() {
    let config = LayoutConfig::from_json(r#"{ "nodeWidth": 120, "direction": "horizontal" }"#)
        .expect("Failed to parse layout");
    assert_eq!(config.node_width, 120.0);
    assert_eq!(config.node_height, LayoutConfig::default().node_height);
    assert_eq!(config.direction, RenderDirection::Horizontal);
}
