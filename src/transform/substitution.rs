use crate::task::{Task, TaskKind};
use serde_json::Value;

/// Replaces every occurrence of each key in `replacements` inside every string
/// leaf of `value`. Pairs apply in order. Object keys, numbers, booleans and
/// nulls are untouched, so the structure comes back with the same shape.
pub fn replace_built_in_value(value: &mut Value, replacements: &[(String, String)]) {
    match value {
        Value::String(s) => replace_in_string(s, replacements),
        Value::Array(items) => {
            for item in items {
                replace_built_in_value(item, replacements);
            }
        }
        Value::Object(map) => {
            for item in map.values_mut() {
                replace_built_in_value(item, replacements);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

fn replace_in_string(s: &mut String, replacements: &[(String, String)]) {
    for (from, to) in replacements {
        if !from.is_empty() && s.contains(from.as_str()) {
            *s = s.replace(from.as_str(), to);
        }
    }
}

/// Placeholders a preset may use for values only known after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltInValue {
    /// The reference name of the task being created.
    SelfReference,
}

impl BuiltInValue {
    pub const fn token(&self) -> &'static str {
        match self {
            BuiltInValue::SelfReference => "{{$self}}",
        }
    }
}

/// Concrete values for built-in placeholders, resolved once per task.
#[derive(Debug, Clone, Default)]
pub struct BuiltInBindings {
    entries: Vec<(BuiltInValue, String)>,
}

impl BuiltInBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, placeholder: BuiltInValue, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.entries.iter_mut().find(|(p, _)| *p == placeholder) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((placeholder, value)),
        }
        self
    }

    /// The `(token, value)` pairs handed to [`replace_built_in_value`].
    pub fn replacements(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(placeholder, value)| (placeholder.token().to_string(), value.clone()))
            .collect()
    }

    /// Resolves placeholders across the whole task, nested tasks included.
    pub fn apply(&self, task: &mut Task) {
        let replacements = self.replacements();
        bind_task(task, &replacements);
    }
}

fn bind_task(task: &mut Task, replacements: &[(String, String)]) {
    for value in task.input_parameters.values_mut() {
        replace_built_in_value(value, replacements);
    }
    if let Some(description) = &mut task.description {
        replace_in_string(description, replacements);
    }
    match &mut task.kind {
        TaskKind::DoWhile { loop_condition, .. } => replace_in_string(loop_condition, replacements),
        TaskKind::Switch {
            evaluator_type,
            expression,
            ..
        } => {
            replace_in_string(evaluator_type, replacements);
            replace_in_string(expression, replacements);
        }
        TaskKind::SubWorkflow { sub_workflow_param } => {
            replace_in_string(&mut sub_workflow_param.name, replacements)
        }
        TaskKind::Join { join_on } => {
            for reference in join_on {
                replace_in_string(reference, replacements);
            }
        }
        TaskKind::Simple | TaskKind::ForkJoin { .. } => {}
    }
    for (_, branch) in task.branches_mut() {
        for child in branch.iter_mut() {
            bind_task(child, replacements);
        }
    }
}
