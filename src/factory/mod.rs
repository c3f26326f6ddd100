//! Building new tasks from tool definitions.

use crate::error::FactoryError;
use crate::id::{IdGenerator, IdSource, reference_name};
use crate::task::tree::fill_empty_branches;
use crate::task::{BranchKey, FAKE_NODE_NAME, Task};
use crate::tool::{ToolDefinition, ToolRegistry};
use crate::transform::{BuiltInBindings, BuiltInValue, auto_type_transform};
use serde_json::{Map, Value, json};

mod preset;

use preset::{deep_merge, lift_reserved_keys};

/// Creates tasks for tools resolved from a registry.
pub struct TaskFactory<R: ToolRegistry> {
    registry: R,
    ids: Box<dyn IdSource>,
}

pub struct TaskFactoryBuilder<R: ToolRegistry> {
    registry: R,
    ids: Option<Box<dyn IdSource>>,
}

impl<R: ToolRegistry> TaskFactoryBuilder<R> {
    pub fn new(registry: R) -> Self {
        Self {
            registry,
            ids: None,
        }
    }

    /// Uses a specific id source instead of a fresh random generator.
    pub fn with_id_source(mut self, ids: Box<dyn IdSource>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn build(self) -> TaskFactory<R> {
        TaskFactory {
            registry: self.registry,
            ids: self
                .ids
                .unwrap_or_else(|| Box::new(IdGenerator::new())),
        }
    }
}

impl<R: ToolRegistry> TaskFactory<R> {
    pub fn builder(registry: R) -> TaskFactoryBuilder<R> {
        TaskFactoryBuilder::new(registry)
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Creates a task for the tool registered as `tool_name`.
    pub fn create(
        &mut self,
        tool_name: &str,
        overrides: Option<&Map<String, Value>>,
    ) -> Result<Task, FactoryError> {
        let tool = self
            .registry
            .resolve(tool_name)
            .ok_or_else(|| FactoryError::ToolNotFound(tool_name.to_string()))?;
        create_task(tool, overrides, self.ids.as_mut())
    }
}

/// Builds a complete task from a tool definition.
///
/// Defaults come from the tool's declared inputs, then the tool preset, then
/// `overrides` are merged on top. Control constructs come back with every
/// branch holding a placeholder, and `{{$self}}` anywhere in the task is
/// replaced by the generated reference name.
pub fn create_task(
    tool: &ToolDefinition,
    overrides: Option<&Map<String, Value>>,
    ids: &mut dyn IdSource,
) -> Result<Task, FactoryError> {
    let reference = reference_name(&tool.name, ids);

    let mut params = Map::new();
    auto_type_transform(&tool.input, &mut params);
    if let Some(credential) = tool.credentials.as_ref().and_then(|c| c.first()) {
        params
            .entry("credential")
            .or_insert_with(|| json!({ "type": credential.name, "id": null }));
    }

    let mut raw = Map::new();
    raw.insert("name".to_string(), Value::String(tool.name.clone()));
    raw.insert("taskReferenceName".to_string(), Value::String(reference));
    raw.insert(
        "type".to_string(),
        Value::String(tool.task_type.as_str().to_string()),
    );
    raw.insert("inputParameters".to_string(), Value::Object(params));
    if let Some(timeout) = tool.extra.default_timeout {
        raw.insert("timeoutSeconds".to_string(), Value::from(timeout));
    }

    if let Some(preset) = &tool.preset {
        deep_merge(&mut raw, preset);
    }
    if let Some(overrides) = overrides {
        deep_merge(&mut raw, overrides);
    }
    lift_reserved_keys(&mut raw);

    let mut task: Task =
        serde_json::from_value(Value::Object(raw)).map_err(|e| FactoryError::InvalidTask {
            tool: tool.name.clone(),
            message: e.to_string(),
        })?;

    let filled = fill_empty_branches(
        std::slice::from_mut(&mut task),
        &mut |_: &str, _: &BranchKey| Task::fake(reference_name(FAKE_NODE_NAME, &mut *ids)),
    );

    BuiltInBindings::new()
        .bind(BuiltInValue::SelfReference, task.task_reference_name.clone())
        .apply(&mut task);

    log::debug!(
        "Created task '{}' from tool '{}' ({} placeholder branches)",
        task.task_reference_name,
        tool.name,
        filled
    );
    Ok(task)
}
