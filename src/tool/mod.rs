//! Tool catalog entries: what a workflow step can be built from.

use crate::task::TaskType;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

mod registry;

pub use registry::{ToolCatalog, ToolRegistry};

/// The declared type of a tool input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyType {
    String,
    Number,
    Boolean,
    JsonObject,
    NestedJsonObject,
    NestedArray,
    Options,
    File,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeOptions {
    #[serde(default)]
    pub multiple_values: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<String>,
}

/// One declared input of a tool, also used for workflow variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDef {
    pub name: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_options: Option<TypeOptions>,
}

impl PropertyDef {
    pub fn new(name: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            property_type,
            default: None,
            type_options: None,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn multiple(mut self) -> Self {
        self.type_options
            .get_or_insert_with(TypeOptions::default)
            .multiple_values = true;
        self
    }

    pub fn is_multiple(&self) -> bool {
        self.type_options
            .as_ref()
            .is_some_and(|options| options.multiple_values)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCredential {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolExtra {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_timeout: Option<u64>,
}

/// A catalog entry. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    #[serde(rename = "type", default)]
    pub task_type: TaskType,
    #[serde(default)]
    pub input: Vec<PropertyDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Vec<ToolCredential>>,
    #[serde(default)]
    pub extra: ToolExtra,
    /// Partial task merged over the generated defaults.
    #[serde(rename = "_preset", default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, task_type: TaskType) -> Self {
        Self {
            name: name.into(),
            task_type,
            input: Vec::new(),
            credentials: None,
            extra: ToolExtra::default(),
            preset: None,
            display_name: None,
            description: None,
            icon: None,
        }
    }

    pub fn with_input(mut self, property: PropertyDef) -> Self {
        self.input.push(property);
        self
    }

    pub fn with_preset(mut self, preset: Map<String, Value>) -> Self {
        self.preset = Some(preset);
        self
    }

    /// Title shown on the node: the display name when set, else the tool name.
    pub fn title(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}
