use crate::task::Task;
use crate::tool::PropertyDef;
use serde::{Deserialize, Serialize};

/// What the engine hands to persistence: the task list plus variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSnapshot {
    pub workflow_id: String,
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub variables: Vec<PropertyDef>,
}

/// A problem reported back by persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_reference_name: Option<String>,
    pub message: String,
}

/// The external collaborator that stores workflow versions.
pub trait PersistenceSink {
    /// Stores the snapshot and returns whatever validation issues it found.
    fn persist(&mut self, snapshot: &WorkflowSnapshot) -> Vec<ValidationIssue>;
}
