use thiserror::Error;

/// Errors that can occur while building a task from a tool definition.
#[derive(Error, Debug, Clone)]
pub enum FactoryError {
    #[error("Tool '{0}' not found in the registry")]
    ToolNotFound(String),

    #[error("Tool '{tool}' produced an invalid task: {message}")]
    InvalidTask { tool: String, message: String },
}

/// Errors returned by the mutation API. A mutation that fails leaves the
/// task list exactly as it was.
#[derive(Error, Debug, Clone)]
pub enum MutationError {
    #[error("Node '{0}' not found in the workflow")]
    NodeNotFound(String),

    #[error("Raw task for node '{node_id}' could not be parsed: {message}")]
    MalformedTask { node_id: String, message: String },

    #[error("Node '{0}' is a workflow boundary marker and cannot be edited")]
    ReservedNode(String),

    #[error("Task reference name '{0}' is already used by another task")]
    DuplicateReference(String),
}

/// Errors that can occur when loading a task list into an engine.
#[derive(Error, Debug, Clone)]
pub enum WorkflowError {
    #[error("Task reference name '{0}' appears more than once in the workflow")]
    DuplicateReference(String),

    #[error("Task reference name '{0}' is reserved for a workflow boundary marker")]
    ReservedReference(String),

    #[error("Failed to parse workflow definition: {0}")]
    JsonParseError(String),
}
