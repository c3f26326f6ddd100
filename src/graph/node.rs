use super::boundary::Boundary;
use crate::execution::{ExecutionStatus, ExecutionTask};
use crate::task::TaskType;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// What a node renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    WorkflowStart,
    WorkflowEnd,
    Fake,
    Simple,
    DoWhile,
    Switch,
    ForkJoin,
    SubWorkflow,
    Join,
}

impl NodeType {
    pub fn from_task_type(task_type: TaskType) -> Self {
        match task_type {
            TaskType::Simple => NodeType::Simple,
            TaskType::DoWhile => NodeType::DoWhile,
            TaskType::Switch => NodeType::Switch,
            TaskType::ForkJoin => NodeType::ForkJoin,
            TaskType::SubWorkflow => NodeType::SubWorkflow,
            TaskType::Join => NodeType::Join,
        }
    }

    pub fn is_boundary_marker(&self) -> bool {
        matches!(self, NodeType::WorkflowStart | NodeType::WorkflowEnd)
    }
}

/// A renderable projection of one task. Rebuilt wholesale from the task list
/// and never edited directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VinesNode {
    /// Equal to the task's `taskReferenceName`.
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub position: Position,
    pub size: Size,
    pub custom_data: Value,
    /// The construct this node is nested in, if any.
    pub parent_id: Option<String>,
    /// Which of the parent's branches holds this node.
    pub branch: Option<String>,
    pub depth: usize,
    pub execution_task: Option<ExecutionTask>,
    pub execution_status: Option<ExecutionStatus>,
}

impl VinesNode {
    /// The node's own box.
    pub fn boundary(&self) -> Boundary {
        Boundary {
            left: self.position.x,
            right: self.position.x + self.size.width,
            top: self.position.y,
            bottom: self.position.y + self.size.height,
        }
    }

    pub fn is_fake(&self) -> bool {
        self.node_type == NodeType::Fake
    }
}
