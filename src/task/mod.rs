//! The persisted task model.
//!
//! A workflow is a list of [`Task`]s. Control constructs (`DO_WHILE`, `SWITCH`,
//! `FORK_JOIN`, `SUB_WORKFLOW`) own nested task lists, so the list is really a
//! tree whose shape is fixed by each task's [`TaskKind`]. The JSON form matches
//! what the execution engine consumes: camelCase keys with the task type as
//! the `type` tag.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

mod cases;
pub mod tree;

pub use cases::DecisionCases;

/// Name carried by every placeholder task that fills an empty branch.
pub const FAKE_NODE_NAME: &str = "fake_node";

/// Case keys given to a freshly created `SWITCH`.
pub const SWITCH_TRUE: &str = "switchTrue";
pub const SWITCH_FALSE: &str = "switchFalse";

/// Keys that live on the task itself but may arrive through `inputParameters`.
pub const RESERVED_INPUT_KEYS: [&str; 3] = ["loopCondition", "evaluatorType", "expression"];

/// A single step or nested construct in a workflow definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub name: String,
    pub task_reference_name: String,
    #[serde(default)]
    pub input_parameters: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
    #[serde(flatten)]
    pub kind: TaskKind,
}

/// Type-specific payload of a task, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TaskKind {
    #[serde(rename = "SIMPLE")]
    Simple,
    #[serde(rename = "DO_WHILE", rename_all = "camelCase")]
    DoWhile {
        #[serde(default)]
        loop_condition: String,
        #[serde(default)]
        loop_over: Vec<Task>,
    },
    #[serde(rename = "SWITCH", rename_all = "camelCase")]
    Switch {
        #[serde(default = "default_evaluator_type")]
        evaluator_type: String,
        #[serde(default)]
        expression: String,
        #[serde(default)]
        decision_cases: DecisionCases,
    },
    #[serde(rename = "FORK_JOIN", rename_all = "camelCase")]
    ForkJoin {
        #[serde(default)]
        fork_tasks: Vec<Vec<Task>>,
    },
    #[serde(rename = "SUB_WORKFLOW", rename_all = "camelCase")]
    SubWorkflow {
        #[serde(default)]
        sub_workflow_param: SubWorkflowParam,
    },
    #[serde(rename = "JOIN", rename_all = "camelCase")]
    Join {
        #[serde(default)]
        join_on: Vec<String>,
    },
}

fn default_evaluator_type() -> String {
    "javascript".to_string()
}

/// Reference to a child workflow, optionally with its definition inlined.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubWorkflowParam {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_definition: Option<SubWorkflowDefinition>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubWorkflowDefinition {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// The task type as a plain tag, used by tool definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    #[default]
    Simple,
    DoWhile,
    Switch,
    ForkJoin,
    SubWorkflow,
    Join,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Simple => "SIMPLE",
            TaskType::DoWhile => "DO_WHILE",
            TaskType::Switch => "SWITCH",
            TaskType::ForkJoin => "FORK_JOIN",
            TaskType::SubWorkflow => "SUB_WORKFLOW",
            TaskType::Join => "JOIN",
        }
    }

    /// Control constructs own nested task lists instead of being a single step.
    pub fn is_control_construct(&self) -> bool {
        matches!(
            self,
            TaskType::DoWhile | TaskType::Switch | TaskType::ForkJoin | TaskType::SubWorkflow
        )
    }

    /// Types whose every branch must hold at least one task.
    pub fn requires_populated_branches(&self) -> bool {
        matches!(self, TaskType::DoWhile | TaskType::Switch | TaskType::ForkJoin)
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one nested task list of a control construct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BranchKey {
    LoopOver,
    Case(String),
    Fork(usize),
    SubWorkflow,
}

impl fmt::Display for BranchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchKey::LoopOver => write!(f, "loopOver"),
            BranchKey::Case(key) => write!(f, "case:{}", key),
            BranchKey::Fork(index) => write!(f, "fork:{}", index),
            BranchKey::SubWorkflow => write!(f, "subWorkflow"),
        }
    }
}

impl TaskKind {
    /// An empty payload for the given type, with no branches yet.
    pub fn empty(task_type: TaskType) -> Self {
        match task_type {
            TaskType::Simple => TaskKind::Simple,
            TaskType::DoWhile => TaskKind::DoWhile {
                loop_condition: String::new(),
                loop_over: Vec::new(),
            },
            TaskType::Switch => TaskKind::Switch {
                evaluator_type: default_evaluator_type(),
                expression: String::new(),
                decision_cases: DecisionCases::default(),
            },
            TaskType::ForkJoin => TaskKind::ForkJoin {
                fork_tasks: Vec::new(),
            },
            TaskType::SubWorkflow => TaskKind::SubWorkflow {
                sub_workflow_param: SubWorkflowParam::default(),
            },
            TaskType::Join => TaskKind::Join {
                join_on: Vec::new(),
            },
        }
    }

    pub fn task_type(&self) -> TaskType {
        match self {
            TaskKind::Simple => TaskType::Simple,
            TaskKind::DoWhile { .. } => TaskType::DoWhile,
            TaskKind::Switch { .. } => TaskType::Switch,
            TaskKind::ForkJoin { .. } => TaskType::ForkJoin,
            TaskKind::SubWorkflow { .. } => TaskType::SubWorkflow,
            TaskKind::Join { .. } => TaskType::Join,
        }
    }
}

impl Task {
    /// A `SIMPLE` task with no parameters.
    pub fn simple(name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::with_kind(name, reference, TaskKind::Simple)
    }

    pub fn with_kind(name: impl Into<String>, reference: impl Into<String>, kind: TaskKind) -> Self {
        Self {
            name: name.into(),
            task_reference_name: reference.into(),
            input_parameters: Map::new(),
            description: None,
            optional: None,
            timeout_seconds: None,
            kind,
        }
    }

    /// A placeholder standing in for an intentionally empty branch.
    pub fn fake(reference: impl Into<String>) -> Self {
        Self::simple(FAKE_NODE_NAME, reference)
    }

    pub fn is_fake(&self) -> bool {
        self.name == FAKE_NODE_NAME
    }

    pub fn task_type(&self) -> TaskType {
        self.kind.task_type()
    }

    /// Nested task lists in render order.
    pub fn branches(&self) -> Vec<(BranchKey, &Vec<Task>)> {
        match &self.kind {
            TaskKind::DoWhile { loop_over, .. } => vec![(BranchKey::LoopOver, loop_over)],
            TaskKind::Switch { decision_cases, .. } => decision_cases
                .iter()
                .map(|(key, tasks)| (BranchKey::Case(key.clone()), tasks))
                .collect(),
            TaskKind::ForkJoin { fork_tasks } => fork_tasks
                .iter()
                .enumerate()
                .map(|(index, tasks)| (BranchKey::Fork(index), tasks))
                .collect(),
            TaskKind::SubWorkflow { sub_workflow_param } => sub_workflow_param
                .workflow_definition
                .as_ref()
                .map(|definition| vec![(BranchKey::SubWorkflow, &definition.tasks)])
                .unwrap_or_default(),
            TaskKind::Simple | TaskKind::Join { .. } => Vec::new(),
        }
    }

    pub fn branches_mut(&mut self) -> Vec<(BranchKey, &mut Vec<Task>)> {
        match &mut self.kind {
            TaskKind::DoWhile { loop_over, .. } => vec![(BranchKey::LoopOver, loop_over)],
            TaskKind::Switch { decision_cases, .. } => decision_cases
                .iter_mut()
                .map(|(key, tasks)| (BranchKey::Case(key.clone()), tasks))
                .collect(),
            TaskKind::ForkJoin { fork_tasks } => fork_tasks
                .iter_mut()
                .enumerate()
                .map(|(index, tasks)| (BranchKey::Fork(index), tasks))
                .collect(),
            TaskKind::SubWorkflow { sub_workflow_param } => sub_workflow_param
                .workflow_definition
                .as_mut()
                .map(|definition| vec![(BranchKey::SubWorkflow, &mut definition.tasks)])
                .unwrap_or_default(),
            TaskKind::Simple | TaskKind::Join { .. } => Vec::new(),
        }
    }

    /// Branches a `SWITCH` or `FORK_JOIN` receives when it arrives with none.
    pub fn default_branch_keys(&self) -> Vec<BranchKey> {
        match &self.kind {
            TaskKind::Switch { decision_cases, .. } if decision_cases.is_empty() => vec![
                BranchKey::Case(SWITCH_TRUE.to_string()),
                BranchKey::Case(SWITCH_FALSE.to_string()),
            ],
            TaskKind::ForkJoin { fork_tasks } if fork_tasks.is_empty() => {
                vec![BranchKey::Fork(0), BranchKey::Fork(1)]
            }
            _ => Vec::new(),
        }
    }

    /// Gives a construct the branch lists it can never be without: a `SWITCH`
    /// with no cases gets `switchTrue`/`switchFalse`, a `FORK_JOIN` with no
    /// forks gets two. The lists themselves may still be empty afterwards.
    pub fn ensure_default_branches(&mut self) {
        match &mut self.kind {
            TaskKind::Switch { decision_cases, .. } if decision_cases.is_empty() => {
                decision_cases.insert(SWITCH_TRUE, Vec::new());
                decision_cases.insert(SWITCH_FALSE, Vec::new());
            }
            TaskKind::ForkJoin { fork_tasks } if fork_tasks.is_empty() => {
                fork_tasks.push(Vec::new());
                fork_tasks.push(Vec::new());
            }
            _ => {}
        }
    }
}
