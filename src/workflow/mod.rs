//! The engine for one open workflow version.
//!
//! [`VinesCore`] owns the flat task list, the only persisted state. The node
//! graph is rebuilt from it after every change, and execution statuses are
//! mirrored onto the rebuilt nodes. All operations are synchronous and expect
//! serialized access; there is no batching, so every mutation rebuilds.

use crate::error::WorkflowError;
use crate::execution::{ExecutionOverlay, ExecutionSource, ExecutionTask};
use crate::graph::{Boundary, GraphBuilder, LayoutConfig, VinesGraph, VinesNode};
use crate::graph::{WORKFLOW_END, WORKFLOW_START};
use crate::id::{IdGenerator, IdSource, reference_name};
use crate::task::tree::{self, fill_empty_branches};
use crate::task::{BranchKey, FAKE_NODE_NAME, Task};
use crate::tool::{PropertyDef, ToolRegistry};

mod mutation;
mod persistence;
mod registry;

pub use mutation::InsertOutcome;
pub use persistence::{PersistenceSink, ValidationIssue, WorkflowSnapshot};
pub use registry::WorkflowRegistry;

pub struct VinesCore {
    workflow_id: String,
    tasks: Vec<Task>,
    variables: Vec<PropertyDef>,
    layout: LayoutConfig,
    graph: VinesGraph,
    overlay: ExecutionOverlay,
    instance_id: Option<String>,
    ids: Box<dyn IdSource>,
    tools: Option<Box<dyn ToolRegistry>>,
    persistence: Option<Box<dyn PersistenceSink>>,
    validation_issues: Vec<ValidationIssue>,
}

pub struct VinesCoreBuilder {
    workflow_id: String,
    tasks: Vec<Task>,
    variables: Vec<PropertyDef>,
    layout: LayoutConfig,
    ids: Option<Box<dyn IdSource>>,
    tools: Option<Box<dyn ToolRegistry>>,
    persistence: Option<Box<dyn PersistenceSink>>,
}

impl VinesCoreBuilder {
    pub fn new(workflow_id: impl Into<String>) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            tasks: Vec::new(),
            variables: Vec::new(),
            layout: LayoutConfig::default(),
            ids: None,
            tools: None,
            persistence: None,
        }
    }

    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    /// Loads tasks from their JSON array form.
    pub fn with_tasks_json(mut self, json: &str) -> Result<Self, WorkflowError> {
        self.tasks =
            serde_json::from_str(json).map_err(|e| WorkflowError::JsonParseError(e.to_string()))?;
        Ok(self)
    }

    pub fn with_variables(mut self, variables: Vec<PropertyDef>) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_id_source(mut self, ids: Box<dyn IdSource>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn with_tools(mut self, tools: Box<dyn ToolRegistry>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_persistence(mut self, sink: Box<dyn PersistenceSink>) -> Self {
        self.persistence = Some(sink);
        self
    }

    /// Validates the task list, fills empty branches and builds the graph.
    pub fn build(self) -> Result<VinesCore, WorkflowError> {
        let mut tasks = self.tasks;
        for task in tree::flatten(&tasks) {
            if is_boundary_marker(&task.task_reference_name) {
                return Err(WorkflowError::ReservedReference(
                    task.task_reference_name.clone(),
                ));
            }
        }
        if let Some(duplicate) = tree::duplicate_references(&tasks).into_iter().next() {
            return Err(WorkflowError::DuplicateReference(duplicate));
        }

        let mut ids = self.ids.unwrap_or_else(|| Box::new(IdGenerator::new()));
        let filled = normalize(&mut tasks, ids.as_mut());
        if filled > 0 {
            log::warn!(
                "Workflow '{}' had {} empty branches; filled with placeholders",
                self.workflow_id,
                filled
            );
        }

        let overlay = ExecutionOverlay::new();
        let mut graph = build_graph(&tasks, &self.layout, self.tools.as_deref());
        overlay.apply(&mut graph, None);
        log::info!(
            "Opened workflow '{}' with {} tasks",
            self.workflow_id,
            tasks.len()
        );
        Ok(VinesCore {
            workflow_id: self.workflow_id,
            tasks,
            variables: self.variables,
            layout: self.layout,
            graph,
            overlay,
            instance_id: None,
            ids,
            tools: self.tools,
            persistence: self.persistence,
            validation_issues: Vec::new(),
        })
    }
}

pub(crate) fn is_boundary_marker(id: &str) -> bool {
    id == WORKFLOW_START || id == WORKFLOW_END
}

/// Fills every empty construct branch with a freshly named placeholder.
pub(crate) fn normalize(tasks: &mut [Task], ids: &mut dyn IdSource) -> usize {
    fill_empty_branches(tasks, &mut |_: &str, _: &BranchKey| {
        Task::fake(reference_name(FAKE_NODE_NAME, &mut *ids))
    })
}

fn build_graph(
    tasks: &[Task],
    layout: &LayoutConfig,
    tools: Option<&dyn ToolRegistry>,
) -> VinesGraph {
    let builder = GraphBuilder::new(tasks, layout);
    match tools {
        Some(tools) => builder.with_tools(tools).build(),
        None => builder.build(),
    }
}

impl VinesCore {
    pub fn builder(workflow_id: impl Into<String>) -> VinesCoreBuilder {
        VinesCoreBuilder::new(workflow_id)
    }

    pub fn workflow_id(&self) -> &str {
        &self.workflow_id
    }

    /// The flat task list, as persisted.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, reference: &str) -> Option<&Task> {
        tree::find(&self.tasks, reference)
    }

    pub fn variables(&self) -> &[PropertyDef] {
        &self.variables
    }

    pub fn set_variables(&mut self, variables: Vec<PropertyDef>) {
        self.variables = variables;
    }

    pub fn graph(&self) -> &VinesGraph {
        &self.graph
    }

    pub fn nodes(&self) -> &[VinesNode] {
        self.graph.nodes()
    }

    pub fn node(&self, id: &str) -> Option<&VinesNode> {
        self.graph.node(id)
    }

    pub fn boundary(&self) -> Boundary {
        self.graph.boundary()
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn set_layout(&mut self, layout: LayoutConfig) {
        self.layout = layout;
        self.rebuild();
    }

    pub fn overlay(&self) -> &ExecutionOverlay {
        &self.overlay
    }

    /// Selects which run's statuses are shown. `None` shows the most recent
    /// record per task across runs.
    pub fn set_execution_instance(&mut self, instance_id: Option<String>) {
        self.instance_id = instance_id;
        self.overlay
            .apply(&mut self.graph, self.instance_id.as_deref());
    }

    pub fn ingest_execution(&mut self, record: ExecutionTask) {
        if self.overlay.ingest(record) {
            self.overlay
                .apply(&mut self.graph, self.instance_id.as_deref());
        }
    }

    /// Polls `source` and mirrors the new statuses onto the nodes.
    pub fn refresh_execution(&mut self, source: &mut dyn ExecutionSource) -> usize {
        let count = self.overlay.refresh(source);
        if count > 0 {
            self.overlay
                .apply(&mut self.graph, self.instance_id.as_deref());
        }
        count
    }

    pub fn clear_execution(&mut self) {
        self.overlay.clear();
        self.overlay
            .apply(&mut self.graph, self.instance_id.as_deref());
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot {
            workflow_id: self.workflow_id.clone(),
            tasks: self.tasks.clone(),
            variables: self.variables.clone(),
        }
    }

    /// Sends the current task list and variables to the persistence sink.
    /// Without a sink this does nothing and reports no issues.
    pub fn persist(&mut self) -> &[ValidationIssue] {
        let snapshot = self.snapshot();
        if let Some(sink) = self.persistence.as_mut() {
            self.validation_issues = sink.persist(&snapshot);
            log::info!(
                "Persisted workflow '{}' ({} validation issues)",
                self.workflow_id,
                self.validation_issues.len()
            );
        }
        &self.validation_issues
    }

    pub fn validation_issues(&self) -> &[ValidationIssue] {
        &self.validation_issues
    }

    /// Regenerates the whole graph from the task list.
    fn rebuild(&mut self) {
        self.graph = build_graph(&self.tasks, &self.layout, self.tools.as_deref());
        self.overlay
            .apply(&mut self.graph, self.instance_id.as_deref());
        log::debug!(
            "Rebuilt graph for '{}': {} nodes, boundary {:?}",
            self.workflow_id,
            self.graph.len(),
            self.graph.boundary()
        );
    }
}
