use super::layout::{Extent, LayoutConfig};
use super::node::{NodeType, VinesNode};
use super::{VinesGraph, WORKFLOW_END, WORKFLOW_START};
use crate::task::{BranchKey, FAKE_NODE_NAME, Task};
use crate::tool::ToolRegistry;
use serde_json::{Value, json};

/// What a measured node stands for.
enum Source<'a> {
    Task(&'a Task),
    /// Stand-in for a branch that arrived empty.
    Placeholder(String),
    Marker(&'static str),
}

/// A node with its subtree already sized.
struct Measured<'a> {
    source: Source<'a>,
    extent: Extent,
    branches: Vec<MeasuredBranch<'a>>,
}

struct MeasuredBranch<'a> {
    key: BranchKey,
    chain: Chain<'a>,
}

struct Chain<'a> {
    items: Vec<Measured<'a>>,
    extent: Extent,
}

/// Placement context handed down to children.
struct Parent<'p> {
    id: &'p str,
    branch: String,
    depth: usize,
}

/// Builds the renderable node list from a task list.
///
/// Sizing runs bottom-up over the task tree, placement runs top-down from the
/// sizes; there is no iteration, so the same tasks and config always give the
/// same nodes. Nodes come out in depth-first pre-order between
/// `workflow_start` and `workflow_end`.
pub struct GraphBuilder<'a> {
    tasks: &'a [Task],
    layout: &'a LayoutConfig,
    tools: Option<&'a dyn ToolRegistry>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(tasks: &'a [Task], layout: &'a LayoutConfig) -> Self {
        Self {
            tasks,
            layout,
            tools: None,
        }
    }

    /// Decorates nodes with title, icon and description from the catalog.
    pub fn with_tools(mut self, tools: &'a dyn ToolRegistry) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn build(&self) -> VinesGraph {
        let mut items = Vec::with_capacity(self.tasks.len() + 2);
        items.push(self.measure_marker(WORKFLOW_START));
        items.extend(self.tasks.iter().map(|task| self.measure_task(task)));
        items.push(self.measure_marker(WORKFLOW_END));
        let root = self.chain(items);

        let mut nodes = Vec::new();
        self.place_chain(&root, 0.0, 0.0, None, &mut nodes);
        VinesGraph::from_nodes(nodes, self.layout.direction)
    }

    fn chain(&self, items: Vec<Measured<'a>>) -> Chain<'a> {
        let extent = self.layout.chain(items.iter().map(|item| item.extent));
        Chain { items, extent }
    }

    fn measure_marker(&self, id: &'static str) -> Measured<'a> {
        Measured {
            source: Source::Marker(id),
            extent: self.layout.leaf(),
            branches: Vec::new(),
        }
    }

    fn measure_task(&self, task: &'a Task) -> Measured<'a> {
        let mut task_branches: Vec<(BranchKey, &'a [Task])> = task
            .branches()
            .into_iter()
            .map(|(key, list)| (key, list.as_slice()))
            .collect();
        if task_branches.is_empty() {
            task_branches = task
                .default_branch_keys()
                .into_iter()
                .map(|key| (key, &[] as &[Task]))
                .collect();
        }
        if task_branches.is_empty() && !task.task_type().is_control_construct() {
            return Measured {
                source: Source::Task(task),
                extent: self.layout.leaf(),
                branches: Vec::new(),
            };
        }

        let requires = task.task_type().requires_populated_branches();
        let branches: Vec<MeasuredBranch<'a>> = task_branches
            .into_iter()
            .enumerate()
            .map(|(index, (key, list))| {
                let items = if list.is_empty() && requires {
                    let id = format!(
                        "{}_{}_{}",
                        FAKE_NODE_NAME, task.task_reference_name, index
                    );
                    log::warn!(
                        "Branch '{}' of '{}' is empty; rendering placeholder '{}'",
                        key,
                        task.task_reference_name,
                        id
                    );
                    vec![Measured {
                        source: Source::Placeholder(id),
                        extent: self.layout.leaf(),
                        branches: Vec::new(),
                    }]
                } else {
                    list.iter().map(|child| self.measure_task(child)).collect()
                };
                MeasuredBranch {
                    key,
                    chain: self.chain(items),
                }
            })
            .collect();

        let extent = if branches.is_empty() {
            self.layout.leaf()
        } else {
            self.layout
                .container(self.layout.branches(branches.iter().map(|b| b.chain.extent)))
        };
        Measured {
            source: Source::Task(task),
            extent,
            branches,
        }
    }

    /// Places a chain starting at `main_start`, centred on `cross_center`.
    fn place_chain(
        &self,
        chain: &Chain<'a>,
        main_start: f64,
        cross_center: f64,
        parent: Option<&Parent<'_>>,
        out: &mut Vec<VinesNode>,
    ) {
        let mut main = main_start;
        for item in &chain.items {
            self.place_item(item, main, cross_center, parent, out);
            main += item.extent.main + self.layout.node_gap;
        }
    }

    fn place_item(
        &self,
        item: &Measured<'a>,
        main_start: f64,
        cross_center: f64,
        parent: Option<&Parent<'_>>,
        out: &mut Vec<VinesNode>,
    ) {
        let (position, size) = self.layout.to_canvas(
            main_start,
            cross_center - item.extent.cross / 2.0,
            item.extent,
        );
        let (id, node_type, custom_data) = self.describe(&item.source);
        out.push(VinesNode {
            id: id.clone(),
            node_type,
            position,
            size,
            custom_data,
            parent_id: parent.map(|p| p.id.to_string()),
            branch: parent.map(|p| p.branch.clone()),
            depth: parent.map_or(0, |p| p.depth),
            execution_task: None,
            execution_status: None,
        });

        if item.branches.is_empty() {
            return;
        }
        let inner = self
            .layout
            .branches(item.branches.iter().map(|b| b.chain.extent));
        let content_start = main_start + self.layout.content_offset();
        let mut cursor = cross_center - inner.cross / 2.0;
        for branch in &item.branches {
            let child_parent = Parent {
                id: &id,
                branch: branch.key.to_string(),
                depth: parent.map_or(1, |p| p.depth + 1),
            };
            let center = cursor + branch.chain.extent.cross / 2.0;
            self.place_chain(&branch.chain, content_start, center, Some(&child_parent), out);
            cursor += branch.chain.extent.cross + self.layout.branch_gap;
        }
    }

    fn describe(&self, source: &Source<'a>) -> (String, NodeType, Value) {
        match source {
            Source::Marker(id) => {
                let node_type = if *id == WORKFLOW_START {
                    NodeType::WorkflowStart
                } else {
                    NodeType::WorkflowEnd
                };
                (id.to_string(), node_type, json!({ "name": id, "title": id }))
            }
            Source::Placeholder(id) => (
                id.clone(),
                NodeType::Fake,
                json!({ "name": FAKE_NODE_NAME, "title": FAKE_NODE_NAME }),
            ),
            Source::Task(task) => {
                let node_type = if task.is_fake() {
                    NodeType::Fake
                } else {
                    NodeType::from_task_type(task.task_type())
                };
                let tool = self.tools.and_then(|tools| tools.resolve(&task.name));
                let custom_data = json!({
                    "name": task.name,
                    "title": tool.map_or(task.name.as_str(), |t| t.title()),
                    "description": task
                        .description
                        .as_deref()
                        .or_else(|| tool.and_then(|t| t.description.as_deref())),
                    "icon": tool.and_then(|t| t.icon.as_deref()),
                    "taskType": task.task_type(),
                });
                (task.task_reference_name.clone(), node_type, custom_data)
            }
        }
    }
}
