//! The node graph: a disposable, renderable projection of the task list.

use ahash::AHashMap;

mod boundary;
mod builder;
pub mod layout;
mod node;

pub use boundary::{Boundary, get_boundary};
pub use builder::GraphBuilder;
pub use layout::{LayoutConfig, RenderDirection};
pub use node::{NodeType, Position, Size, VinesNode};

/// Id of the synthetic node opening every graph.
pub const WORKFLOW_START: &str = "workflow_start";
/// Id of the synthetic node closing every graph.
pub const WORKFLOW_END: &str = "workflow_end";

/// An ordered node list with lookup by id.
#[derive(Debug, Clone)]
pub struct VinesGraph {
    nodes: Vec<VinesNode>,
    index: AHashMap<String, usize>,
    direction: RenderDirection,
}

impl VinesGraph {
    pub(crate) fn from_nodes(nodes: Vec<VinesNode>, direction: RenderDirection) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.clone(), i))
            .collect();
        Self {
            nodes,
            index,
            direction,
        }
    }

    /// All nodes in depth-first pre-order, bracketed by the start and end markers.
    pub fn nodes(&self) -> &[VinesNode] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [VinesNode] {
        &mut self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&VinesNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn direction(&self) -> RenderDirection {
        self.direction
    }

    /// Nodes nested directly inside the construct `id`, in order.
    pub fn children(&self, id: &str) -> Vec<&VinesNode> {
        self.nodes
            .iter()
            .filter(|node| node.parent_id.as_deref() == Some(id))
            .collect()
    }

    /// Direct children of `id` that sit in the given branch.
    pub fn branch_children(&self, id: &str, branch: &str) -> Vec<&VinesNode> {
        self.children(id)
            .into_iter()
            .filter(|node| node.branch.as_deref() == Some(branch))
            .collect()
    }

    /// Every node nested anywhere inside the construct `id`.
    pub fn descendants(&self, id: &str) -> Vec<&VinesNode> {
        let mut out = Vec::new();
        let mut frontier = vec![id];
        while let Some(current) = frontier.pop() {
            for child in self.children(current) {
                frontier.push(&child.id);
                out.push(child);
            }
        }
        out
    }

    /// Bounding box of the whole graph.
    pub fn boundary(&self) -> Boundary {
        get_boundary(&self.nodes)
    }
}
