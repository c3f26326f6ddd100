//! Box sizes for the node graph.
//!
//! Sizing works on two abstract axes: the main axis runs along a chain of
//! sequential tasks, the cross axis runs across sibling branches. Vertical
//! rendering maps main to `y`, horizontal rendering maps main to `x`.

use super::node::{Position, Size};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderDirection {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    pub node_width: f64,
    pub node_height: f64,
    /// Space between consecutive nodes of a chain.
    pub node_gap: f64,
    /// Space between sibling branches of a construct.
    pub branch_gap: f64,
    /// Inset between a construct's box and its children on every side.
    pub container_padding: f64,
    /// Extra main-axis room at the start of a construct for its own header.
    pub container_header: f64,
    pub direction: RenderDirection,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 80.0,
            node_height: 80.0,
            node_gap: 80.0,
            branch_gap: 80.0,
            container_padding: 40.0,
            container_header: 40.0,
            direction: RenderDirection::Vertical,
        }
    }
}

impl LayoutConfig {
    pub fn with_direction(mut self, direction: RenderDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_node_size(mut self, width: f64, height: f64) -> Self {
        self.node_width = width;
        self.node_height = height;
        self
    }

    pub fn with_gaps(mut self, node_gap: f64, branch_gap: f64) -> Self {
        self.node_gap = node_gap;
        self.branch_gap = branch_gap;
        self
    }

    pub fn with_container(mut self, padding: f64, header: f64) -> Self {
        self.container_padding = padding;
        self.container_header = header;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Extent of a single, non-container node.
    pub(crate) fn leaf(&self) -> Extent {
        match self.direction {
            RenderDirection::Vertical => Extent {
                main: self.node_height,
                cross: self.node_width,
            },
            RenderDirection::Horizontal => Extent {
                main: self.node_width,
                cross: self.node_height,
            },
        }
    }

    /// Extent of nodes placed one after another along the main axis.
    pub(crate) fn chain(&self, items: impl IntoIterator<Item = Extent>) -> Extent {
        let mut count = 0usize;
        let mut extent = Extent::ZERO;
        for item in items {
            count += 1;
            extent.main += item.main;
            extent.cross = extent.cross.max(item.cross);
        }
        if count > 1 {
            extent.main += self.node_gap * (count - 1) as f64;
        }
        extent
    }

    /// Extent of branches placed side by side on the cross axis.
    pub(crate) fn branches(&self, branches: impl IntoIterator<Item = Extent>) -> Extent {
        let mut count = 0usize;
        let mut extent = Extent::ZERO;
        for branch in branches {
            count += 1;
            extent.main = extent.main.max(branch.main);
            extent.cross += branch.cross;
        }
        if count > 1 {
            extent.cross += self.branch_gap * (count - 1) as f64;
        }
        extent
    }

    /// Outer extent of a construct wrapped around `inner`. Never smaller
    /// than a leaf.
    pub(crate) fn container(&self, inner: Extent) -> Extent {
        let leaf = self.leaf();
        Extent {
            main: (inner.main + 2.0 * self.container_padding + self.container_header)
                .max(leaf.main),
            cross: (inner.cross + 2.0 * self.container_padding).max(leaf.cross),
        }
    }

    /// Main-axis offset from a construct's start to its first child.
    pub(crate) fn content_offset(&self) -> f64 {
        self.container_padding + self.container_header
    }

    /// Maps an abstract box (main start, cross start, extent) to canvas space.
    pub(crate) fn to_canvas(&self, main: f64, cross: f64, extent: Extent) -> (Position, Size) {
        match self.direction {
            RenderDirection::Vertical => (
                Position { x: cross, y: main },
                Size {
                    width: extent.cross,
                    height: extent.main,
                },
            ),
            RenderDirection::Horizontal => (
                Position { x: main, y: cross },
                Size {
                    width: extent.main,
                    height: extent.cross,
                },
            ),
        }
    }
}

/// Size along the main and cross axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct Extent {
    pub main: f64,
    pub cross: f64,
}

impl Extent {
    pub const ZERO: Extent = Extent {
        main: 0.0,
        cross: 0.0,
    };
}
