use super::node::{Position, VinesNode};
use serde::Serialize;

/// An axis-aligned bounding box in canvas coordinates.
///
/// [`Boundary::EMPTY`] is inverted (`left > right`, `top > bottom`) so it is
/// the identity for [`union`](Boundary::union). Check [`is_empty`](Boundary::is_empty)
/// before treating a reduced boundary as a real box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Boundary {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Boundary {
    pub const EMPTY: Boundary = Boundary {
        left: f64::INFINITY,
        right: f64::NEG_INFINITY,
        top: f64::INFINITY,
        bottom: f64::NEG_INFINITY,
    };

    pub fn is_empty(&self) -> bool {
        self.left > self.right || self.top > self.bottom
    }

    pub fn union(self, other: Boundary) -> Boundary {
        Boundary {
            left: self.left.min(other.left),
            right: self.right.max(other.right),
            top: self.top.min(other.top),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Whether `other` lies entirely inside this box.
    pub fn contains(&self, other: &Boundary) -> bool {
        !self.is_empty()
            && other.left >= self.left
            && other.right <= self.right
            && other.top >= self.top
            && other.bottom <= self.bottom
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.right - self.left
        }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.bottom - self.top
        }
    }

    pub fn center(&self) -> Option<Position> {
        (!self.is_empty()).then(|| Position {
            x: (self.left + self.right) / 2.0,
            y: (self.top + self.bottom) / 2.0,
        })
    }
}

impl Default for Boundary {
    fn default() -> Self {
        Boundary::EMPTY
    }
}

/// Bounding box of a set of nodes. An empty set yields [`Boundary::EMPTY`].
pub fn get_boundary<'a, I>(nodes: I) -> Boundary
where
    I: IntoIterator<Item = &'a VinesNode>,
{
    nodes
        .into_iter()
        .fold(Boundary::EMPTY, |acc, node| acc.union(node.boundary()))
}
