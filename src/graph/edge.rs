//! Typed edges between spatial objects.

use serde::{Deserialize, Serialize};

use crate::model::{NodeRef, SpatialObject};

/// How an edge was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Neighbors on the same row band of a page
    Horizontal,
    /// Neighbors on the same column band of a page
    Vertical,
    /// Overlapping objects on consecutive pages
    CrossPage,
    /// Injected by the caller; never produced by the graph builder
    Virtual,
}

/// A relation between two objects of the same tree.
///
/// Edges borrow their endpoints and cannot outlive the document.
#[derive(Debug, Clone, Copy)]
pub struct Edge<'a> {
    /// Derivation tag
    pub kind: EdgeKind,
    /// First endpoint (left, top, or previous-page object)
    pub a: &'a SpatialObject,
    /// Second endpoint
    pub b: &'a SpatialObject,
}

impl<'a> Edge<'a> {
    /// Create an edge.
    pub fn new(kind: EdgeKind, a: &'a SpatialObject, b: &'a SpatialObject) -> Self {
        Self { kind, a, b }
    }

    /// Create a horizontal neighbor edge.
    pub fn horizontal(a: &'a SpatialObject, b: &'a SpatialObject) -> Self {
        Self::new(EdgeKind::Horizontal, a, b)
    }

    /// Create a vertical neighbor edge.
    pub fn vertical(a: &'a SpatialObject, b: &'a SpatialObject) -> Self {
        Self::new(EdgeKind::Vertical, a, b)
    }

    /// Create a cross-page edge from a previous-page object.
    pub fn cross_page(prev: &'a SpatialObject, current: &'a SpatialObject) -> Self {
        Self::new(EdgeKind::CrossPage, prev, current)
    }

    /// Create a caller-defined edge, e.g. a forced reading order.
    pub fn virtual_edge(a: &'a SpatialObject, b: &'a SpatialObject) -> Self {
        Self::new(EdgeKind::Virtual, a, b)
    }

    /// Whether the edge links the two given objects, in either direction.
    pub fn connects(&self, x: &SpatialObject, y: &SpatialObject) -> bool {
        (std::ptr::eq(self.a, x) && std::ptr::eq(self.b, y))
            || (std::ptr::eq(self.a, y) && std::ptr::eq(self.b, x))
    }

    /// Distance between the endpoint centers, when both have geometry.
    pub fn length(&self) -> Option<f64> {
        let a = self.a.bounding_box().ok()?;
        let b = self.b.bounding_box().ok()?;
        Some(a.center_distance(&b))
    }

    /// Owned, serializable form of the edge.
    pub fn record(&self) -> EdgeRecord {
        EdgeRecord {
            kind: self.kind,
            source: self.a.node_ref(),
            target: self.b.node_ref(),
            length: self.length(),
        }
    }
}

/// Serializable projection of an [`Edge`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Derivation tag
    pub kind: EdgeKind,
    /// First endpoint
    pub source: NodeRef,
    /// Second endpoint
    pub target: NodeRef,
    /// Center-to-center distance
    pub length: Option<f64>,
}
