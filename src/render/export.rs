//! Owned export of a document graph for the labeling model.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::features::{FeatureExtractor, FeatureSequence};
use crate::graph::{DocumentGraph, EdgeKind, EdgeRecord};
use crate::model::{BoundingBox, NodeRef};

/// One graph node with its features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeExport {
    /// Node identity (type name, id, page)
    pub node: NodeRef,
    /// Resolved bounding box, if the object has geometry
    pub bbox: Option<BoundingBox>,
    /// Node features
    pub features: FeatureSequence,
}

/// A whole document graph, detached from the object tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphExport {
    /// Nodes in graph order
    pub nodes: Vec<NodeExport>,
    /// Edges as node-index pairs
    pub edges: Vec<IndexedEdge>,
}

/// An edge between two entries of [`GraphExport::nodes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedEdge {
    /// Derivation tag
    pub kind: EdgeKind,
    /// Index of the first endpoint
    pub source: usize,
    /// Index of the second endpoint
    pub target: usize,
}

impl GraphExport {
    /// Build the export of a graph, extracting node features on the way.
    pub fn new(graph: &DocumentGraph<'_>, extractor: &FeatureExtractor) -> Self {
        let nodes = graph
            .nodes
            .iter()
            .map(|&object| NodeExport {
                node: object.node_ref(),
                bbox: object.bounding_box().ok(),
                features: extractor.extract(object).clone(),
            })
            .collect();

        let edges = graph
            .index_edges()
            .into_iter()
            .map(|(source, target, kind)| IndexedEdge {
                kind,
                source,
                target,
            })
            .collect();

        Self { nodes, edges }
    }

    /// Edge records with full endpoint identities.
    ///
    /// Edges whose endpoints are not in `nodes` are skipped.
    pub fn edge_records(&self) -> Vec<EdgeRecord> {
        self.edges
            .iter()
            .filter_map(|e| {
                let a = self.nodes.get(e.source)?;
                let b = self.nodes.get(e.target)?;
                let length = match (a.bbox, b.bbox) {
                    (Some(ab), Some(bb)) => Some(ab.center_distance(&bb)),
                    _ => None,
                };
                Some(EdgeRecord {
                    kind: e.kind,
                    source: a.node.clone(),
                    target: b.node.clone(),
                    length,
                })
            })
            .collect()
    }

    /// Check that every edge points at existing nodes.
    pub fn validate(&self) -> Result<()> {
        let count = self.nodes.len();
        match self
            .edges
            .iter()
            .position(|e| e.source >= count || e.target >= count)
        {
            Some(i) => Err(Error::Render(format!(
                "edge {} references node {}->{} but the graph has {} nodes",
                i, self.edges[i].source, self.edges[i].target, count
            ))),
            None => Ok(()),
        }
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
