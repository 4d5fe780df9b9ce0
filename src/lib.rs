//! # docgraph
//!
//! Spatial graphs over scanned-document objects for structured labeling.
//!
//! A parser builds a tree of [`SpatialObject`]s (pages, text lines, blocks,
//! graphical elements) with bounding boxes and attributes. This library
//! turns that tree into a graph of spatial neighbors and a feature sequence
//! per node, the inputs of a CRF-style labeling model.
//!
//! ## Quick Start
//!
//! ```
//! use docgraph::{names, BoundingBox, DocGraph, Document, SpatialObject};
//!
//! fn main() -> docgraph::Result<()> {
//!     let mut doc = Document::new();
//!     doc.add_page(
//!         SpatialObject::new(names::PAGE)
//!             .with_child(SpatialObject::new(names::TEXT).with_bbox(BoundingBox::new(0.0, 0.0, 10.0, 10.0)))
//!             .with_child(SpatialObject::new(names::TEXT).with_bbox(BoundingBox::new(20.0, 0.0, 10.0, 10.0))),
//!     );
//!
//!     let result = DocGraph::new().build(&doc)?;
//!     assert_eq!(result.graph.edge_count(), 1);
//!     println!("{}", result.to_json(docgraph::JsonFormat::Compact)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Neighbor edges**: horizontal and vertical visibility within a page
//! - **Cross-page edges**: overlapping objects of consecutive pages
//! - **Short-edge filter**: drop edges long relative to the page
//! - **Memoized features**: numerical and edit-distance features per node
//! - **Parallel processing**: Uses Rayon across documents

pub mod error;
pub mod features;
pub mod graph;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use error::{Error, Result};
pub use features::{
    Feature, FeatureExtractor, FeatureKind, FeatureOptions, FeatureSequence, FeatureValue,
};
pub use graph::{DocumentGraph, Edge, EdgeKind, EdgeRecord, GraphBuilder, GraphOptions};
pub use model::{names, BoundingBox, Document, NodeRef, SpatialObject};
pub use render::{CoordsOptions, GraphExport, JsonFormat};

/// Build the graph of the text lines of a document.
///
/// # Example
///
/// ```
/// use docgraph::{build_graph, Document};
///
/// let doc = Document::new();
/// let graph = build_graph(&doc).unwrap();
/// assert_eq!(graph.node_count(), 0);
/// ```
pub fn build_graph(doc: &Document) -> Result<DocumentGraph<'_>> {
    GraphBuilder::default().build_document(doc, names::TEXT)
}

/// Build the graph of the objects named `node_name` with custom options.
pub fn build_graph_with_options<'a>(
    doc: &'a Document,
    node_name: &str,
    options: GraphOptions,
) -> Result<DocumentGraph<'a>> {
    GraphBuilder::new(options).build_document(doc, node_name)
}

/// Graph and features of the text lines of a document, as JSON.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    DocGraph::new().build(doc)?.to_json(format)
}

/// Builder for graph construction and feature extraction.
///
/// # Example
///
/// ```
/// use docgraph::{DocGraph, Document};
///
/// let doc = Document::new();
/// let result = DocGraph::new()
///     .with_node_name("BLOCK")
///     .short_edges_only()
///     .with_threshold(0.8)
///     .with_allowed_attributes(["font-size", "text"])
///     .build(&doc)?;
/// assert_eq!(result.graph.node_count(), 0);
/// # Ok::<(), docgraph::Error>(())
/// ```
pub struct DocGraph {
    node_name: String,
    graph_options: GraphOptions,
    feature_options: FeatureOptions,
}

impl DocGraph {
    /// Create a new builder over `TEXT` nodes.
    pub fn new() -> Self {
        Self {
            node_name: names::TEXT.to_string(),
            graph_options: GraphOptions::default(),
            feature_options: FeatureOptions::default(),
        }
    }

    /// Set the object type used as graph nodes.
    pub fn with_node_name(mut self, name: impl Into<String>) -> Self {
        self.node_name = name.into();
        self
    }

    /// Keep only short edges.
    pub fn short_edges_only(mut self) -> Self {
        self.graph_options = self.graph_options.short_edges_only();
        self
    }

    /// Set the short-edge ratio.
    pub fn with_short_edge_ratio(mut self, ratio: f64) -> Self {
        self.graph_options = self.graph_options.with_short_edge_ratio(ratio);
        self
    }

    /// Set the page extent used by the short-edge filter.
    pub fn with_page_extent(mut self, extent: BoundingBox) -> Self {
        self.graph_options = self.graph_options.with_page_extent(extent);
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.graph_options = self.graph_options.sequential();
        self
    }

    /// Enable or disable shrinking of polygon-derived boxes.
    pub fn with_polygon_shrink(mut self, shrink: bool) -> Self {
        self.graph_options = self.graph_options.with_polygon_shrink(shrink);
        self
    }

    /// Set the feature match threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.feature_options = self.feature_options.with_threshold(threshold);
        self
    }

    /// Restrict features to the given attributes.
    pub fn with_allowed_attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.feature_options = self.feature_options.with_allowed_attributes(names);
        self
    }

    /// Build the graph of one document.
    pub fn build<'a>(&self, doc: &'a Document) -> Result<DocGraphResult<'a>> {
        let graph = self.graph_builder().build_document(doc, &self.node_name)?;
        Ok(DocGraphResult {
            graph,
            extractor: self.extractor(),
        })
    }

    /// Build the graphs of several documents, in input order.
    pub fn build_all<'a>(&self, docs: &'a [Document]) -> Result<Vec<DocGraphResult<'a>>> {
        let graphs = self.graph_builder().build_documents(docs, &self.node_name)?;
        Ok(graphs
            .into_iter()
            .map(|graph| DocGraphResult {
                graph,
                extractor: self.extractor(),
            })
            .collect())
    }

    fn graph_builder(&self) -> GraphBuilder {
        GraphBuilder::new(self.graph_options.clone())
    }

    fn extractor(&self) -> FeatureExtractor {
        FeatureExtractor::new(self.feature_options.clone())
    }
}

impl Default for DocGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of building a document graph.
pub struct DocGraphResult<'a> {
    /// The graph, borrowed from the document
    pub graph: DocumentGraph<'a>,
    extractor: FeatureExtractor,
}

impl<'a> DocGraphResult<'a> {
    /// Feature sequences of the nodes, in node order.
    pub fn features(&self) -> Vec<&'a FeatureSequence> {
        self.extractor.extract_all(&self.graph.nodes)
    }

    /// Owned export of nodes, features and edges.
    pub fn export(&self) -> GraphExport {
        GraphExport::new(&self.graph, &self.extractor)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.export(), format)
    }

    /// Edge records with endpoint identities.
    pub fn records(&self) -> Vec<EdgeRecord> {
        self.graph.records()
    }

    /// Get the feature extractor.
    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }
}
