//! Graph construction options.

use crate::model::BoundingBox;

/// Options for building the edge set of a document.
#[derive(Debug, Clone)]
pub struct GraphOptions {
    /// Keep only short same-page edges
    pub short_edges_only: bool,

    /// Maximum center distance of a kept same-page edge, as a fraction of the
    /// page width (horizontal edges) or height (vertical edges)
    pub short_edge_ratio: f64,

    /// Page extent used by the short-edge filter; defaults to the page
    /// object's own box, else the enclosing box of the page's nodes
    pub page_extent: Option<BoundingBox>,

    /// Shrink boxes fitted on `points` polygons before neighbor detection
    pub shrink_polygons: bool,

    /// Whether to process independent documents in parallel
    pub parallel: bool,
}

impl GraphOptions {
    /// Create new graph options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only short same-page edges.
    pub fn short_edges_only(mut self) -> Self {
        self.short_edges_only = true;
        self
    }

    /// Enable or disable the short-edge filter.
    pub fn with_short_edges(mut self, short_only: bool) -> Self {
        self.short_edges_only = short_only;
        self
    }

    /// Set the short-edge distance ratio.
    pub fn with_short_edge_ratio(mut self, ratio: f64) -> Self {
        self.short_edge_ratio = ratio;
        self
    }

    /// Set the page extent used by the short-edge filter.
    pub fn with_page_extent(mut self, extent: BoundingBox) -> Self {
        self.page_extent = Some(extent);
        self
    }

    /// Enable or disable polygon shrinking.
    pub fn with_polygon_shrink(mut self, shrink: bool) -> Self {
        self.shrink_polygons = shrink;
        self
    }

    /// Enable or disable parallel processing across documents.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            short_edges_only: false,
            short_edge_ratio: 0.15,
            page_extent: None,
            shrink_polygons: true,
            parallel: true,
        }
    }
}
