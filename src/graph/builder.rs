//! Edge set construction for the labeling graph.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::error::Result;
use crate::model::{BoundingBox, Document, SpatialObject};

use super::edge::{Edge, EdgeKind, EdgeRecord};
use super::neighbors::{neighbor_pairs, Axis};
use super::options::GraphOptions;

/// Computes the edges between the objects of a page and of the page before.
///
/// Computation is sequential inside a page; only independent documents are
/// processed in parallel (see [`GraphBuilder::build_documents`]).
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    options: GraphOptions,
}

impl GraphBuilder {
    /// Create a graph builder with the given options.
    pub fn new(options: GraphOptions) -> Self {
        Self { options }
    }

    /// The builder options.
    pub fn options(&self) -> &GraphOptions {
        &self.options
    }

    /// Complete edge set of a page.
    ///
    /// Horizontal neighbor edges come first, then vertical ones, then the
    /// cross-page edges with `prev` (the previous page's objects, `None` on
    /// the first page). Every box is checked before any edge is computed.
    pub fn compute_edges<'a>(
        &self,
        prev: Option<&[&'a SpatialObject]>,
        page: &[&'a SpatialObject],
    ) -> Result<Vec<Edge<'a>>> {
        self.page_edges(prev, page, self.options.page_extent)
    }

    fn page_edges<'a>(
        &self,
        prev: Option<&[&'a SpatialObject]>,
        page: &[&'a SpatialObject],
        extent: Option<BoundingBox>,
    ) -> Result<Vec<Edge<'a>>> {
        let page_boxes = self.resolve_boxes(page)?;
        let prev_boxes = match prev {
            Some(objects) => Some(self.resolve_boxes(objects)?),
            None => None,
        };

        let (horizontal, vertical) = self.neighbor_edges(page, &page_boxes, extent)?;
        let mut edges = horizontal;
        edges.extend(vertical);

        if let (Some(prev), Some(prev_boxes)) = (prev, prev_boxes) {
            edges.extend(overlap_edges(prev, &prev_boxes, page, &page_boxes));
        }

        Ok(edges)
    }

    /// Horizontal and vertical neighbor edges between the objects of a page.
    pub fn page_neighbor_edges<'a>(
        &self,
        page: &[&'a SpatialObject],
    ) -> Result<(Vec<Edge<'a>>, Vec<Edge<'a>>)> {
        let boxes = self.resolve_boxes(page)?;
        self.neighbor_edges(page, &boxes, self.options.page_extent)
    }

    /// `CrossPage` edges between overlapping objects of two consecutive pages.
    ///
    /// Both pages are assumed to share one coordinate frame.
    pub fn cross_page_edges<'a>(
        &self,
        prev: &[&'a SpatialObject],
        page: &[&'a SpatialObject],
    ) -> Result<Vec<Edge<'a>>> {
        let prev_boxes = self.resolve_boxes(prev)?;
        let page_boxes = self.resolve_boxes(page)?;
        Ok(overlap_edges(prev, &prev_boxes, page, &page_boxes))
    }

    /// Graph boxes of the objects, polygon boxes shrunk when enabled.
    fn resolve_boxes(&self, objects: &[&SpatialObject]) -> Result<Vec<BoundingBox>> {
        objects
            .iter()
            .map(|o| {
                let bbox = o.bounding_box()?;
                if self.options.shrink_polygons && o.has_polygon_geometry() {
                    Ok(bbox.shrink_for_graph())
                } else {
                    Ok(bbox)
                }
            })
            .collect()
    }

    // Without an extent, the short-edge limits come from the enclosing box
    // of the nodes, so a single-row page gets a near-zero vertical limit.
    fn neighbor_edges<'a>(
        &self,
        page: &[&'a SpatialObject],
        boxes: &[BoundingBox],
        extent: Option<BoundingBox>,
    ) -> Result<(Vec<Edge<'a>>, Vec<Edge<'a>>)> {
        if page.is_empty() {
            return Ok((Vec::new(), Vec::new()));
        }

        let mut horizontal = neighbor_pairs(boxes, Axis::Horizontal);
        let mut vertical = neighbor_pairs(boxes, Axis::Vertical);

        if self.options.short_edges_only {
            let extent = match extent {
                Some(extent) => extent,
                None => BoundingBox::enclosing(boxes.iter().copied())?,
            };
            let max_h = self.options.short_edge_ratio * extent.width;
            let max_v = self.options.short_edge_ratio * extent.height;
            let (h_before, v_before) = (horizontal.len(), vertical.len());

            horizontal.retain(|&(a, b)| boxes[a].center_distance(&boxes[b]) <= max_h);
            vertical.retain(|&(a, b)| boxes[a].center_distance(&boxes[b]) <= max_v);

            log::debug!(
                "short edges: kept {}/{} horizontal (max {:.1}), {}/{} vertical (max {:.1})",
                horizontal.len(),
                h_before,
                max_h,
                vertical.len(),
                v_before,
                max_v
            );
        }

        let to_edges = |pairs: Vec<(usize, usize)>, kind: EdgeKind| {
            pairs
                .into_iter()
                .map(|(a, b)| Edge::new(kind, page[a], page[b]))
                .collect::<Vec<_>>()
        };
        Ok((
            to_edges(horizontal, EdgeKind::Horizontal),
            to_edges(vertical, EdgeKind::Vertical),
        ))
    }

    /// Graph of a whole document.
    ///
    /// Nodes are the objects named `node_name`, page by page in document
    /// order. Each page is linked to the page before it.
    pub fn build_document<'a>(
        &self,
        doc: &'a Document,
        node_name: &str,
    ) -> Result<DocumentGraph<'a>> {
        let mut graph = DocumentGraph::default();
        let mut prev: Option<Vec<&'a SpatialObject>> = None;

        for page in &doc.pages {
            let objects = page.all_named_objects(node_name);
            if objects.is_empty() {
                log::warn!(
                    "page {} has no '{}' object",
                    page.page.unwrap_or_default(),
                    node_name
                );
            }

            let extent = self.options.page_extent.or_else(|| page.bounding_box().ok());
            let edges = self.page_edges(prev.as_deref(), &objects, extent)?;
            log::debug!(
                "page {}: {} nodes, {} edges",
                page.page.unwrap_or_default(),
                objects.len(),
                edges.len()
            );

            graph.edges.extend(edges);
            graph.nodes.extend(objects.iter().copied());
            prev = Some(objects);
        }

        Ok(graph)
    }

    /// Graphs of several independent documents, in input order.
    ///
    /// Documents run on the rayon pool when the `parallel` option is set.
    pub fn build_documents<'a>(
        &self,
        docs: &'a [Document],
        node_name: &str,
    ) -> Result<Vec<DocumentGraph<'a>>> {
        if self.options.parallel {
            docs.par_iter()
                .map(|doc| self.build_document(doc, node_name))
                .collect()
        } else {
            docs.iter()
                .map(|doc| self.build_document(doc, node_name))
                .collect()
        }
    }
}

fn overlap_edges<'a>(
    prev: &[&'a SpatialObject],
    prev_boxes: &[BoundingBox],
    page: &[&'a SpatialObject],
    page_boxes: &[BoundingBox],
) -> Vec<Edge<'a>> {
    let mut edges = Vec::new();
    for (&p, pbox) in prev.iter().zip(prev_boxes) {
        for (&c, cbox) in page.iter().zip(page_boxes) {
            if pbox.overlap(cbox) {
                edges.push(Edge::cross_page(p, c));
            }
        }
    }
    edges
}

/// Nodes and edges of a document, borrowed from it.
#[derive(Debug, Clone, Default)]
pub struct DocumentGraph<'a> {
    /// Graph nodes in document order
    pub nodes: Vec<&'a SpatialObject>,
    /// Edges, page by page
    pub edges: Vec<Edge<'a>>,
}

impl<'a> DocumentGraph<'a> {
    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges of one kind.
    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &Edge<'a>> {
        self.edges.iter().filter(move |e| e.kind == kind)
    }

    /// Add a caller-defined edge.
    pub fn add_virtual_edge(&mut self, a: &'a SpatialObject, b: &'a SpatialObject) {
        self.edges.push(Edge::virtual_edge(a, b));
    }

    /// Position of an object in `nodes`.
    pub fn node_index(&self, object: &SpatialObject) -> Option<usize> {
        self.nodes.iter().position(|n| std::ptr::eq(*n, object))
    }

    /// Edges as `(a, b, kind)` node-index triples, the form a graph-labeling
    /// model consumes. Edges touching an object outside `nodes` are skipped.
    pub fn index_edges(&self) -> Vec<(usize, usize, EdgeKind)> {
        let index: HashMap<*const SpatialObject, usize> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (*n as *const SpatialObject, i))
            .collect();

        self.edges
            .iter()
            .filter_map(|e| {
                let a = index.get(&(e.a as *const SpatialObject))?;
                let b = index.get(&(e.b as *const SpatialObject))?;
                Some((*a, *b, e.kind))
            })
            .collect()
    }

    /// Owned records of every edge.
    pub fn records(&self) -> Vec<EdgeRecord> {
        self.edges.iter().map(Edge::record).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::names;

    fn text(id: &str, x: f64, y: f64, w: f64, h: f64) -> SpatialObject {
        SpatialObject::new(names::TEXT)
            .with_id(id)
            .with_bbox(BoundingBox::new(x, y, w, h))
    }

    #[test]
    fn test_three_in_a_row() {
        let objs = [
            text("a", 0.0, 0.0, 5.0, 5.0),
            text("b", 10.0, 0.0, 5.0, 5.0),
            text("c", 20.0, 0.0, 5.0, 5.0),
        ];
        let page: Vec<&SpatialObject> = objs.iter().collect();
        let edges = GraphBuilder::default().compute_edges(None, &page).unwrap();

        assert_eq!(edges.len(), 2);
        assert!(edges.iter().all(|e| e.kind == EdgeKind::Horizontal));
        assert!(edges[0].connects(&objs[0], &objs[1]));
        assert!(edges[1].connects(&objs[1], &objs[2]));
    }

    #[test]
    fn test_empty_page() {
        let edges = GraphBuilder::default().compute_edges(None, &[]).unwrap();
        assert!(edges.is_empty());

        let short = GraphBuilder::new(GraphOptions::new().short_edges_only());
        assert!(short.compute_edges(Some(&[][..]), &[]).unwrap().is_empty());
    }

    #[test]
    fn test_cross_page_overlap() {
        let prev_obj = text("p", 0.0, 0.0, 10.0, 10.0);
        let same = text("s", 0.0, 0.0, 10.0, 10.0);
        let far = text("f", 100.0, 100.0, 10.0, 10.0);
        let builder = GraphBuilder::default();

        let edges = builder.compute_edges(Some(&[&prev_obj][..]), &[&same]).unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].kind, EdgeKind::CrossPage);
        assert!(std::ptr::eq(edges[0].a, &prev_obj));

        let edges = builder.compute_edges(Some(&[&prev_obj][..]), &[&far]).unwrap();
        assert!(edges.is_empty());
    }

    #[test]
    fn test_invalid_geometry_fails_fast() {
        let mut bad = text("bad", 0.0, 0.0, -1.0, 5.0);
        bad.page = Some(3);
        let good = text("good", 10.0, 0.0, 5.0, 5.0);

        let err = GraphBuilder::default()
            .compute_edges(None, &[&good, &bad])
            .unwrap_err();
        match err {
            Error::InvalidGeometry { node, .. } => {
                assert_eq!(node.id.as_deref(), Some("bad"));
                assert_eq!(node.page, Some(3));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_invalid_previous_page_fails() {
        let bad = text("bad", 0.0, 0.0, 5.0, -5.0);
        let good = text("good", 0.0, 0.0, 5.0, 5.0);
        let result = GraphBuilder::default().compute_edges(Some(&[&bad][..]), &[&good]);
        assert!(matches!(result, Err(Error::InvalidGeometry { .. })));
    }

    #[test]
    fn test_short_edges_only() {
        // page 1000 wide: max horizontal edge = 150
        let objs = [
            text("a", 0.0, 0.0, 10.0, 10.0),
            text("b", 50.0, 0.0, 10.0, 10.0),
            text("c", 500.0, 0.0, 10.0, 10.0),
        ];
        let page: Vec<&SpatialObject> = objs.iter().collect();
        let options = GraphOptions::new()
            .short_edges_only()
            .with_page_extent(BoundingBox::new(0.0, 0.0, 1000.0, 1000.0));

        let all = GraphBuilder::default().compute_edges(None, &page).unwrap();
        assert_eq!(all.len(), 2);

        let short = GraphBuilder::new(options).compute_edges(None, &page).unwrap();
        assert_eq!(short.len(), 1);
        assert!(short[0].connects(&objs[0], &objs[1]));
    }

    #[test]
    fn test_polygon_boxes_are_shrunk() {
        // the fitted rectangles overlap by 5 vertically
        let upper = SpatialObject::new(names::TEXT)
            .with_id("upper")
            .with_attribute("points", "0,0 300,0 300,40 0,40");
        let lower = SpatialObject::new(names::TEXT)
            .with_id("lower")
            .with_attribute("points", "310,35 610,35 610,75 310,75");
        let page = [&upper, &lower];

        let shrunk = GraphBuilder::default().compute_edges(None, &page).unwrap();
        assert!(shrunk.is_empty());

        let raw = GraphBuilder::new(GraphOptions::new().with_polygon_shrink(false))
            .compute_edges(None, &page)
            .unwrap();
        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0].kind, EdgeKind::Horizontal);
    }

    #[test]
    fn test_explicit_boxes_are_not_shrunk() {
        let upper = text("upper", 0.0, 0.0, 300.0, 40.0);
        let lower = text("lower", 310.0, 35.0, 300.0, 40.0);
        let edges = GraphBuilder::default()
            .compute_edges(None, &[&upper, &lower])
            .unwrap();
        assert_eq!(edges.len(), 1);
    }

    #[test]
    fn test_edge_order_is_reproducible() {
        let objs = [
            text("a", 0.0, 0.0, 10.0, 10.0),
            text("b", 20.0, 0.0, 10.0, 10.0),
            text("c", 0.0, 20.0, 10.0, 10.0),
            text("d", 20.0, 20.0, 10.0, 10.0),
        ];
        let page: Vec<&SpatialObject> = objs.iter().collect();
        let builder = GraphBuilder::default();

        let first: Vec<_> = builder
            .compute_edges(None, &page)
            .unwrap()
            .iter()
            .map(Edge::record)
            .collect();
        let second: Vec<_> = builder
            .compute_edges(None, &page)
            .unwrap()
            .iter()
            .map(Edge::record)
            .collect();
        assert_eq!(first, second);

        let kinds: Vec<_> = first.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EdgeKind::Horizontal,
                EdgeKind::Horizontal,
                EdgeKind::Vertical,
                EdgeKind::Vertical
            ]
        );
    }

    #[test]
    fn test_index_edges() {
        let a = text("a", 0.0, 0.0, 5.0, 5.0);
        let b = text("b", 10.0, 0.0, 5.0, 5.0);
        let outsider = text("x", 0.0, 0.0, 1.0, 1.0);

        let mut graph = DocumentGraph {
            nodes: vec![&a, &b],
            edges: vec![Edge::horizontal(&a, &b)],
        };
        graph.add_virtual_edge(&b, &outsider);

        assert_eq!(graph.node_index(&b), Some(1));
        assert_eq!(graph.node_index(&outsider), None);
        assert_eq!(graph.index_edges(), vec![(0, 1, EdgeKind::Horizontal)]);
        assert_eq!(graph.edges_of_kind(EdgeKind::Virtual).count(), 1);
    }
}
