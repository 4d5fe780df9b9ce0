//! Spatial objects: the nodes of a document's geometric tree.

use std::fmt;
use std::sync::OnceLock;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::geometry::{parse_points, BoundingBox};
use crate::error::{Error, Result};
use crate::features::FeatureSequence;

/// Common object type names.
pub mod names {
    /// A page
    pub const PAGE: &str = "PAGE";
    /// A text element (token or line, depending on the producer)
    pub const TEXT: &str = "TEXT";
    /// A text line
    pub const LINE: &str = "LINE";
    /// A block / region of text
    pub const BLOCK: &str = "BLOCK";
    /// A graphical element (rule, line drawing)
    pub const GRAPHELT: &str = "GRAPHELT";
    /// A table
    pub const TABLE: &str = "TABLE";
    /// A table cell
    pub const CELL: &str = "CELL";
}

/// Owned identity of an object: type name, optional id, owning page.
///
/// Used wherever something must point back at an object without borrowing
/// the tree: features, edge records, error context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeRef {
    /// Object type name
    pub name: String,
    /// Object id, if the producer set one
    pub id: Option<String>,
    /// Page number (1-indexed), if the object is attached to a page
    pub page: Option<u32>,
}

impl NodeRef {
    /// Create a node reference.
    pub fn new(name: impl Into<String>, id: Option<String>, page: Option<u32>) -> Self {
        Self {
            name: name.into(),
            id,
            page,
        }
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(ref id) = self.id {
            write!(f, " '{}'", id)?;
        }
        if let Some(page) = self.page {
            write!(f, " (page {})", page)?;
        }
        Ok(())
    }
}

/// A node of the document tree.
///
/// Children are owned exclusively by their parent. The page an object
/// belongs to is kept as a page number, resolved through
/// [`Document::page_of`](super::Document::page_of).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpatialObject {
    /// Type tag (e.g. `PAGE`, `TEXT`, `CELL`)
    pub name: String,

    /// Stable identifier, unique within a document when present
    pub id: Option<String>,

    /// Explicit bounding box; when unset the box is derived from attributes
    pub bbox: Option<BoundingBox>,

    /// Free-form attributes
    pub attributes: IndexMap<String, String>,

    /// Accumulated text content
    pub content: Option<String>,

    /// Sub-objects in document order
    pub children: Vec<SpatialObject>,

    /// Owning page number (1-indexed)
    pub page: Option<u32>,

    #[serde(skip)]
    features: OnceLock<FeatureSequence>,
}

impl SpatialObject {
    /// Create an empty object of the given type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set an explicit bounding box.
    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Append text content.
    pub fn with_content(mut self, text: &str) -> Self {
        self.add_content(text);
        self
    }

    /// Attach a child object.
    pub fn with_child(mut self, child: SpatialObject) -> Self {
        self.add_object(child);
        self
    }

    /// Set an attribute, replacing any previous value.
    ///
    /// Setting `id` also sets the object id.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if name == "id" {
            self.id = Some(value.clone());
        }
        self.attributes.insert(name, value);
    }

    /// Get an attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Check whether an attribute is set.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Read an attribute as a number.
    pub fn numeric_attribute(&self, name: &str) -> Result<f64> {
        let raw = self
            .attribute(name)
            .ok_or_else(|| Error::missing_attribute(self.node_ref(), name))?;
        raw.trim().parse::<f64>().map_err(|_| {
            Error::invalid_geometry(
                self.node_ref(),
                format!("attribute '{}' is not a number: '{}'", name, raw),
            )
        })
    }

    /// Append a text fragment to the content.
    pub fn add_content(&mut self, text: &str) {
        match self.content {
            Some(ref mut content) => content.push_str(text),
            None => self.content = Some(text.to_string()),
        }
    }

    /// Attach a child; the child's subtree joins this object's page.
    pub fn add_object(&mut self, mut child: SpatialObject) {
        child.set_page(self.page);
        self.children.push(child);
    }

    /// Assign the page number to this object and all its descendants.
    pub fn set_page(&mut self, page: Option<u32>) {
        self.page = page;
        for child in &mut self.children {
            child.set_page(page);
        }
    }

    /// Direct children.
    pub fn objects(&self) -> &[SpatialObject] {
        &self.children
    }

    /// All descendants in document order (pre-order), excluding `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// All descendants with the given type name, in document order.
    pub fn all_named_objects(&self, name: &str) -> Vec<&SpatialObject> {
        self.descendants().filter(|o| o.name == name).collect()
    }

    /// Owned identity of this object.
    pub fn node_ref(&self) -> NodeRef {
        NodeRef::new(self.name.clone(), self.id.clone(), self.page)
    }

    /// Resolve the bounding box.
    ///
    /// The explicit box wins; otherwise `x`, `y`, `width`, `height` are read
    /// from the attributes; otherwise the `points` polygon is fitted.
    pub fn bounding_box(&self) -> Result<BoundingBox> {
        let bbox = match self.bbox {
            Some(bbox) => bbox,
            None => self.attribute_box()?,
        };
        bbox.validate(|| self.node_ref())?;
        Ok(bbox)
    }

    /// True when the bounding box is fitted on the `points` polygon, i.e.
    /// there is neither an explicit box nor `x`/`y`/`width`/`height`.
    pub fn has_polygon_geometry(&self) -> bool {
        self.bbox.is_none() && !self.has_xywh() && self.has_attribute("points")
    }

    fn has_xywh(&self) -> bool {
        ["x", "y", "width", "height"]
            .iter()
            .any(|a| self.has_attribute(a))
    }

    fn attribute_box(&self) -> Result<BoundingBox> {
        if !self.has_xywh() {
            if let Some(points) = self.attribute("points") {
                let parsed = parse_points(points).ok_or_else(|| {
                    Error::invalid_geometry(
                        self.node_ref(),
                        format!("malformed points '{}'", points),
                    )
                })?;
                return BoundingBox::from_points(&parsed);
            }
        }

        Ok(BoundingBox::new(
            self.numeric_attribute("x")?,
            self.numeric_attribute("y")?,
            self.numeric_attribute("width")?,
            self.numeric_attribute("height")?,
        ))
    }

    /// Left edge.
    pub fn x(&self) -> Result<f64> {
        Ok(self.bounding_box()?.x)
    }

    /// Top edge.
    pub fn y(&self) -> Result<f64> {
        Ok(self.bounding_box()?.y)
    }

    /// Width.
    pub fn width(&self) -> Result<f64> {
        Ok(self.bounding_box()?.width)
    }

    /// Height.
    pub fn height(&self) -> Result<f64> {
        Ok(self.bounding_box()?.height)
    }

    /// Right edge.
    pub fn x2(&self) -> Result<f64> {
        Ok(self.bounding_box()?.x2())
    }

    /// Bottom edge.
    pub fn y2(&self) -> Result<f64> {
        Ok(self.bounding_box()?.y2())
    }

    /// Center point.
    pub fn center(&self) -> Result<(f64, f64)> {
        Ok(self.bounding_box()?.center())
    }

    /// Whether the boxes of two objects overlap (touching counts).
    pub fn overlap(&self, other: &SpatialObject) -> Result<bool> {
        Ok(self.bounding_box()?.overlap(&other.bounding_box()?))
    }

    /// Recompute this object's box as the enclosing box of every descendant
    /// matching `predicate`.
    ///
    /// Overwrites the stored box and the geometry attributes. Fails with
    /// `EmptyInput` when no descendant matches.
    pub fn resize_me<P>(&mut self, predicate: P) -> Result<BoundingBox>
    where
        P: Fn(&SpatialObject) -> bool,
    {
        let boxes = self
            .descendants()
            .filter(|o| predicate(o))
            .map(SpatialObject::bounding_box)
            .collect::<Result<Vec<_>>>()?;

        if boxes.is_empty() {
            return Err(Error::EmptyInput(format!(
                "no descendant of {} to resize to",
                self.node_ref()
            )));
        }

        let bbox = BoundingBox::enclosing(boxes)?;
        self.store_geometry(bbox);
        self.set_attribute("x2", bbox.x2().to_string());
        self.set_attribute("y2", bbox.y2().to_string());
        log::trace!("resized {} to {:?}", self.node_ref(), bbox);
        Ok(bbox)
    }

    /// Resize to the enclosing box of all descendants with the given name.
    pub fn resize_to(&mut self, name: &str) -> Result<BoundingBox> {
        self.resize_me(|o| o.name == name)
    }

    fn store_geometry(&mut self, bbox: BoundingBox) {
        self.bbox = Some(bbox);
        self.set_attribute("x", bbox.x.to_string());
        self.set_attribute("y", bbox.y.to_string());
        self.set_attribute("width", bbox.width.to_string());
        self.set_attribute("height", bbox.height.to_string());
    }

    /// Clip the object to a region.
    ///
    /// Returns a new tree holding the part of `self` inside `region`, or
    /// `None` when they do not overlap. Only geometry is clipped: a leaf that
    /// crosses the region border keeps its whole text content.
    pub fn clip(&self, region: &BoundingBox) -> Result<Option<SpatialObject>> {
        let bbox = self.bounding_box()?;
        let clipped_box = match bbox.intersection(region) {
            Some(b) => b,
            None => return Ok(None),
        };

        let mut clipped = SpatialObject::new(self.name.clone());
        clipped.id = self.id.clone();
        clipped.page = self.page;
        clipped.store_geometry(clipped_box);
        if self.children.is_empty() {
            clipped.content = self.content.clone();
        }

        for child in &self.children {
            if let Some(sub) = child.clip(region)? {
                clipped.children.push(sub);
            }
        }

        Ok(Some(clipped))
    }

    /// The cached feature sequence, if features were extracted already.
    pub fn cached_features(&self) -> Option<&FeatureSequence> {
        self.features.get()
    }

    pub(crate) fn feature_cache(&self) -> &OnceLock<FeatureSequence> {
        &self.features
    }

    /// Drop the cached features so the next extraction recomputes them.
    pub fn reset_features(&mut self) {
        self.features = OnceLock::new();
    }
}

/// Pre-order iterator over the descendants of an object.
pub struct Descendants<'a> {
    stack: Vec<&'a SpatialObject>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a SpatialObject;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}
