//! Read-only geometry access for format converters (PageXml `Coords`).

use crate::error::Result;
use crate::model::{names, SpatialObject};

/// Options for producing `Coords` polylines.
#[derive(Debug, Clone)]
pub struct CoordsOptions {
    /// Target resolution; source coordinates are in points (1/72 inch)
    pub dpi: f64,
}

impl CoordsOptions {
    /// Create new coords options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target resolution.
    pub fn with_dpi(mut self, dpi: f64) -> Self {
        self.dpi = dpi;
        self
    }
}

impl Default for CoordsOptions {
    fn default() -> Self {
        Self { dpi: 300.0 }
    }
}

/// `Coords/@points` value of an object.
///
/// An existing `points` attribute is returned verbatim; otherwise the
/// bounding box is turned into a closed polyline at the target resolution.
pub fn coords_points(object: &SpatialObject, options: &CoordsOptions) -> Result<String> {
    if let Some(points) = object.attribute("points") {
        return Ok(points.to_string());
    }
    Ok(object.bounding_box()?.to_polyline(options.dpi))
}

/// PageXml element name for an object type, if it has one.
pub fn page_xml_tag(name: &str) -> Option<&'static str> {
    match name {
        names::PAGE => Some("Page"),
        names::TEXT => Some("TextLine"),
        names::BLOCK => Some("TextRegion"),
        names::GRAPHELT => Some("LineDrawingRegion"),
        _ => None,
    }
}
