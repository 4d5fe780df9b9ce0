//! Axis-aligned bounding boxes and polygon helpers.
//!
//! All overlap predicates use closed intervals: two boxes that only touch
//! along an edge overlap. Callers that need strict overlap must shrink one
//! side by an epsilon first.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::NodeRef;

/// An axis-aligned box in document coordinate units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Horizontal extent (>= 0)
    pub width: f64,
    /// Vertical extent (>= 0)
    pub height: f64,
}

impl BoundingBox {
    /// Create a box from its origin and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a box from two corners `(x1, y1)` and `(x2, y2)`.
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Right edge.
    pub fn x2(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn y2(&self) -> f64 {
        self.y + self.height
    }

    /// Center point.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Surface of the box.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Check the size invariant: finite coordinates, non-negative extent.
    pub fn is_valid(&self) -> bool {
        self.defect().is_none()
    }

    /// Fail with `InvalidGeometry` when the box breaks the size invariant.
    ///
    /// The node is only built when there is something to report.
    pub fn validate(&self, node: impl FnOnce() -> NodeRef) -> Result<()> {
        match self.defect() {
            Some(reason) => Err(Error::invalid_geometry(node(), reason)),
            None => Ok(()),
        }
    }

    fn defect(&self) -> Option<String> {
        if !(self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite())
        {
            return Some(format!(
                "non-finite box [{}, {}, {}, {}]",
                self.x, self.y, self.width, self.height
            ));
        }
        if self.width < 0.0 {
            return Some(format!("negative width {}", self.width));
        }
        if self.height < 0.0 {
            return Some(format!("negative height {}", self.height));
        }
        None
    }

    /// True iff the horizontal projections intersect (touching counts).
    pub fn overlap_x(&self, other: &BoundingBox) -> bool {
        self.x2().min(other.x2()) >= self.x.max(other.x)
    }

    /// True iff the vertical projections intersect (touching counts).
    pub fn overlap_y(&self, other: &BoundingBox) -> bool {
        self.y2().min(other.y2()) >= self.y.max(other.y)
    }

    /// True iff both projections intersect.
    pub fn overlap(&self, other: &BoundingBox) -> bool {
        self.overlap_x(other) && self.overlap_y(other)
    }

    /// The common part of two boxes, or `None` when they do not overlap.
    ///
    /// Touching boxes yield a degenerate box of zero width or height.
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        if !self.overlap(other) {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        Some(BoundingBox::new(
            x,
            y,
            self.x2().min(other.x2()) - x,
            self.y2().min(other.y2()) - y,
        ))
    }

    /// True iff `other` lies entirely inside `self` (edges included).
    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.x >= self.x && other.y >= self.y && other.x2() <= self.x2() && other.y2() <= self.y2()
    }

    /// True iff the point lies inside the box (edges included).
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x2() && y >= self.y && y <= self.y2()
    }

    /// Euclidean distance between the centers of two boxes.
    pub fn center_distance(&self, other: &BoundingBox) -> f64 {
        let (ax, ay) = self.center();
        let (bx, by) = other.center();
        (ax - bx).hypot(ay - by)
    }

    /// Smallest box enclosing every input box.
    ///
    /// Fails with `EmptyInput` when the iterator yields nothing.
    pub fn enclosing<I>(boxes: I) -> Result<BoundingBox>
    where
        I: IntoIterator<Item = BoundingBox>,
    {
        let mut iter = boxes.into_iter();
        let first = iter
            .next()
            .ok_or_else(|| Error::EmptyInput("no bounding box to enclose".to_string()))?;

        let (mut min_x, mut min_y, mut max_x, mut max_y) =
            (first.x, first.y, first.x2(), first.y2());
        for bb in iter {
            min_x = min_x.min(bb.x);
            min_y = min_y.min(bb.y);
            max_x = max_x.max(bb.x2());
            max_y = max_y.max(bb.y2());
        }

        Ok(BoundingBox::from_corners(min_x, min_y, max_x, max_y))
    }

    /// Fit the axis-aligned rectangle of a polygon.
    pub fn from_points(points: &[(f64, f64)]) -> Result<BoundingBox> {
        BoundingBox::enclosing(points.iter().map(|&(x, y)| BoundingBox::new(x, y, 0.0, 0.0)))
            .map_err(|_| Error::EmptyInput("polygon has no points".to_string()))
    }

    /// Reduce a rectangle fitted on a region polygon.
    ///
    /// Polygons drawn around text lines usually overlap their neighbors;
    /// without the reduction every line would overlap the lines above and
    /// below. At least a third of the width is kept. The resulting corners
    /// are rounded to integers; a line too thin for the vertical margin
    /// collapses to its rounded center line.
    pub fn shrink_for_graph(&self) -> BoundingBox {
        let (w, h) = (self.width, self.height);
        let dx = (w * 0.066).max(20f64.min(w / 3.0));
        // the vertical margin is capped by the width, not the height
        let dy = (h * 0.066).max(20f64.min(w / 3.0));

        let x1 = (self.x + dx).round();
        let x2 = (self.x2() - dx).round();
        let (mut y1, mut y2) = ((self.y + dy).round(), (self.y2() - dy).round());
        if y2 < y1 {
            let mid = (self.y + h / 2.0).round();
            (y1, y2) = (mid, mid);
        }
        BoundingBox::from_corners(x1, y1, x2, y2)
    }

    /// Closed polyline `"x,y x2,y x2,y2 x,y2 x,y"`, scaled from points
    /// (1/72 inch) to the given resolution and truncated to integers.
    pub fn to_polyline(&self, dpi: f64) -> String {
        let scale = dpi / 72.0;
        let corners = [
            (self.x, self.y),
            (self.x2(), self.y),
            (self.x2(), self.y2()),
            (self.x, self.y2()),
            (self.x, self.y),
        ];
        corners
            .iter()
            .map(|&(x, y)| format!("{},{}", (x * scale) as i64, (y * scale) as i64))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn points_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([-+]?\d+(?:\.\d+)?)\s*,\s*([-+]?\d+(?:\.\d+)?)\s*$")
            .expect("points pattern is valid")
    })
}

/// Parse a PageXml-style `points` value: `"972,43 1039,43 1039,104"`.
///
/// Returns `None` when any pair is malformed or the value holds no pair.
pub fn parse_points(value: &str) -> Option<Vec<(f64, f64)>> {
    let re = points_regex();
    let points = value
        .split_whitespace()
        .map(|pair| {
            let caps = re.captures(pair)?;
            let x = caps[1].parse::<f64>().ok()?;
            let y = caps[2].parse::<f64>().ok()?;
            Some((x, y))
        })
        .collect::<Option<Vec<_>>>()?;

    if points.is_empty() {
        None
    } else {
        Some(points)
    }
}
