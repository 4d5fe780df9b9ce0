//! Document model: geometry and the spatial object tree.
//!
//! The tree is built once per document by an external parser and treated as
//! read-mostly afterwards. Graphs and feature sequences are derived from it
//! and borrow from it.

mod document;
mod geometry;
mod object;

pub use document::Document;
pub use geometry::{parse_points, BoundingBox};
pub use object::{names, Descendants, NodeRef, SpatialObject};
