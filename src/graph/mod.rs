//! Graph construction over spatial objects.
//!
//! A page contributes horizontal and vertical neighbor edges between its own
//! objects, and cross-page edges to the overlapping objects of the page
//! before it. Edge enumeration order depends only on input order and
//! geometry, so two runs over the same document produce the same list.

mod builder;
mod edge;
mod neighbors;
mod options;

pub use builder::{DocumentGraph, GraphBuilder};
pub use edge::{Edge, EdgeKind, EdgeRecord};
pub use options::GraphOptions;
