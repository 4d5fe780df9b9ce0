//! Rendering module: owned exports for the labeling model and geometry
//! access for format converters.

mod coords;
mod export;
mod json;

pub use coords::{coords_points, page_xml_tag, CoordsOptions};
pub use export::{GraphExport, IndexedEdge, NodeExport};
pub use json::{from_json, to_json, JsonFormat};
