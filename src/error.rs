//! Error types for docgraph library.

use crate::model::NodeRef;
use thiserror::Error;

/// Result type alias for docgraph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building geometry, graphs or exports.
#[derive(Error, Debug)]
pub enum Error {
    /// A bounding box has negative, NaN or infinite dimensions, or a
    /// geometric attribute could not be read as a number.
    #[error("Invalid geometry for {node}: {reason}")]
    InvalidGeometry {
        /// The object carrying the bad geometry
        node: NodeRef,
        /// What was wrong with it
        reason: String,
    },

    /// An operation that needs at least one element received none.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// A geometry accessor needed an attribute the object does not carry.
    #[error("Missing attribute '{attribute}' on {node}")]
    MissingAttribute {
        /// The object lacking the attribute
        node: NodeRef,
        /// Name of the missing attribute
        attribute: String,
    },

    /// Error while serializing graph or feature records.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Build an `InvalidGeometry` error.
    pub fn invalid_geometry(node: NodeRef, reason: impl Into<String>) -> Self {
        Error::InvalidGeometry {
            node,
            reason: reason.into(),
        }
    }

    /// Build a `MissingAttribute` error.
    pub fn missing_attribute(node: NodeRef, attribute: impl Into<String>) -> Self {
        Error::MissingAttribute {
            node,
            attribute: attribute.into(),
        }
    }

    /// The object the error refers to, if any.
    pub fn node(&self) -> Option<&NodeRef> {
        match self {
            Error::InvalidGeometry { node, .. } | Error::MissingAttribute { node, .. } => {
                Some(node)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::EmptyInput("no boxes".to_string());
        assert_eq!(err.to_string(), "Empty input: no boxes");

        let node = NodeRef::new("TEXT", Some("t1".to_string()), Some(3));
        let err = Error::missing_attribute(node, "width");
        assert_eq!(
            err.to_string(),
            "Missing attribute 'width' on TEXT 't1' (page 3)"
        );
    }

    #[test]
    fn test_error_node_context() {
        let node = NodeRef::new("CELL", None, Some(2));
        let err = Error::invalid_geometry(node, "negative width -4");
        let ctx = err.node().unwrap();
        assert_eq!(ctx.page, Some(2));
        assert_eq!(ctx.name, "CELL");
        assert!(Error::Render("x".into()).node().is_none());
    }
}
