//! JSON rendering for graph exports.

use crate::error::{Error, Result};

use super::GraphExport;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a graph export to JSON.
pub fn to_json(export: &GraphExport, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(export),
        JsonFormat::Compact => serde_json::to_string(export),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Read a graph export back from JSON.
///
/// Fails when an edge references a node index outside the node list.
pub fn from_json(json: &str) -> Result<GraphExport> {
    let export: GraphExport = serde_json::from_str(json)
        .map_err(|e| Error::Render(format!("JSON parse error: {}", e)))?;
    export.validate()?;
    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{Feature, FeatureSequence, FeatureValue};
    use crate::graph::EdgeKind;
    use crate::model::{BoundingBox, NodeRef};
    use crate::render::{IndexedEdge, NodeExport};

    fn sample() -> GraphExport {
        let node = NodeRef::new("TEXT", Some("t1".into()), Some(1));
        GraphExport {
            nodes: vec![NodeExport {
                node: node.clone(),
                bbox: Some(BoundingBox::new(0.0, 0.0, 5.0, 5.0)),
                features: FeatureSequence::new(vec![Feature {
                    name: "width".into(),
                    node,
                    object_name: "TEXT".into(),
                    value: FeatureValue::Numerical(5.0),
                    threshold: 0.5,
                }]),
            }],
            edges: vec![IndexedEdge {
                kind: EdgeKind::CrossPage,
                source: 0,
                target: 0,
            }],
        }
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"cross_page\""));
        assert!(json.contains("\"numerical\""));
        assert!(json.contains('\n')); // Pretty has newlines
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n')); // Compact has no newlines
    }

    #[test]
    fn test_json_reads_back() {
        let export = sample();
        let json = to_json(&export, JsonFormat::Compact).unwrap();
        assert_eq!(from_json(&json).unwrap(), export);
        assert!(matches!(from_json("{"), Err(Error::Render(_))));
    }

    #[test]
    fn test_from_json_rejects_dangling_edges() {
        let json = r#"{"nodes":[],"edges":[{"kind":"horizontal","source":0,"target":1}]}"#;
        assert!(matches!(from_json(json), Err(Error::Render(_))));
    }
}
