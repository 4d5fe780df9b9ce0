//! Attribute-to-feature conversion with per-object memoization.

use crate::model::{Document, SpatialObject};

use super::feature::{Feature, FeatureSequence, FeatureValue, EMPTY_FEATURE};
use super::options::FeatureOptions;

/// Builds the node features consumed by the labeling model.
///
/// The first extraction of an object is stored in the object itself; later
/// calls return that same sequence, whatever the extractor options. Call
/// [`SpatialObject::reset_features`] to force a recomputation.
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    options: FeatureOptions,
}

impl FeatureExtractor {
    /// Create an extractor with the given options.
    pub fn new(options: FeatureOptions) -> Self {
        Self { options }
    }

    /// The extractor options.
    pub fn options(&self) -> &FeatureOptions {
        &self.options
    }

    /// Features of an object, computed on first use.
    pub fn extract<'o>(&self, object: &'o SpatialObject) -> &'o FeatureSequence {
        object
            .feature_cache()
            .get_or_init(|| self.compute(object))
    }

    /// Features of each node, in the given order.
    pub fn extract_all<'o>(&self, nodes: &[&'o SpatialObject]) -> Vec<&'o FeatureSequence> {
        nodes.iter().map(|&node| self.extract(node)).collect()
    }

    /// Features of every object named `node_name`, page by page in document
    /// order; the same node order as
    /// [`GraphBuilder::build_document`](crate::graph::GraphBuilder::build_document).
    pub fn extract_document<'o>(
        &self,
        doc: &'o Document,
        node_name: &str,
    ) -> Vec<&'o FeatureSequence> {
        doc.pages
            .iter()
            .flat_map(|page| page.all_named_objects(node_name))
            .map(|node| self.extract(node))
            .collect()
    }

    fn compute(&self, object: &SpatialObject) -> FeatureSequence {
        let node = object.node_ref();
        let make = |name: &str, value: FeatureValue| Feature {
            name: name.to_string(),
            node: node.clone(),
            object_name: object.name.clone(),
            value,
            threshold: self.options.threshold,
        };

        let mut features: Vec<Feature> = object
            .attributes
            .iter()
            .filter(|(name, _)| self.options.allows(name))
            .map(|(name, raw)| make(name, FeatureValue::from_attribute(raw)))
            .collect();

        if features.is_empty() {
            features.push(make(EMPTY_FEATURE, FeatureValue::Boolean(true)));
        }

        log::trace!("extracted {} features for {}", features.len(), node);
        FeatureSequence::new(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureKind;
    use crate::model::names;

    #[test]
    fn test_numerical_and_edit_distance() {
        let obj = SpatialObject::new(names::CELL)
            .with_attribute("width", "12.5")
            .with_attribute("label", "table-cell");
        let extractor = FeatureExtractor::default();
        let seq = extractor.extract(&obj);

        assert_eq!(seq.len(), 2);
        let width = seq.get("width").unwrap();
        assert_eq!(width.kind(), FeatureKind::Numerical);
        assert_eq!(width.value, FeatureValue::Numerical(12.5));
        assert_eq!(width.object_name, names::CELL);
        assert_eq!(width.threshold, 0.5);
        assert_eq!(seq.get("label").unwrap().kind(), FeatureKind::EditDistance);
    }

    #[test]
    fn test_no_attributes_gives_sentinel() {
        let obj = SpatialObject::new(names::TEXT);
        let seq = FeatureExtractor::default().extract(&obj);

        assert_eq!(seq.len(), 1);
        assert!(seq.is_sentinel());
        let empty = &seq.features()[0];
        assert_eq!(empty.name, EMPTY_FEATURE);
        assert_eq!(empty.kind(), FeatureKind::Boolean);
        assert_eq!(empty.value, FeatureValue::Boolean(true));
    }

    #[test]
    fn test_filter_excludes_everything() {
        let obj = SpatialObject::new(names::TEXT).with_attribute("label", "x");
        let extractor =
            FeatureExtractor::new(FeatureOptions::new().with_allowed_attributes(["width"]));
        assert!(extractor.extract(&obj).is_sentinel());
    }

    #[test]
    fn test_memoized_first_call_wins() {
        let obj = SpatialObject::new(names::TEXT)
            .with_attribute("width", "3")
            .with_attribute("label", "x");

        let narrow =
            FeatureExtractor::new(FeatureOptions::new().with_allowed_attributes(["width"]));
        let first = narrow.extract(&obj);
        let second = FeatureExtractor::default().extract(&obj);

        assert!(std::ptr::eq(first, second));
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_reset_features() {
        let mut obj = SpatialObject::new(names::TEXT).with_attribute("width", "3");
        let extractor = FeatureExtractor::default();
        assert_eq!(extractor.extract(&obj).len(), 1);

        obj.set_attribute("height", "4");
        assert_eq!(extractor.extract(&obj).len(), 1);

        obj.reset_features();
        assert!(obj.cached_features().is_none());
        assert_eq!(extractor.extract(&obj).len(), 2);
    }
}
