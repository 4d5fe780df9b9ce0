//! Typed node features.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::model::NodeRef;

/// Name of the sentinel feature emitted for objects without attributes.
pub const EMPTY_FEATURE: &str = "EMPTY";

/// How a feature value is compared by the labeling model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    /// Compared by absolute difference
    Numerical,
    /// Compared by normalized edit distance
    EditDistance,
    /// Compared by equality
    Boolean,
}

/// A feature value; its variant determines the feature kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FeatureValue {
    /// A number parsed from an attribute
    Numerical(f64),
    /// A raw string attribute
    EditDistance(String),
    /// A flag
    Boolean(bool),
}

impl FeatureValue {
    /// The comparison kind of this value.
    pub fn kind(&self) -> FeatureKind {
        match self {
            FeatureValue::Numerical(_) => FeatureKind::Numerical,
            FeatureValue::EditDistance(_) => FeatureKind::EditDistance,
            FeatureValue::Boolean(_) => FeatureKind::Boolean,
        }
    }

    /// Parse an attribute value: numeric when it parses to a finite number,
    /// string otherwise (`"NaN"` and `"inf"` stay strings).
    pub fn from_attribute(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => FeatureValue::Numerical(v),
            _ => FeatureValue::EditDistance(raw.to_string()),
        }
    }
}

/// One named, typed feature of an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Feature name (the attribute name, or `EMPTY`)
    pub name: String,
    /// The object the feature was extracted from
    pub node: NodeRef,
    /// Type name of that object
    pub object_name: String,
    /// Typed value
    pub value: FeatureValue,
    /// Similarity threshold used when comparing two features
    pub threshold: f64,
}

impl Feature {
    /// Comparison kind.
    pub fn kind(&self) -> FeatureKind {
        self.value.kind()
    }

    /// Similarity in `[0, 1]` with another feature of the same name and kind.
    ///
    /// Numerical: `1 / (1 + |a - b|)`. Edit distance: normalized Levenshtein
    /// similarity of the NFC forms. Boolean: 1 when equal, 0 otherwise.
    /// `None` when names or kinds differ.
    pub fn similarity(&self, other: &Feature) -> Option<f64> {
        if self.name != other.name {
            return None;
        }
        match (&self.value, &other.value) {
            (FeatureValue::Numerical(a), FeatureValue::Numerical(b)) => {
                Some(1.0 / (1.0 + (a - b).abs()))
            }
            (FeatureValue::EditDistance(a), FeatureValue::EditDistance(b)) => {
                let a: String = a.nfc().collect();
                let b: String = b.nfc().collect();
                Some(strsim::normalized_levenshtein(&a, &b))
            }
            (FeatureValue::Boolean(a), FeatureValue::Boolean(b)) => {
                Some(if a == b { 1.0 } else { 0.0 })
            }
            _ => None,
        }
    }

    /// Whether two features are considered equal under this feature's
    /// threshold.
    ///
    /// Numerical values match when `|a - b| <= threshold`; strings when their
    /// similarity is at least the threshold; flags when equal.
    pub fn matches(&self, other: &Feature) -> bool {
        if self.name != other.name {
            return false;
        }
        match (&self.value, &other.value) {
            (FeatureValue::Numerical(a), FeatureValue::Numerical(b)) => {
                (a - b).abs() <= self.threshold
            }
            (FeatureValue::Boolean(a), FeatureValue::Boolean(b)) => a == b,
            (FeatureValue::EditDistance(_), FeatureValue::EditDistance(_)) => self
                .similarity(other)
                .map(|s| s >= self.threshold)
                .unwrap_or(false),
            _ => false,
        }
    }
}

/// Ordered features of one object. Never empty once extracted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSequence {
    features: Vec<Feature>,
}

impl FeatureSequence {
    /// Create a sequence from features.
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    /// The features in order.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Iterate over the features.
    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    /// Find a feature by name.
    pub fn get(&self, name: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.name == name)
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Check if the sequence holds no feature.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// True for the sentinel sequence of an object without usable attributes.
    pub fn is_sentinel(&self) -> bool {
        self.features.len() == 1 && self.features[0].name == EMPTY_FEATURE
    }
}

impl<'a> IntoIterator for &'a FeatureSequence {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}
