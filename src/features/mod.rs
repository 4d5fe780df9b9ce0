//! Node features for the labeling model.
//!
//! Every attribute of an object becomes one feature: numerical when the value
//! parses as a number, edit-distance otherwise. An object with no usable
//! attribute still yields one Boolean `EMPTY` feature.

mod extractor;
mod feature;
mod options;

pub use extractor::FeatureExtractor;
pub use feature::{Feature, FeatureKind, FeatureSequence, FeatureValue, EMPTY_FEATURE};
pub use options::FeatureOptions;
