//! Feature extraction options.

/// Options for building node features.
#[derive(Debug, Clone)]
pub struct FeatureOptions {
    /// Attributes turned into features (`None` = every attribute)
    pub allowed_attributes: Option<Vec<String>>,

    /// Similarity threshold recorded on every feature
    pub threshold: f64,
}

impl FeatureOptions {
    /// Create new feature options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict features to the given attribute names.
    pub fn with_allowed_attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_attributes = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Use every attribute.
    pub fn all_attributes(mut self) -> Self {
        self.allowed_attributes = None;
        self
    }

    /// Set the similarity threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Whether an attribute is turned into a feature.
    pub fn allows(&self, attribute: &str) -> bool {
        match self.allowed_attributes {
            Some(ref names) => names.iter().any(|n| n == attribute),
            None => true,
        }
    }
}

impl Default for FeatureOptions {
    fn default() -> Self {
        Self {
            allowed_attributes: None,
            threshold: 0.5,
        }
    }
}
