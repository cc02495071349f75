//! Segments and the condition tests rules run against them.

use super::features::{FeatureVector, feature_index};
use super::tables::ConfigError;

/// A single phoneme, canonically represented by its feature vector.
///
/// The vector form is what the engine computes with; the positive/negative
/// feature-name views exist for symbolic matching and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Segment {
    features: FeatureVector,
}

impl Segment {
    /// Wrap a feature vector as a segment.
    pub fn new(features: FeatureVector) -> Self {
        Self { features }
    }

    /// Build from positive/negative feature-name sets.
    pub fn from_sets(positive: &[&str], negative: &[&str]) -> Result<Self, ConfigError> {
        Ok(Self::new(FeatureVector::from_sets(positive, negative)?))
    }

    /// The canonical vector form.
    #[inline]
    pub fn features(&self) -> &FeatureVector {
        &self.features
    }

    /// Names of this segment's positive features.
    pub fn positive_features(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.features.positive_features()
    }

    /// Names of this segment's negative features.
    pub fn negative_features(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.features.negative_features()
    }

    /// Merge a delta vector onto this segment, non-zero entries winning.
    #[must_use]
    pub fn merged(&self, delta: &FeatureVector) -> Segment {
        Segment::new(self.features.merged(delta))
    }

    /// Subset test against compiled conditions: every required positive
    /// feature must be positive here and every required negative feature
    /// negative. Unspecified features on either side are permitted.
    pub fn meets(&self, conditions: &Conditions) -> bool {
        if conditions.unsatisfiable {
            return false;
        }
        conditions.positive.iter().all(|&i| self.features.get(i) == 1)
            && conditions.negative.iter().all(|&i| self.features.get(i) == -1)
    }
}

/// A rule's condition set, compiled from feature names to schema indices.
///
/// An empty condition set matches every segment. A set that named the
/// reserved deletion marker can never be satisfied: no segment carries it,
/// so such conditions (which arise from reversing deletion rules) compile
/// to a matcher that always fails rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conditions {
    positive: Vec<usize>,
    negative: Vec<usize>,
    unsatisfiable: bool,
}

impl Conditions {
    /// Compile from positive/negative feature-name sets.
    pub fn from_names<S: AsRef<str>>(positive: &[S], negative: &[S]) -> Result<Self, ConfigError> {
        let mut compiled = Conditions::default();

        for name in positive.iter().chain(negative.iter()) {
            if name.as_ref() == super::rule::DELETION {
                compiled.unsatisfiable = true;
            }
        }

        for name in positive {
            let name = name.as_ref();
            if name == super::rule::DELETION {
                continue;
            }
            compiled.positive.push(
                feature_index(name).ok_or_else(|| ConfigError::UnknownFeature(name.to_string()))?,
            );
        }
        for name in negative {
            let name = name.as_ref();
            if name == super::rule::DELETION {
                continue;
            }
            compiled.negative.push(
                feature_index(name).ok_or_else(|| ConfigError::UnknownFeature(name.to_string()))?,
            );
        }

        Ok(compiled)
    }

    /// True when no segment can ever satisfy these conditions.
    pub fn is_unsatisfiable(&self) -> bool {
        self.unsatisfiable
    }
}
