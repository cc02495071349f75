//! The phonological feature schema and trit-valued feature vectors.
//!
//! Every segment is described by the same fixed, ordered set of features.
//! A feature is either negative (-1), unspecified (0), or positive (+1),
//! so a segment is a fixed-length vector of signed trits.

use std::fmt;

use super::tables::ConfigError;

/// Number of features in the schema.
pub const FEATURE_COUNT: usize = 28;

/// The fixed, globally agreed feature order. Feature strings, rule
/// definitions, and catalog entries all index into this order.
pub const FEATURES: [&str; FEATURE_COUNT] = [
    "syllabic",
    "stress",
    "long",
    "consonantal",
    "sonorant",
    "continuant",
    "delayedrelease",
    "approximant",
    "tap",
    "trill",
    "nasal",
    "voice",
    "spreadglottis",
    "constrictedglottis",
    "labial",
    "round",
    "labiodental",
    "coronal",
    "anterior",
    "distributed",
    "strident",
    "lateral",
    "dorsal",
    "high",
    "low",
    "front",
    "back",
    "tense",
];

/// Look up a feature's position in the schema.
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURES.iter().position(|&f| f == name)
}

/// A fixed-length vector of signed trits over [`FEATURES`].
///
/// Values are restricted to {-1, 0, +1}. Vectors are immutable once
/// constructed; the only way to derive a new one is [`FeatureVector::merged`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FeatureVector([i8; FEATURE_COUNT]);

impl FeatureVector {
    /// Build from raw trit values. Any entry outside {-1, 0, 1} is rejected.
    pub fn new(values: [i8; FEATURE_COUNT]) -> Result<Self, ConfigError> {
        if values.iter().any(|v| !(-1..=1).contains(v)) {
            return Err(ConfigError::InvalidTrit);
        }
        Ok(Self(values))
    }

    /// Build from a feature string of `+`/`-`/`0` characters, one per
    /// feature in schema order.
    pub fn from_feature_string(s: &str) -> Result<Self, ConfigError> {
        let mut values = [0i8; FEATURE_COUNT];
        let mut count = 0;

        for (i, c) in s.chars().enumerate() {
            if i >= FEATURE_COUNT {
                return Err(ConfigError::InvalidFeatureString(s.to_string()));
            }
            values[i] = match c {
                '+' => 1,
                '-' => -1,
                '0' => 0,
                _ => return Err(ConfigError::InvalidFeatureString(s.to_string())),
            };
            count += 1;
        }

        if count != FEATURE_COUNT {
            return Err(ConfigError::InvalidFeatureString(s.to_string()));
        }

        Ok(Self(values))
    }

    /// Build from positive/negative feature-name sets; unnamed features
    /// stay unspecified.
    pub fn from_sets(positive: &[&str], negative: &[&str]) -> Result<Self, ConfigError> {
        let mut values = [0i8; FEATURE_COUNT];

        for &name in positive {
            let idx = feature_index(name)
                .ok_or_else(|| ConfigError::UnknownFeature(name.to_string()))?;
            values[idx] = 1;
        }
        for &name in negative {
            let idx = feature_index(name)
                .ok_or_else(|| ConfigError::UnknownFeature(name.to_string()))?;
            values[idx] = -1;
        }

        Ok(Self(values))
    }

    /// Trit value at a feature position.
    #[inline]
    pub fn get(&self, index: usize) -> i8 {
        self.0[index]
    }

    /// All trit values in schema order.
    #[inline]
    pub fn values(&self) -> &[i8; FEATURE_COUNT] {
        &self.0
    }

    /// Override-merge with a delta vector: the delta's non-zero entries
    /// win, its zero entries never override. Left-to-right folds of this
    /// operation are associative (but not commutative).
    #[must_use]
    pub fn merged(&self, delta: &FeatureVector) -> FeatureVector {
        let mut values = self.0;
        for (v, d) in values.iter_mut().zip(delta.0.iter()) {
            if *d != 0 {
                *v = *d;
            }
        }
        FeatureVector(values)
    }

    /// Number of positions where two vectors disagree.
    pub fn hamming(&self, other: &FeatureVector) -> u32 {
        self.0
            .iter()
            .zip(other.0.iter())
            .filter(|(a, b)| a != b)
            .count() as u32
    }

    /// Names of positively specified features, in schema order.
    pub fn positive_features(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v == 1)
            .map(|(i, _)| FEATURES[i])
    }

    /// Names of negatively specified features, in schema order.
    pub fn negative_features(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v == -1)
            .map(|(i, _)| FEATURES[i])
    }
}

impl fmt::Display for FeatureVector {
    /// Renders the `+`/`-`/`0` feature-string form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for v in &self.0 {
            let c = match v {
                1 => '+',
                -1 => '-',
                _ => '0',
            };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}
