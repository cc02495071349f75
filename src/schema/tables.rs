//! Read-only configuration tables: segment and diacritic inventories and
//! the deparse feature-string catalog.
//!
//! Tables are validated once at construction and never mutated, so they
//! can be shared freely across parallel workers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::schema::features::FeatureVector;

/// Fatal configuration errors, raised while building tables or compiling
/// rules. These abort before any evolution runs.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown feature name {0:?}")]
    UnknownFeature(String),
    #[error("trit values must be -1, 0, or 1")]
    InvalidTrit,
    #[error("feature string {0:?} must contain one '+'/'-'/'0' per feature")]
    InvalidFeatureString(String),
    #[error("segment key {0:?} is defined twice")]
    DuplicateSegment(String),
    #[error("unknown segment key {0:?}")]
    UnknownSegment(String),
    #[error("segment key must not be empty")]
    EmptySegmentKey,
    #[error("segment table has no single-character entries to tokenize with")]
    NoSingleCharacterSegments,
    #[error("diacritic key {0:?} must be a single character")]
    InvalidDiacriticKey(String),
    #[error("feature-string catalog is empty")]
    EmptyFeatureCatalog,
    #[error("failed to compile the segment tokenizer: {0}")]
    Tokenizer(#[from] regex::Error),
    #[error("malformed table input: {0}")]
    Format(#[from] serde_json::Error),
}

/// One row of the segment table: an IPA key (single character or digraph)
/// and its feature string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentRecord {
    pub ipa: String,
    pub features: String,
}

/// One row of the diacritic table: a modifier character and the feature
/// overrides it contributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiacriticRecord {
    pub ipa: String,
    pub conditions: crate::schema::rule::FeatureSet,
}

/// IPA base segments mapped to their feature vectors.
#[derive(Debug, Clone)]
pub struct Segments {
    map: HashMap<String, FeatureVector>,
}

impl Segments {
    /// Build and validate from records. Keys may be multi-character
    /// (affricate digraphs reached through tie-bar tokenization), but at
    /// least one single-character key must exist.
    pub fn from_records(records: &[SegmentRecord]) -> Result<Self, ConfigError> {
        let mut map = HashMap::with_capacity(records.len());

        for record in records {
            if record.ipa.is_empty() {
                return Err(ConfigError::EmptySegmentKey);
            }
            let vector = FeatureVector::from_feature_string(&record.features)?;
            if map.insert(record.ipa.clone(), vector).is_some() {
                return Err(ConfigError::DuplicateSegment(record.ipa.clone()));
            }
        }

        let table = Self { map };
        if table.single_chars().next().is_none() {
            return Err(ConfigError::NoSingleCharacterSegments);
        }
        Ok(table)
    }

    /// Build from a JSON array of records.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let records: Vec<SegmentRecord> = serde_json::from_str(json)?;
        Self::from_records(&records)
    }

    /// Look up a base segment by its IPA key.
    pub fn get(&self, ipa: &str) -> Option<&FeatureVector> {
        self.map.get(ipa)
    }

    /// True when the character is itself a base segment key.
    pub fn contains_char(&self, c: char) -> bool {
        let mut buf = [0u8; 4];
        let key: &str = c.encode_utf8(&mut buf);
        self.map.contains_key(key)
    }

    /// Single-character keys, sorted for reproducible tokenizer
    /// construction.
    pub fn single_chars(&self) -> impl Iterator<Item = char> + '_ {
        let mut chars: Vec<char> = self
            .map
            .keys()
            .filter_map(|k| {
                let mut it = k.chars();
                match (it.next(), it.next()) {
                    (Some(c), None) => Some(c),
                    _ => None,
                }
            })
            .collect();
        chars.sort_unstable();
        chars.into_iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Diacritic characters mapped to the feature deltas they contribute.
#[derive(Debug, Clone)]
pub struct Diacritics {
    map: HashMap<char, FeatureVector>,
}

impl Diacritics {
    /// Build and validate from records; every key must be one character.
    pub fn from_records(records: &[DiacriticRecord]) -> Result<Self, ConfigError> {
        let mut map = HashMap::with_capacity(records.len());

        for record in records {
            let mut chars = record.ipa.chars();
            let c = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => return Err(ConfigError::InvalidDiacriticKey(record.ipa.clone())),
            };

            let positive: Vec<&str> =
                record.conditions.positive.iter().map(String::as_str).collect();
            let negative: Vec<&str> =
                record.conditions.negative.iter().map(String::as_str).collect();
            let vector = FeatureVector::from_sets(&positive, &negative)?;

            if map.insert(c, vector).is_some() {
                return Err(ConfigError::DuplicateSegment(record.ipa.clone()));
            }
        }

        Ok(Self { map })
    }

    /// Build from a JSON array of records.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let records: Vec<DiacriticRecord> = serde_json::from_str(json)?;
        Self::from_records(&records)
    }

    /// Look up a diacritic's delta vector.
    pub fn get(&self, c: char) -> Option<&FeatureVector> {
        self.map.get(&c)
    }

    /// True when the character is a known diacritic.
    pub fn contains_char(&self, c: char) -> bool {
        self.map.contains_key(&c)
    }

    /// Diacritic characters, sorted for reproducible tokenizer
    /// construction.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        let mut chars: Vec<char> = self.map.keys().copied().collect();
        chars.sort_unstable();
        chars.into_iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// The ordered deparse catalog of (IPA string, feature vector) pairs.
///
/// Catalog order is part of the contract: when Hamming distance and IPA
/// length both tie, the earliest entry wins, so iteration order must be
/// the input order.
#[derive(Debug, Clone)]
pub struct FeatureStrings {
    entries: Vec<(String, FeatureVector)>,
}

impl FeatureStrings {
    /// Build and validate from (IPA, feature string) pairs; the catalog
    /// must be non-empty for deparsing to have a nearest match.
    pub fn from_records(records: &[(String, String)]) -> Result<Self, ConfigError> {
        if records.is_empty() {
            return Err(ConfigError::EmptyFeatureCatalog);
        }

        let mut entries = Vec::with_capacity(records.len());
        for (ipa, features) in records {
            if ipa.is_empty() {
                return Err(ConfigError::EmptySegmentKey);
            }
            entries.push((ipa.clone(), FeatureVector::from_feature_string(features)?));
        }

        Ok(Self { entries })
    }

    /// Build from a JSON array of `[ipa, features]` pairs.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let records: Vec<(String, String)> = serde_json::from_str(json)?;
        Self::from_records(&records)
    }

    /// Catalog entries in input order.
    #[inline]
    pub fn entries(&self) -> &[(String, FeatureVector)] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: empty catalogs are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::rule::FeatureSet;

    fn b_record() -> SegmentRecord {
        SegmentRecord {
            ipa: "b".into(),
            features: "---+-------+--+---000--00000".into(),
        }
    }

    #[test]
    fn test_segments_from_records() {
        let records = vec![b_record(), SegmentRecord {
            ipa: "bβ".into(),
            features: "---+--+----+--+---000--00000".into(),
        }];

        let segments = Segments::from_records(&records).unwrap();
        assert_eq!(segments.len(), 2);
        assert!(segments.contains_char('b'));
        assert!(!segments.contains_char('β'));
        assert!(segments.get("bβ").is_some());
        assert_eq!(segments.single_chars().collect::<Vec<_>>(), vec!['b']);
    }

    #[test]
    fn test_segments_reject_duplicates_and_empty_keys() {
        assert!(matches!(
            Segments::from_records(&[b_record(), b_record()]),
            Err(ConfigError::DuplicateSegment(_))
        ));
        assert!(matches!(
            Segments::from_records(&[SegmentRecord {
                ipa: String::new(),
                features: "0".repeat(28),
            }]),
            Err(ConfigError::EmptySegmentKey)
        ));
    }

    #[test]
    fn test_segments_require_single_char_entry() {
        let records = vec![SegmentRecord {
            ipa: "ts".into(),
            features: "0".repeat(28),
        }];
        assert!(matches!(
            Segments::from_records(&records),
            Err(ConfigError::NoSingleCharacterSegments)
        ));
    }

    #[test]
    fn test_diacritics_from_records() {
        let records = vec![DiacriticRecord {
            ipa: "ː".into(),
            conditions: FeatureSet {
                positive: vec!["long".into()],
                negative: vec![],
            },
        }];

        let diacritics = Diacritics::from_records(&records).unwrap();
        assert!(diacritics.contains_char('ː'));
        let vector = diacritics.get('ː').unwrap();
        assert_eq!(vector.positive_features().collect::<Vec<_>>(), vec!["long"]);
    }

    #[test]
    fn test_diacritics_reject_multichar_keys() {
        let records = vec![DiacriticRecord {
            ipa: "ːː".into(),
            conditions: FeatureSet::default(),
        }];
        assert!(matches!(
            Diacritics::from_records(&records),
            Err(ConfigError::InvalidDiacriticKey(_))
        ));
    }

    #[test]
    fn test_feature_strings_preserve_order() {
        let records = vec![
            ("b".to_string(), "---+-------+--+---000--00000".to_string()),
            ("p".to_string(), "---+----------+---000--00000".to_string()),
        ];

        let catalog = FeatureStrings::from_records(&records).unwrap();
        assert_eq!(catalog.entries()[0].0, "b");
        assert_eq!(catalog.entries()[1].0, "p");
    }

    #[test]
    fn test_feature_strings_reject_empty_catalog() {
        assert!(matches!(
            FeatureStrings::from_records(&[]),
            Err(ConfigError::EmptyFeatureCatalog)
        ));
    }

    #[test]
    fn test_from_json() {
        let segments =
            Segments::from_json(r#"[{"ipa": "b", "features": "---+-------+--+---000--00000"}]"#)
                .unwrap();
        assert!(segments.get("b").is_some());

        assert!(Segments::from_json("not json").is_err());
    }
}
