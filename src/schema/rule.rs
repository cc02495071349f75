//! Declarative sound-change rules: definitions, compilation, and reversal.

use serde::{Deserialize, Serialize};

use super::features::{FEATURE_COUNT, FeatureVector, feature_index};
use super::segment::Conditions;
use super::tables::ConfigError;

/// Reserved feature name: its presence in `applies.positive` deletes the
/// matched segment instead of modifying it.
pub const DELETION: &str = "deletion";

/// A positive/negative pair of feature-name sets, as written in rule files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureSet {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

impl FeatureSet {
    /// True when a feature name appears in either polarity.
    pub fn contains(&self, name: &str) -> bool {
        self.positive.iter().any(|f| f == name) || self.negative.iter().any(|f| f == name)
    }

    fn compile(&self) -> Result<Conditions, ConfigError> {
        Conditions::from_names(&self.positive, &self.negative)
    }
}

/// A sound-change rule as defined in configuration.
///
/// `conditions` constrains the target segment, `before`/`after` its
/// neighbours, and `first`/`last` its position (`true`: must be at that
/// edge, `false`: must not be). `applies` is the feature delta merged
/// onto every matching segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDef {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub conditions: FeatureSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<FeatureSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<FeatureSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<bool>,
    pub applies: FeatureSet,
}

impl RuleDef {
    /// Validate against the feature schema and compile to the index-based
    /// form the engine runs. Unknown feature names are fatal.
    pub fn compile(&self) -> Result<Rule, ConfigError> {
        let mut delta = [0i8; FEATURE_COUNT];
        let mut deletes = false;

        for name in &self.applies.positive {
            if name == DELETION {
                deletes = true;
                continue;
            }
            let idx =
                feature_index(name).ok_or_else(|| ConfigError::UnknownFeature(name.clone()))?;
            delta[idx] = 1;
        }
        for name in &self.applies.negative {
            // The marker is not a real feature: "un-deleting" is
            // meaningless, so a negative deletion entry (produced by
            // reversing a deletion rule) contributes nothing.
            if name == DELETION {
                continue;
            }
            let idx =
                feature_index(name).ok_or_else(|| ConfigError::UnknownFeature(name.clone()))?;
            delta[idx] = -1;
        }

        Ok(Rule {
            name: self.name.clone(),
            description: self.description.clone(),
            conditions: self.conditions.compile()?,
            before: self.before.as_ref().map(FeatureSet::compile).transpose()?,
            after: self.after.as_ref().map(FeatureSet::compile).transpose()?,
            first: self.first,
            last: self.last,
            applies: FeatureVector::new(delta)?,
            deletes,
        })
    }

    /// Derive the rule that applies this rule in reverse.
    ///
    /// Context (`before`/`after`) and position constraints are unchanged.
    /// The application delta flips polarity, and the new conditions are the
    /// old application (what the forward rule produced) plus any old
    /// condition feature the rule didn't touch, with its original polarity.
    ///
    /// This is an approximation, not a true inverse: mergers and deletions
    /// destroy information no reversed rule can recover.
    pub fn reverse(&self) -> RuleDef {
        let applies = FeatureSet {
            positive: dedup(&self.applies.negative),
            negative: dedup(&self.applies.positive),
        };

        let mut conditions = self.applies.clone();
        for feature in &self.conditions.positive {
            if !conditions.contains(feature) {
                conditions.positive.push(feature.clone());
            }
        }
        for feature in &self.conditions.negative {
            if !conditions.contains(feature) {
                conditions.negative.push(feature.clone());
            }
        }

        RuleDef {
            name: self.name.clone(),
            description: self.description.clone(),
            conditions,
            before: self.before.clone(),
            after: self.after.clone(),
            first: self.first,
            last: self.last,
            applies,
        }
    }
}

/// Deduplicate, keeping first occurrences in order.
fn dedup(names: &[String]) -> Vec<String> {
    let mut seen = Vec::with_capacity(names.len());
    for name in names {
        if !seen.contains(name) {
            seen.push(name.clone());
        }
    }
    seen
}

/// A rule compiled against the feature schema, ready to run.
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    description: String,
    conditions: Conditions,
    before: Option<Conditions>,
    after: Option<Conditions>,
    first: Option<bool>,
    last: Option<bool>,
    applies: FeatureVector,
    deletes: bool,
}

impl Rule {
    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Conditions on the target segment.
    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }

    /// Conditions on the preceding segment, if any.
    pub fn before(&self) -> Option<&Conditions> {
        self.before.as_ref()
    }

    /// Conditions on the following segment, if any.
    pub fn after(&self) -> Option<&Conditions> {
        self.after.as_ref()
    }

    /// Word-initial position constraint.
    pub fn first(&self) -> Option<bool> {
        self.first
    }

    /// Word-final position constraint.
    pub fn last(&self) -> Option<bool> {
        self.last
    }

    /// The feature delta merged onto matching segments.
    pub fn applies(&self) -> &FeatureVector {
        &self.applies
    }

    /// True when matching segments are removed rather than modified.
    pub fn deletes(&self) -> bool {
        self.deletes
    }
}

/// An orthographic/phonetic transcription pair, applied by literal
/// substring replacement. Distinct from a phonological [`Rule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewritePair {
    pub plain: String,
    pub ipa: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(positive: &[&str], negative: &[&str]) -> FeatureSet {
        FeatureSet {
            positive: positive.iter().map(|s| s.to_string()).collect(),
            negative: negative.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn sets_equal(a: &FeatureSet, b: &FeatureSet) -> bool {
        let norm = |v: &[String]| {
            let mut v = v.to_vec();
            v.sort();
            v
        };
        norm(&a.positive) == norm(&b.positive) && norm(&a.negative) == norm(&b.negative)
    }

    #[test]
    fn test_reverse_rule_with_context() {
        let rule = RuleDef {
            name: "nasalization".into(),
            description: "A description.".into(),
            conditions: set(&["syllabic"], &["nasal"]),
            before: Some(set(&["nasal"], &[])),
            after: None,
            first: None,
            last: None,
            applies: set(&["nasal"], &[]),
        };

        let reversed = rule.reverse();

        assert_eq!(reversed.name, "nasalization");
        assert_eq!(reversed.description, "A description.");
        assert!(sets_equal(&reversed.applies, &set(&[], &["nasal"])));
        assert!(sets_equal(&reversed.conditions, &set(&["syllabic", "nasal"], &[])));
        assert_eq!(reversed.before, Some(set(&["nasal"], &[])));
        assert_eq!(reversed.after, None);
    }

    #[test]
    fn test_reverse_rule_swaps_polarity() {
        let rule = RuleDef {
            name: "A name".into(),
            description: "A description.".into(),
            conditions: set(&["syllabic"], &["consonantal"]),
            before: None,
            after: None,
            first: None,
            last: None,
            applies: set(&["consonantal"], &["syllabic"]),
        };

        let reversed = rule.reverse();

        assert!(sets_equal(&reversed.conditions, &set(&["consonantal"], &["syllabic"])));
        assert!(sets_equal(&reversed.applies, &set(&["syllabic"], &["consonantal"])));
    }

    #[test]
    fn test_reverse_rule_keeps_untouched_conditions() {
        let rule = RuleDef {
            name: "Palatalization".into(),
            description: "A description.".into(),
            conditions: set(&[], &["syllabic", "dorsal"]),
            before: None,
            after: None,
            first: None,
            last: None,
            applies: set(&["dorsal", "high", "front"], &["low", "back"]),
        };

        let reversed = rule.reverse();

        assert!(sets_equal(&reversed.applies, &set(&["low", "back"], &[
            "dorsal", "high", "front"
        ])));
        assert!(sets_equal(&reversed.conditions, &set(&["dorsal", "high", "front"], &[
            "low", "back", "syllabic"
        ])));
    }

    #[test]
    fn test_double_reversal_is_structurally_valid() {
        let rule = RuleDef {
            name: "Apocope".into(),
            description: "Final vowels are lost.".into(),
            conditions: set(&["syllabic"], &[]),
            before: None,
            after: None,
            first: None,
            last: Some(true),
            applies: set(&[DELETION], &[]),
        };

        // Reversal is lossy, so no round-trip equality; but the result must
        // stay a compilable rule with its identity intact.
        let double = rule.reverse().reverse();
        assert_eq!(double.name, rule.name);
        assert_eq!(double.description, rule.description);
        assert!(!double.conditions.positive.is_empty() || !double.conditions.negative.is_empty());
        assert!(double.compile().is_ok());
    }

    #[test]
    fn test_compile_deletion_rule() {
        let rule = RuleDef {
            name: "Apocope".into(),
            description: String::new(),
            conditions: set(&["syllabic"], &[]),
            before: None,
            after: None,
            first: None,
            last: Some(true),
            applies: set(&[DELETION], &[]),
        };

        let compiled = rule.compile().unwrap();
        assert!(compiled.deletes());
        assert_eq!(compiled.applies(), &FeatureVector::default());
    }

    #[test]
    fn test_compile_rejects_unknown_feature() {
        let rule = RuleDef {
            name: "bad".into(),
            description: String::new(),
            conditions: set(&["sibilant"], &[]),
            before: None,
            after: None,
            first: None,
            last: None,
            applies: set(&["voice"], &[]),
        };

        assert!(matches!(rule.compile(), Err(ConfigError::UnknownFeature(_))));
    }

    #[test]
    fn test_rule_def_json_round_trip() {
        let rule = RuleDef {
            name: "Voicing".into(),
            description: "Plosives voice between vowels.".into(),
            conditions: set(&["consonantal"], &["voice", "sonorant"]),
            before: Some(set(&["syllabic"], &[])),
            after: Some(set(&["syllabic"], &[])),
            first: None,
            last: None,
            applies: set(&["voice"], &[]),
        };

        let json = serde_json::to_string(&rule).unwrap();
        let back: RuleDef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rule);
    }
}
