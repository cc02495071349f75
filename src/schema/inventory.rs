//! A compact built-in IPA inventory and demo rule set.
//!
//! Stands in for externally loaded segment/diacritic/catalog tables in the
//! CLI example configuration, the benchmarks, and the test suite. The
//! feature values follow the usual articulator convention: place-dependent
//! features stay unspecified when their articulator is negative.

use super::rule::{DELETION, FeatureSet, RuleDef};
use super::tables::{
    ConfigError, DiacriticRecord, Diacritics, FeatureStrings, SegmentRecord, Segments,
};
use crate::schema::features::FeatureVector;

type SegmentDef = (&'static str, &'static [&'static str], &'static [&'static str]);

#[rustfmt::skip]
const DEMO_SEGMENTS: &[SegmentDef] = &[
    // Plosives
    ("p", &["consonantal", "labial"],
     &["syllabic", "stress", "long", "sonorant", "continuant", "delayedrelease", "approximant",
       "tap", "trill", "nasal", "voice", "spreadglottis", "constrictedglottis", "round",
       "labiodental", "coronal", "lateral", "dorsal"]),
    ("b", &["consonantal", "voice", "labial"],
     &["syllabic", "stress", "long", "sonorant", "continuant", "delayedrelease", "approximant",
       "tap", "trill", "nasal", "spreadglottis", "constrictedglottis", "round", "labiodental",
       "coronal", "lateral", "dorsal"]),
    ("t", &["consonantal", "coronal", "anterior"],
     &["syllabic", "stress", "long", "sonorant", "continuant", "delayedrelease", "approximant",
       "tap", "trill", "nasal", "voice", "spreadglottis", "constrictedglottis", "labial",
       "distributed", "strident", "lateral", "dorsal"]),
    ("d", &["consonantal", "voice", "coronal", "anterior"],
     &["syllabic", "stress", "long", "sonorant", "continuant", "delayedrelease", "approximant",
       "tap", "trill", "nasal", "spreadglottis", "constrictedglottis", "labial", "distributed",
       "strident", "lateral", "dorsal"]),
    ("k", &["consonantal", "dorsal", "high", "back"],
     &["syllabic", "stress", "long", "sonorant", "continuant", "delayedrelease", "approximant",
       "tap", "trill", "nasal", "voice", "spreadglottis", "constrictedglottis", "labial",
       "coronal", "lateral", "low", "front"]),
    ("g", &["consonantal", "voice", "dorsal", "high", "back"],
     &["syllabic", "stress", "long", "sonorant", "continuant", "delayedrelease", "approximant",
       "tap", "trill", "nasal", "spreadglottis", "constrictedglottis", "labial", "coronal",
       "lateral", "low", "front"]),
    // Nasals
    ("m", &["consonantal", "sonorant", "voice", "nasal", "labial"],
     &["syllabic", "stress", "long", "continuant", "delayedrelease", "approximant", "tap",
       "trill", "spreadglottis", "constrictedglottis", "round", "labiodental", "coronal",
       "lateral", "dorsal"]),
    ("n", &["consonantal", "sonorant", "voice", "nasal", "coronal", "anterior"],
     &["syllabic", "stress", "long", "continuant", "delayedrelease", "approximant", "tap",
       "trill", "spreadglottis", "constrictedglottis", "labial", "distributed", "strident",
       "lateral", "dorsal"]),
    ("ŋ", &["consonantal", "sonorant", "voice", "nasal", "dorsal", "high", "back"],
     &["syllabic", "stress", "long", "continuant", "delayedrelease", "approximant", "tap",
       "trill", "spreadglottis", "constrictedglottis", "labial", "coronal", "lateral", "low",
       "front"]),
    // Fricatives
    ("f", &["consonantal", "continuant", "delayedrelease", "labial", "labiodental"],
     &["syllabic", "stress", "long", "sonorant", "approximant", "tap", "trill", "nasal",
       "voice", "spreadglottis", "constrictedglottis", "round", "coronal", "lateral", "dorsal"]),
    ("v", &["consonantal", "continuant", "delayedrelease", "voice", "labial", "labiodental"],
     &["syllabic", "stress", "long", "sonorant", "approximant", "tap", "trill", "nasal",
       "spreadglottis", "constrictedglottis", "round", "coronal", "lateral", "dorsal"]),
    ("β", &["consonantal", "continuant", "delayedrelease", "voice", "labial"],
     &["syllabic", "stress", "long", "sonorant", "approximant", "tap", "trill", "nasal",
       "spreadglottis", "constrictedglottis", "round", "labiodental", "coronal", "lateral",
       "dorsal"]),
    ("s", &["consonantal", "continuant", "delayedrelease", "coronal", "anterior", "strident"],
     &["syllabic", "stress", "long", "sonorant", "approximant", "tap", "trill", "nasal",
       "voice", "spreadglottis", "constrictedglottis", "labial", "distributed", "lateral",
       "dorsal"]),
    ("z", &["consonantal", "continuant", "delayedrelease", "voice", "coronal", "anterior",
       "strident"],
     &["syllabic", "stress", "long", "sonorant", "approximant", "tap", "trill", "nasal",
       "spreadglottis", "constrictedglottis", "labial", "distributed", "lateral", "dorsal"]),
    ("ʃ", &["consonantal", "continuant", "delayedrelease", "coronal", "distributed", "strident"],
     &["syllabic", "stress", "long", "sonorant", "approximant", "tap", "trill", "nasal",
       "voice", "spreadglottis", "constrictedglottis", "labial", "anterior", "lateral",
       "dorsal"]),
    ("ʒ", &["consonantal", "continuant", "delayedrelease", "voice", "coronal", "distributed",
       "strident"],
     &["syllabic", "stress", "long", "sonorant", "approximant", "tap", "trill", "nasal",
       "spreadglottis", "constrictedglottis", "labial", "anterior", "lateral", "dorsal"]),
    ("x", &["consonantal", "continuant", "delayedrelease", "dorsal", "high", "back"],
     &["syllabic", "stress", "long", "sonorant", "approximant", "tap", "trill", "nasal",
       "voice", "spreadglottis", "constrictedglottis", "labial", "coronal", "lateral", "low",
       "front"]),
    ("h", &["continuant", "spreadglottis"],
     &["syllabic", "stress", "long", "consonantal", "sonorant", "delayedrelease", "approximant",
       "tap", "trill", "nasal", "voice", "constrictedglottis", "labial", "coronal", "lateral",
       "dorsal"]),
    // Liquids and glides
    ("l", &["consonantal", "sonorant", "voice", "continuant", "approximant", "coronal",
       "anterior", "lateral"],
     &["syllabic", "stress", "long", "delayedrelease", "tap", "trill", "nasal", "spreadglottis",
       "constrictedglottis", "labial", "distributed", "strident", "dorsal"]),
    ("r", &["consonantal", "sonorant", "voice", "continuant", "trill", "coronal", "anterior"],
     &["syllabic", "stress", "long", "delayedrelease", "approximant", "tap", "nasal",
       "spreadglottis", "constrictedglottis", "labial", "distributed", "strident", "lateral",
       "dorsal"]),
    ("j", &["sonorant", "voice", "continuant", "approximant", "dorsal", "high", "front"],
     &["syllabic", "stress", "long", "consonantal", "delayedrelease", "tap", "trill", "nasal",
       "spreadglottis", "constrictedglottis", "labial", "coronal", "lateral", "low", "back"]),
    ("w", &["sonorant", "voice", "continuant", "approximant", "labial", "round", "dorsal",
       "high", "back"],
     &["syllabic", "stress", "long", "consonantal", "delayedrelease", "tap", "trill", "nasal",
       "spreadglottis", "constrictedglottis", "labiodental", "coronal", "lateral", "low",
       "front"]),
    // Affricates, reached through tie-bar tokens such as t͡s
    ("ts", &["consonantal", "delayedrelease", "coronal", "anterior", "strident"],
     &["syllabic", "stress", "long", "sonorant", "continuant", "approximant", "tap", "trill",
       "nasal", "voice", "spreadglottis", "constrictedglottis", "labial", "distributed",
       "lateral", "dorsal"]),
    ("dz", &["consonantal", "delayedrelease", "voice", "coronal", "anterior", "strident"],
     &["syllabic", "stress", "long", "sonorant", "continuant", "approximant", "tap", "trill",
       "nasal", "spreadglottis", "constrictedglottis", "labial", "distributed", "lateral",
       "dorsal"]),
    ("kx", &["consonantal", "delayedrelease", "dorsal", "high", "back"],
     &["syllabic", "stress", "long", "sonorant", "continuant", "approximant", "tap", "trill",
       "nasal", "voice", "spreadglottis", "constrictedglottis", "labial", "coronal", "lateral",
       "low", "front"]),
    ("bβ", &["consonantal", "delayedrelease", "voice", "labial"],
     &["syllabic", "stress", "long", "sonorant", "continuant", "approximant", "tap", "trill",
       "nasal", "spreadglottis", "constrictedglottis", "round", "labiodental", "coronal",
       "lateral", "dorsal"]),
    // Vowels
    ("a", &["syllabic", "sonorant", "voice", "continuant", "approximant", "dorsal", "low"],
     &["stress", "long", "consonantal", "delayedrelease", "tap", "trill", "nasal",
       "spreadglottis", "constrictedglottis", "coronal", "lateral", "labial", "high", "front",
       "back", "tense"]),
    ("e", &["syllabic", "sonorant", "voice", "continuant", "approximant", "dorsal", "front",
       "tense"],
     &["stress", "long", "consonantal", "delayedrelease", "tap", "trill", "nasal",
       "spreadglottis", "constrictedglottis", "coronal", "lateral", "labial", "high", "low",
       "back"]),
    ("i", &["syllabic", "sonorant", "voice", "continuant", "approximant", "dorsal", "high",
       "front", "tense"],
     &["stress", "long", "consonantal", "delayedrelease", "tap", "trill", "nasal",
       "spreadglottis", "constrictedglottis", "coronal", "lateral", "labial", "low", "back"]),
    ("o", &["syllabic", "sonorant", "voice", "continuant", "approximant", "dorsal", "back",
       "tense", "labial", "round"],
     &["stress", "long", "consonantal", "delayedrelease", "tap", "trill", "nasal",
       "spreadglottis", "constrictedglottis", "coronal", "lateral", "labiodental", "high",
       "low", "front"]),
    ("u", &["syllabic", "sonorant", "voice", "continuant", "approximant", "dorsal", "high",
       "back", "tense", "labial", "round"],
     &["stress", "long", "consonantal", "delayedrelease", "tap", "trill", "nasal",
       "spreadglottis", "constrictedglottis", "coronal", "lateral", "labiodental", "low",
       "front"]),
    ("æ", &["syllabic", "sonorant", "voice", "continuant", "approximant", "dorsal", "low",
       "front"],
     &["stress", "long", "consonantal", "delayedrelease", "tap", "trill", "nasal",
       "spreadglottis", "constrictedglottis", "coronal", "lateral", "labial", "high", "back",
       "tense"]),
    ("ɒ", &["syllabic", "sonorant", "voice", "continuant", "approximant", "dorsal", "low",
       "back", "labial", "round"],
     &["stress", "long", "consonantal", "delayedrelease", "tap", "trill", "nasal",
       "spreadglottis", "constrictedglottis", "coronal", "lateral", "labiodental", "high",
       "front", "tense"]),
    ("ɔ", &["syllabic", "sonorant", "voice", "continuant", "approximant", "dorsal", "back",
       "labial", "round"],
     &["stress", "long", "consonantal", "delayedrelease", "tap", "trill", "nasal",
       "spreadglottis", "constrictedglottis", "coronal", "lateral", "labiodental", "high",
       "low", "front", "tense"]),
    ("ɪ", &["syllabic", "sonorant", "voice", "continuant", "approximant", "dorsal", "high",
       "front"],
     &["stress", "long", "consonantal", "delayedrelease", "tap", "trill", "nasal",
       "spreadglottis", "constrictedglottis", "coronal", "lateral", "labial", "low", "back",
       "tense"]),
    ("ə", &["syllabic", "sonorant", "voice", "continuant", "approximant", "dorsal"],
     &["stress", "long", "consonantal", "delayedrelease", "tap", "trill", "nasal",
       "spreadglottis", "constrictedglottis", "coronal", "lateral", "labial", "high", "low",
       "front", "back", "tense"]),
];

const DEMO_DIACRITICS: &[SegmentDef] = &[
    ("ː", &["long"], &[]),
    ("\u{0325}", &[], &["voice"]),
    ("\u{0303}", &["nasal"], &[]),
    ("ʰ", &["spreadglottis"], &[]),
];

/// Segments whose long (geminate) forms appear in the deparse catalog.
const LONG_CONSONANTS: &[&str] = &["p", "b", "t", "d", "k", "g", "m", "n", "s", "z", "l", "r"];

const VOWELS: &[&str] = &["a", "e", "i", "o", "u", "æ", "ɒ", "ɔ", "ɪ", "ə"];

fn lookup(ipa: &str) -> Result<FeatureVector, ConfigError> {
    DEMO_SEGMENTS
        .iter()
        .find(|(key, _, _)| *key == ipa)
        .ok_or_else(|| ConfigError::UnknownSegment(ipa.to_string()))
        .and_then(|(_, positive, negative)| FeatureVector::from_sets(positive, negative))
}

/// The demo segment table as records.
pub fn segment_records() -> Result<Vec<SegmentRecord>, ConfigError> {
    DEMO_SEGMENTS
        .iter()
        .map(|(ipa, positive, negative)| {
            Ok(SegmentRecord {
                ipa: (*ipa).to_string(),
                features: FeatureVector::from_sets(positive, negative)?.to_string(),
            })
        })
        .collect()
}

/// The demo diacritic table as records.
pub fn diacritic_records() -> Vec<DiacriticRecord> {
    DEMO_DIACRITICS
        .iter()
        .map(|(ipa, positive, negative)| DiacriticRecord {
            ipa: (*ipa).to_string(),
            conditions: FeatureSet {
                positive: positive.iter().map(|s| s.to_string()).collect(),
                negative: negative.iter().map(|s| s.to_string()).collect(),
            },
        })
        .collect()
}

/// The demo deparse catalog: every base segment, then long consonants and
/// vowels, then nasal vowels.
pub fn feature_string_records() -> Result<Vec<(String, String)>, ConfigError> {
    let long = FeatureVector::from_sets(&["long"], &[])?;
    let nasal = FeatureVector::from_sets(&["nasal"], &[])?;

    let mut records = Vec::new();
    for (ipa, positive, negative) in DEMO_SEGMENTS {
        let vector = FeatureVector::from_sets(positive, negative)?;
        records.push(((*ipa).to_string(), vector.to_string()));
    }
    for ipa in LONG_CONSONANTS.iter().chain(VOWELS.iter()) {
        let vector = lookup(ipa)?.merged(&long);
        records.push((format!("{}ː", ipa), vector.to_string()));
    }
    for ipa in VOWELS {
        let vector = lookup(ipa)?.merged(&nasal);
        records.push((format!("{}\u{0303}", ipa), vector.to_string()));
    }

    Ok(records)
}

/// The demo segment table.
pub fn segments() -> Result<Segments, ConfigError> {
    Segments::from_records(&segment_records()?)
}

/// The demo diacritic table.
pub fn diacritics() -> Result<Diacritics, ConfigError> {
    Diacritics::from_records(&diacritic_records())
}

/// The demo deparse catalog.
pub fn feature_strings() -> Result<FeatureStrings, ConfigError> {
    FeatureStrings::from_records(&feature_string_records()?)
}

fn names(features: &[&str]) -> Vec<String> {
    features.iter().map(|s| s.to_string()).collect()
}

/// The demo sound-change rules. Each rule's delta invalidates its own
/// conditions, so repeated selection converges instead of looping.
pub fn rules() -> Vec<RuleDef> {
    vec![
        RuleDef {
            name: "Voicing".into(),
            description: "Voiceless obstruents become voiced between vowels.".into(),
            conditions: FeatureSet {
                positive: names(&["consonantal"]),
                negative: names(&["voice", "sonorant"]),
            },
            before: Some(FeatureSet {
                positive: names(&["syllabic"]),
                negative: vec![],
            }),
            after: Some(FeatureSet {
                positive: names(&["syllabic"]),
                negative: vec![],
            }),
            first: None,
            last: None,
            applies: FeatureSet {
                positive: names(&["voice"]),
                negative: vec![],
            },
        },
        RuleDef {
            name: "Spirantization".into(),
            description: "Voiced plosives become fricatives.".into(),
            conditions: FeatureSet {
                positive: names(&["consonantal", "voice"]),
                negative: names(&["continuant", "sonorant", "delayedrelease"]),
            },
            before: None,
            after: None,
            first: None,
            last: None,
            applies: FeatureSet {
                positive: names(&["continuant", "delayedrelease"]),
                negative: vec![],
            },
        },
        RuleDef {
            name: "Nasalization".into(),
            description: "Vowels nasalize after nasal consonants.".into(),
            conditions: FeatureSet {
                positive: names(&["syllabic"]),
                negative: names(&["nasal"]),
            },
            before: Some(FeatureSet {
                positive: names(&["nasal"]),
                negative: vec![],
            }),
            after: None,
            first: None,
            last: None,
            applies: FeatureSet {
                positive: names(&["nasal"]),
                negative: vec![],
            },
        },
        RuleDef {
            name: "Lengthening".into(),
            description: "Vowels lengthen before voiced consonants.".into(),
            conditions: FeatureSet {
                positive: names(&["syllabic"]),
                negative: names(&["long"]),
            },
            before: None,
            after: Some(FeatureSet {
                positive: names(&["voice", "consonantal"]),
                negative: vec![],
            }),
            first: None,
            last: None,
            applies: FeatureSet {
                positive: names(&["long"]),
                negative: vec![],
            },
        },
        RuleDef {
            name: "Degemination".into(),
            description: "Long consonants shorten.".into(),
            conditions: FeatureSet {
                positive: names(&["consonantal", "long"]),
                negative: vec![],
            },
            before: None,
            after: None,
            first: None,
            last: None,
            applies: FeatureSet {
                positive: vec![],
                negative: names(&["long"]),
            },
        },
        RuleDef {
            name: "Final devoicing".into(),
            description: "Word-final voiced obstruents devoice.".into(),
            conditions: FeatureSet {
                positive: names(&["consonantal", "voice"]),
                negative: names(&["sonorant"]),
            },
            before: None,
            after: None,
            first: None,
            last: Some(true),
            applies: FeatureSet {
                positive: vec![],
                negative: names(&["voice"]),
            },
        },
        RuleDef {
            name: "Apocope".into(),
            description: "Word-final vowels are lost.".into(),
            conditions: FeatureSet {
                positive: names(&["syllabic"]),
                negative: vec![],
            },
            before: None,
            after: None,
            first: None,
            last: Some(true),
            applies: FeatureSet {
                positive: names(&[DELETION]),
                negative: vec![],
            },
        },
    ]
}

/// A few words drawn from the demo inventory.
pub fn sample_words() -> Vec<String> {
    vec!["ama".into(), "apata".into(), "bːɒtl".into(), "kasi".into()]
}
