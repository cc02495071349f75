//! Scoring metrics used as the evolution engine's optimization objective.
//!
//! Each metric is a pure function from a word to a comparable scalar,
//! supplied to the engine as a trait object so callers can plug in their
//! own.

use std::sync::LazyLock;

use crate::schema::{Conditions, FeatureSet, Rule, RuleDef, Word};

/// A word-scoring strategy.
pub trait Metric: Send + Sync {
    /// Score one word. Larger or smaller being "better" is decided by the
    /// engine's optimisation mode, not the metric.
    fn score(&self, word: &Word) -> f64;
}

/// The eight phonetic categories of Bauer's phonetic product: five places
/// of consonant articulation and three vowel backness classes.
static CATEGORIES: LazyLock<[Conditions; 8]> = LazyLock::new(|| {
    [
        // Bilabial
        Conditions::from_names(&["labial"], &["syllabic"]).unwrap(),
        // Apical
        Conditions::from_names(&["coronal", "anterior"], &["syllabic"]).unwrap(),
        // Palatal
        Conditions::from_names(&["distributed"], &["anterior", "syllabic"]).unwrap(),
        // Velar
        Conditions::from_names(&["dorsal"], &["syllabic"]).unwrap(),
        // Glottal
        Conditions::from_names::<&str>(&[], &["labial", "syllabic", "coronal", "dorsal"]).unwrap(),
        // Front vowel
        Conditions::from_names(&["front"], &["back"]).unwrap(),
        // Central vowel
        Conditions::from_names::<&str>(&[], &["front", "back"]).unwrap(),
        // Back vowel
        Conditions::from_names(&["back"], &["front"]).unwrap(),
    ]
});

/// Weights for the categories above, from Carterette and Jones's
/// frequency analysis of informal speech.
const CATEGORY_WEIGHTS: [f64; 8] = [
    0.1658, 0.3149, 0.01129, 0.04945, 0.04945, 0.18, 0.1431, 0.0709,
];

fn compile_rule(def: RuleDef) -> Rule {
    def.compile().unwrap()
}

/// Count how many segments fall into each category.
fn category_counts(word: &Word) -> [u64; 8] {
    let mut counts = [0u64; 8];
    for segment in word.segments() {
        for (category, conditions) in CATEGORIES.iter().enumerate() {
            if segment.meets(conditions) {
                counts[category] += 1;
            }
        }
    }
    counts
}

/// Bauer's phonetic product: the product of (category count + 1) over all
/// categories. A word with no categorised segments scores 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhoneticProduct;

impl Metric for PhoneticProduct {
    fn score(&self, word: &Word) -> f64 {
        category_counts(word)
            .iter()
            .map(|&count| (count + 1) as f64)
            .product()
    }
}

/// The phonetic product with each category count scaled by its empirical
/// frequency weight before the product is taken.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedPhoneticProduct;

impl Metric for WeightedPhoneticProduct {
    fn score(&self, word: &Word) -> f64 {
        category_counts(word)
            .iter()
            .zip(CATEGORY_WEIGHTS.iter())
            .map(|(&count, weight)| count as f64 * weight + 1.0)
            .product()
    }
}

/// A syllabic segment right after a non-syllabic one.
static CV_SYLLABLE: LazyLock<Rule> = LazyLock::new(|| {
    compile_rule(RuleDef {
        name: "cv-syllable".into(),
        description: String::new(),
        conditions: FeatureSet {
            positive: vec!["syllabic".into()],
            negative: vec![],
        },
        before: Some(FeatureSet {
            positive: vec![],
            negative: vec!["syllabic".into()],
        }),
        after: None,
        first: None,
        last: None,
        applies: FeatureSet::default(),
    })
});

/// A syllabic segment right before a non-syllabic one.
static VC_SYLLABLE: LazyLock<Rule> = LazyLock::new(|| {
    compile_rule(RuleDef {
        name: "vc-syllable".into(),
        description: String::new(),
        conditions: FeatureSet {
            positive: vec!["syllabic".into()],
            negative: vec![],
        },
        before: None,
        after: Some(FeatureSet {
            positive: vec![],
            negative: vec!["syllabic".into()],
        }),
        first: None,
        last: None,
        applies: FeatureSet::default(),
    })
});

/// A consonant preceded by a consonant and followed by a non-consonant:
/// one countable cluster boundary.
static CLUSTER: LazyLock<Rule> = LazyLock::new(|| {
    compile_rule(RuleDef {
        name: "cluster".into(),
        description: String::new(),
        conditions: FeatureSet {
            positive: vec!["consonantal".into()],
            negative: vec![],
        },
        before: Some(FeatureSet {
            positive: vec!["consonantal".into()],
            negative: vec![],
        }),
        after: Some(FeatureSet {
            positive: vec![],
            negative: vec!["consonantal".into()],
        }),
        first: None,
        last: None,
        applies: FeatureSet::default(),
    })
});

fn count_syllables(word: &Word) -> u64 {
    (0..word.len())
        .filter(|&i| {
            word.index_applicable(i, &CV_SYLLABLE) || word.index_applicable(i, &VC_SYLLABLE)
        })
        .count() as u64
}

fn count_clusters(word: &Word) -> u64 {
    (0..word.len())
        .filter(|&i| word.index_applicable(i, &CLUSTER))
        .count() as u64
}

/// Number of syllables, counted at consonant-vowel transitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyllableCount;

impl Metric for SyllableCount {
    fn score(&self, word: &Word) -> f64 {
        count_syllables(word) as f64
    }
}

/// Number of consonant clusters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsonantClusterCount;

impl Metric for ConsonantClusterCount {
    fn score(&self, word: &Word) -> f64 {
        count_clusters(word) as f64
    }
}

static LIQUID: LazyLock<Conditions> =
    LazyLock::new(|| Conditions::from_names(&["consonantal", "approximant"], &[]).unwrap());
static RHOTIC_VOWEL: LazyLock<Conditions> = LazyLock::new(|| {
    Conditions::from_names(&["syllabic", "coronal", "anterior", "distributed"], &["strident"])
        .unwrap()
});
static FRICATIVE_OR_AFFRICATE: LazyLock<Conditions> =
    LazyLock::new(|| Conditions::from_names(&["delayedrelease"], &[]).unwrap());
static VOICED: LazyLock<Conditions> =
    LazyLock::new(|| Conditions::from_names(&["voice"], &[]).unwrap());
static VELAR: LazyLock<Conditions> =
    LazyLock::new(|| Conditions::from_names(&["dorsal"], &["syllabic"]).unwrap());

/// Stoel-Gammon's Word Complexity Measure: points for length in
/// syllables, a final consonant, clusters, and marked segment classes.
/// An empty word scores 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordComplexity;

impl Metric for WordComplexity {
    fn score(&self, word: &Word) -> f64 {
        let mut score = 0u64;

        if count_syllables(word) > 2 {
            score += 1;
        }

        if let Some(last) = word.segments().last()
            && last.positive_features().any(|f| f == "consonantal")
        {
            score += 1;
        }

        score += count_clusters(word);

        for segment in word.segments() {
            if segment.meets(&VELAR) || segment.meets(&LIQUID) || segment.meets(&RHOTIC_VOWEL) {
                score += 1;
            } else if segment.meets(&FRICATIVE_OR_AFFRICATE) {
                score += 1;
                if segment.meets(&VOICED) {
                    score += 1;
                }
            }
        }

        score as f64
    }
}

/// A uniformly random score, for unbiased rule selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomValue;

impl Metric for RandomValue {
    fn score(&self, _word: &Word) -> f64 {
        rand::random()
    }
}
