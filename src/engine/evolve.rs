//! One generation of evolution: filter applicable rules, score every
//! candidate application, select the optimal rule.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::metrics::Metric;
use crate::schema::{Rule, Word};

/// Which end of the metric scale counts as optimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Optimisation {
    #[default]
    #[serde(alias = "min")]
    Minimise,
    #[serde(alias = "max")]
    Maximise,
}

impl Optimisation {
    /// The opposite mode; reverse evolution selects against the forward
    /// objective.
    #[must_use]
    pub fn inverted(self) -> Self {
        match self {
            Optimisation::Minimise => Optimisation::Maximise,
            Optimisation::Maximise => Optimisation::Minimise,
        }
    }

    /// Strict preference: equal scores never displace the incumbent, so
    /// the first-encountered candidate wins ties.
    fn prefers(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Optimisation::Minimise => candidate < incumbent,
            Optimisation::Maximise => candidate > incumbent,
        }
    }
}

/// Keep only the rules applicable to at least one word in the batch.
pub fn filter_rules<'a>(words: &[Word], rules: &'a [Rule]) -> Vec<&'a Rule> {
    rules
        .iter()
        .filter(|rule| words.iter().any(|word| word.applicable(rule)))
        .collect()
}

/// Apply one rule to every word in the batch.
pub fn apply_to_all(words: &[Word], rule: &Rule) -> Vec<Word> {
    words.iter().map(|word| word.apply_rule(rule)).collect()
}

/// Arithmetic mean of the metric over a batch; an empty batch scores 0.
pub fn mean_metric(words: &[Word], metric: &dyn Metric) -> f64 {
    if words.is_empty() {
        return 0.0;
    }
    words.iter().map(|word| metric.score(word)).sum::<f64>() / words.len() as f64
}

/// Run one generation: score each applicable rule's hypothetical effect on
/// the whole batch and select the optimal one.
///
/// Returns the selected rule's index into `rules` and the new batch, or
/// `None` when no rule is applicable (the engine's normal early-termination
/// signal). Candidate scoring is parallel but the results stay indexed, so
/// selection is deterministic regardless of completion order.
pub fn evolve_generation(
    words: &[Word],
    rules: &[Rule],
    metric: &dyn Metric,
    optimisation: Optimisation,
) -> Option<(usize, Vec<Word>)> {
    let candidates: Vec<(usize, &Rule)> = rules
        .iter()
        .enumerate()
        .filter(|(_, rule)| words.iter().any(|word| word.applicable(rule)))
        .collect();
    if candidates.is_empty() {
        return None;
    }

    let mut scored: Vec<(Vec<Word>, f64)> = candidates
        .par_iter()
        .map(|(_, rule)| {
            let applied = apply_to_all(words, rule);
            let score = mean_metric(&applied, metric);
            (applied, score)
        })
        .collect();

    let mut best = 0;
    for index in 1..scored.len() {
        if optimisation.prefers(scored[index].1, scored[best].1) {
            best = index;
        }
    }

    let (applied, _) = scored.swap_remove(best);
    Some((candidates[best].0, applied))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::metrics::PhoneticProduct;
    use crate::schema::{FeatureSet, RuleDef, Segment};

    fn seg(positive: &[&str], negative: &[&str]) -> Segment {
        Segment::from_sets(positive, negative).unwrap()
    }

    fn set(positive: &[&str], negative: &[&str]) -> FeatureSet {
        FeatureSet {
            positive: positive.iter().map(|s| s.to_string()).collect(),
            negative: negative.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn simple_rule(name: &str, conditions: FeatureSet, applies: FeatureSet) -> Rule {
        RuleDef {
            name: name.into(),
            description: String::new(),
            conditions,
            before: None,
            after: None,
            first: None,
            last: None,
            applies,
        }
        .compile()
        .unwrap()
    }

    /// A voiceless bilabial stop followed by a central vowel; the word
    /// scores (1+1) * (1+1) = 4 on the phonetic product.
    fn pa() -> Word {
        Word::new(vec![
            seg(&["consonantal", "labial"], &["syllabic", "voice", "nasal"]),
            seg(&["syllabic"], &["front", "back"]),
        ])
    }

    fn delabialize() -> Rule {
        simple_rule("delabialize", set(&["labial"], &[]), set(&[], &["labial"]))
    }

    fn nasal_stop() -> Rule {
        simple_rule(
            "nasal-stop",
            set(&["consonantal"], &["syllabic", "nasal"]),
            set(&["nasal"], &[]),
        )
    }

    #[test]
    fn test_filter_rules() {
        let inapplicable = simple_rule(
            "nasalization",
            set(&["syllabic"], &["nasal"]),
            set(&["nasal"], &[]),
        );
        let applicable = simple_rule("valid", set(&["syllabic"], &[]), set(&["long"], &[]));

        let words = vec![
            Word::new(vec![seg(&["consonantal"], &["long"]), seg(&["sonorant"], &["high"])]),
            Word::new(vec![seg(&["syllabic", "low"], &[]), seg(&["high"], &["sonorant"])]),
        ];

        let rules = vec![inapplicable, applicable];
        let kept = filter_rules(&words, &rules);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name(), "valid");
    }

    #[test]
    fn test_mean_metric() {
        let words = vec![pa(), Word::default()];
        // (4 + 1) / 2
        assert_eq!(mean_metric(&words, &PhoneticProduct), 2.5);
        assert_eq!(mean_metric(&[], &PhoneticProduct), 0.0);
    }

    #[test]
    fn test_generation_selects_by_optimisation_mode() {
        let words = vec![pa()];
        // Delabializing drops the bilabial category: score 2.
        // Nasalizing the stop changes no category: score stays 4.
        let rules = vec![delabialize(), nasal_stop()];

        let (index, _) =
            evolve_generation(&words, &rules, &PhoneticProduct, Optimisation::Minimise).unwrap();
        assert_eq!(rules[index].name(), "delabialize");

        let (index, _) =
            evolve_generation(&words, &rules, &PhoneticProduct, Optimisation::Maximise).unwrap();
        assert_eq!(rules[index].name(), "nasal-stop");
    }

    #[test]
    fn test_generation_returns_none_when_nothing_applies() {
        let words = vec![pa()];
        let rules = vec![simple_rule(
            "inapplicable",
            set(&["trill"], &[]),
            set(&[], &["voice"]),
        )];

        assert!(evolve_generation(&words, &rules, &PhoneticProduct, Optimisation::Minimise)
            .is_none());
        assert!(evolve_generation(&words, &[], &PhoneticProduct, Optimisation::Minimise).is_none());
    }

    #[test]
    fn test_equal_scores_keep_first_rule() {
        // Two rules with identical effects score identically; the earlier
        // one must win.
        let words = vec![pa()];
        let rules = vec![
            simple_rule("first", set(&["consonantal"], &["nasal"]), set(&["nasal"], &[])),
            simple_rule("second", set(&["consonantal"], &["nasal"]), set(&["nasal"], &[])),
        ];

        let (index, _) =
            evolve_generation(&words, &rules, &PhoneticProduct, Optimisation::Minimise).unwrap();
        assert_eq!(rules[index].name(), "first");
    }

    #[test]
    fn test_generation_is_deterministic() {
        let words = vec![pa(), Word::new(vec![seg(&["syllabic"], &["front", "back"])])];
        let rules = vec![delabialize(), nasal_stop()];

        let first =
            evolve_generation(&words, &rules, &PhoneticProduct, Optimisation::Minimise).unwrap();
        let second =
            evolve_generation(&words, &rules, &PhoneticProduct, Optimisation::Minimise).unwrap();

        assert_eq!(first.0, second.0);
        assert_eq!(first.1, second.1);
    }

    #[test]
    fn test_generations_converge_to_exhaustion() {
        // Each demo-style rule invalidates itself; two generations drain
        // the pool.
        let words = vec![pa()];
        let rules = vec![delabialize(), nasal_stop()];

        let (first_index, words) =
            evolve_generation(&words, &rules, &PhoneticProduct, Optimisation::Minimise).unwrap();
        assert_eq!(rules[first_index].name(), "delabialize");

        let (second_index, words) =
            evolve_generation(&words, &rules, &PhoneticProduct, Optimisation::Minimise).unwrap();
        assert_eq!(rules[second_index].name(), "nasal-stop");

        assert!(
            evolve_generation(&words, &rules, &PhoneticProduct, Optimisation::Minimise).is_none()
        );
    }
}
