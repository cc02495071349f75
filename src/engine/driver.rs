//! The evolution engine driver: transcription, parsing, generational rule
//! selection, and deparsing, forward or in reverse.

use log::debug;
use serde::{Deserialize, Serialize};

use super::deparse::Deparser;
use super::evolve::{Optimisation, evolve_generation};
use super::metrics::Metric;
use super::parse::{ParseError, Tokenizer};
use crate::schema::{
    ConfigError, Diacritics, FeatureStrings, RewritePair, Rule, RuleDef, Segments, Word,
};

/// Separator in textual transcription-pair specs such as `"ng=ŋ"`.
pub const REWRITE_SEPARATOR: char = '=';

/// Request-level engine errors. Early termination is not one of them: a
/// generation with no applicable rules ends the run successfully with
/// [`Outcome::StoppedEarly`].
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Malformed tables or rules; fatal before any evolution runs.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A word that cannot be tokenized.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A malformed transcription pair in a request.
    #[error("transcription pair {0:?} is missing the '=' separator")]
    InvalidTranscriptionSpec(String),
}

/// Whether a run completed all requested generations or ran out of rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// All requested generations were applied.
    Completed,
    /// No candidate rule was applicable at this generation; the run
    /// returned what had been produced so far.
    StoppedEarly { generation: usize },
}

/// A log entry for one applied rule. In reverse mode this records the
/// reversed form actually applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedRule {
    pub name: String,
    pub description: String,
}

impl From<&Rule> for AppliedRule {
    fn from(rule: &Rule) -> Self {
        Self {
            name: rule.name().to_string(),
            description: rule.description().to_string(),
        }
    }
}

/// The result of an engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineRun {
    /// The evolved words, back in their original transcription.
    pub words: Vec<String>,
    /// The rules applied, in order.
    pub applied: Vec<AppliedRule>,
    /// How the run ended.
    pub outcome: Outcome,
}

/// Direction of a transcription pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteDirection {
    /// Orthographic to phonetic (plain → ipa).
    ToIpa,
    /// Phonetic to orthographic (ipa → plain).
    ToPlain,
}

/// Rewrite every word by applying each transcription pair in list order as
/// a literal substring replacement. The two directions are not guaranteed
/// to be exact inverses beyond simple pairs.
pub fn rewrite_words(
    words: &[String],
    pairs: &[RewritePair],
    direction: RewriteDirection,
) -> Vec<String> {
    words
        .iter()
        .map(|word| {
            pairs.iter().fold(word.clone(), |word, pair| match direction {
                RewriteDirection::ToIpa => word.replace(&pair.plain, &pair.ipa),
                RewriteDirection::ToPlain => word.replace(&pair.ipa, &pair.plain),
            })
        })
        .collect()
}

/// Parse textual `plain=ipa` pair specs as sent by request layers.
pub fn parse_rewrite_pairs(specs: &[String]) -> Result<Vec<RewritePair>, EngineError> {
    specs
        .iter()
        .map(|spec| {
            spec.split_once(REWRITE_SEPARATOR)
                .map(|(plain, ipa)| RewritePair {
                    plain: plain.to_string(),
                    ipa: ipa.to_string(),
                })
                .ok_or_else(|| EngineError::InvalidTranscriptionSpec(spec.clone()))
        })
        .collect()
}

/// Parse a batch of IPA word strings against a table pair.
pub fn parse_words(
    words: &[String],
    segments: &Segments,
    diacritics: &Diacritics,
) -> Result<Vec<Word>, EngineError> {
    let tokenizer = Tokenizer::new(segments, diacritics)?;
    Ok(tokenizer.parse_words(words, segments, diacritics)?)
}

/// The evolution engine: validated tables plus a compiled rule set.
///
/// Construction is the fatal-error boundary: bad tables or rules never
/// produce an `Engine`. The tables are read-only afterwards, so one engine
/// can serve concurrent runs.
#[derive(Debug)]
pub struct Engine {
    segments: Segments,
    diacritics: Diacritics,
    feature_strings: FeatureStrings,
    tokenizer: Tokenizer,
    rule_defs: Vec<RuleDef>,
    rules: Vec<Rule>,
}

impl Engine {
    /// Build an engine from loaded tables and rule definitions.
    pub fn new(
        segments: Segments,
        diacritics: Diacritics,
        feature_strings: FeatureStrings,
        rule_defs: Vec<RuleDef>,
    ) -> Result<Self, ConfigError> {
        let tokenizer = Tokenizer::new(&segments, &diacritics)?;
        let rules = rule_defs.iter().map(RuleDef::compile).collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            segments,
            diacritics,
            feature_strings,
            tokenizer,
            rule_defs,
            rules,
        })
    }

    /// The loaded rule definitions.
    pub fn rule_defs(&self) -> &[RuleDef] {
        &self.rule_defs
    }

    /// Parse word strings with this engine's tables.
    pub fn parse(&self, words: &[String]) -> Result<Vec<Word>, ParseError> {
        self.tokenizer.parse_words(words, &self.segments, &self.diacritics)
    }

    /// Deparse words with this engine's catalog.
    pub fn deparse(&self, words: &[Word]) -> Vec<String> {
        Deparser::new(&self.feature_strings).deparse_words(words)
    }

    /// Evolve words for up to `generations` generations.
    ///
    /// Words are transcribed to IPA once before the first generation and
    /// back once after the last. Each generation selects the applicable
    /// rule whose batch-mean metric score is optimal and commits it; when
    /// no rule applies the run stops early with partial results. In
    /// reverse mode every candidate rule is reversed up front and the
    /// optimisation mode is inverted, selecting the least-evolved
    /// plausible ancestor under the forward metric.
    pub fn run(
        &self,
        words: &[String],
        generations: usize,
        rewrite_rules: &[RewritePair],
        reverse: bool,
        metric: &dyn Metric,
        optimisation: Optimisation,
    ) -> Result<EngineRun, EngineError> {
        let transcribed = rewrite_words(words, rewrite_rules, RewriteDirection::ToIpa);
        let mut parsed = self.parse(&transcribed)?;

        let (mut remaining, optimisation) = if reverse {
            let reversed = self
                .rule_defs
                .iter()
                .map(|def| def.reverse().compile())
                .collect::<Result<Vec<_>, _>>()?;
            (reversed, optimisation.inverted())
        } else {
            (self.rules.clone(), optimisation)
        };

        let mut applied = Vec::new();
        let mut outcome = Outcome::Completed;

        for generation in 0..generations {
            match evolve_generation(&parsed, &remaining, metric, optimisation) {
                Some((index, evolved)) => {
                    // Retire the selected rule so later generations choose
                    // from the rules not yet applied in this run.
                    let rule = remaining.remove(index);
                    debug!("generation {}: applying {:?}", generation, rule.name());
                    applied.push(AppliedRule::from(&rule));
                    parsed = evolved;
                }
                None => {
                    debug!("generation {}: no applicable rules, stopping", generation);
                    outcome = Outcome::StoppedEarly { generation };
                    break;
                }
            }
        }

        let deparsed = self.deparse(&parsed);
        let words = rewrite_words(&deparsed, rewrite_rules, RewriteDirection::ToPlain);

        Ok(EngineRun {
            words,
            applied,
            outcome,
        })
    }

    /// Replay an externally supplied rule list, without selection or
    /// scoring. Forward replay applies each rule to every word in list
    /// order; reverse replay reverses each rule and walks the list back to
    /// front, undoing the most recently applied rule first.
    pub fn apply(
        &self,
        words: &[String],
        rules: &[RuleDef],
        rewrite_rules: &[RewritePair],
        reverse: bool,
    ) -> Result<Vec<String>, EngineError> {
        let transcribed = rewrite_words(words, rewrite_rules, RewriteDirection::ToIpa);
        let mut parsed = self.parse(&transcribed)?;

        let compiled: Vec<Rule> = if reverse {
            rules.iter().rev().map(|def| def.reverse().compile()).collect::<Result<_, _>>()?
        } else {
            rules.iter().map(RuleDef::compile).collect::<Result<_, _>>()?
        };

        for rule in &compiled {
            parsed = parsed.iter().map(|word| word.apply_rule(rule)).collect();
        }

        let deparsed = self.deparse(&parsed);
        Ok(rewrite_words(&deparsed, rewrite_rules, RewriteDirection::ToPlain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::metrics::PhoneticProduct;
    use crate::schema::inventory;

    fn engine() -> Engine {
        Engine::new(
            inventory::segments().unwrap(),
            inventory::diacritics().unwrap(),
            inventory::feature_strings().unwrap(),
            inventory::rules(),
        )
        .unwrap()
    }

    fn words(strings: &[&str]) -> Vec<String> {
        strings.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rewrite_pairs_fold_in_list_order() {
        let pairs = parse_rewrite_pairs(&words(&[
            "rr=ɾ", "rl=ɭ", "rn=ɳ", "rt=ʈ", "r=ɻ", "ng=ŋ", "y=j", "j=ʒ", "nn=n", "aa=aː",
            "uu=uː", "ii=iː", "dd=x",
        ]))
        .unwrap();

        let to_ipa = rewrite_words(&words(&["buurl"]), &pairs, RewriteDirection::ToIpa);
        assert_eq!(to_ipa, words(&["buːɭ"]));

        let to_plain = rewrite_words(&words(&["buːɭ"]), &pairs, RewriteDirection::ToPlain);
        assert_eq!(to_plain, words(&["buurl"]));
    }

    #[test]
    fn test_rewrite_pair_spec_requires_separator() {
        let result = parse_rewrite_pairs(&words(&["ng=ŋ", "broken"]));
        assert!(matches!(result, Err(EngineError::InvalidTranscriptionSpec(s)) if s == "broken"));
    }

    #[test]
    fn test_run_with_no_applicable_rules_keeps_words() {
        let engine = Engine::new(
            inventory::segments().unwrap(),
            inventory::diacritics().unwrap(),
            inventory::feature_strings().unwrap(),
            vec![],
        )
        .unwrap();

        let input = words(&["ama", "kasi"]);
        let run = engine
            .run(&input, 5, &[], false, &PhoneticProduct, Optimisation::Minimise)
            .unwrap();

        assert_eq!(run.words, input);
        assert!(run.applied.is_empty());
        assert_eq!(run.outcome, Outcome::StoppedEarly { generation: 0 });
    }

    #[test]
    fn test_run_is_deterministic() {
        let engine = engine();
        let input = words(&["ama", "apata", "bːɒtl"]);

        let first = engine
            .run(&input, 5, &[], false, &PhoneticProduct, Optimisation::Minimise)
            .unwrap();
        let second = engine
            .run(&input, 5, &[], false, &PhoneticProduct, Optimisation::Minimise)
            .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_run_records_one_rule_per_generation() {
        let engine = engine();
        let input = words(&["apata"]);

        let run = engine
            .run(&input, 3, &[], false, &PhoneticProduct, Optimisation::Minimise)
            .unwrap();

        match run.outcome {
            Outcome::Completed => assert_eq!(run.applied.len(), 3),
            Outcome::StoppedEarly { generation } => assert_eq!(run.applied.len(), generation),
        }
    }

    #[test]
    fn test_default_run_scenario() {
        // The demo inventory's reference scenario: five generations under
        // the minimised phonetic product, one rule retired per generation.
        let engine = engine();
        let input = words(&["ama", "apata", "bːɒtl"]);

        let run = engine
            .run(&input, 5, &[], false, &PhoneticProduct, Optimisation::Minimise)
            .unwrap();

        assert_eq!(run.words, words(&["aːm", "aːβat", "βɒtl"]));
        let applied: Vec<&str> = run.applied.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(applied, vec![
            "Apocope",
            "Voicing",
            "Spirantization",
            "Lengthening",
            "Degemination"
        ]);
        assert_eq!(run.outcome, Outcome::Completed);
    }

    #[test]
    fn test_degemination_applies_to_long_stop() {
        // bːɒtl carries the only long consonant; Degemination is the only
        // rule that can touch it, and shortens bː to b.
        let engine = engine();
        let defs: Vec<RuleDef> =
            engine.rule_defs().iter().filter(|d| d.name == "Degemination").cloned().collect();

        let result = engine.apply(&words(&["bːɒtl"]), &defs, &[], false).unwrap();
        assert_eq!(result, words(&["bɒtl"]));
    }

    #[test]
    fn test_apply_replays_fixed_rule_list() {
        // Voicing then Spirantization: apata -> abada -> aβaza.
        let engine = engine();
        let defs: Vec<RuleDef> = engine
            .rule_defs()
            .iter()
            .filter(|d| d.name == "Voicing" || d.name == "Spirantization")
            .cloned()
            .collect();

        let result = engine.apply(&words(&["apata"]), &defs, &[], false).unwrap();
        assert_eq!(result, words(&["aβaza"]));
    }

    #[test]
    fn test_apply_in_reverse_recovers_voicing() {
        let engine = engine();
        let defs: Vec<RuleDef> =
            engine.rule_defs().iter().filter(|d| d.name == "Voicing").cloned().collect();

        let forward = engine.apply(&words(&["apata"]), &defs, &[], false).unwrap();
        assert_eq!(forward, words(&["abada"]));

        let recovered = engine.apply(&forward, &defs, &[], true).unwrap();
        assert_eq!(recovered, words(&["apata"]));
    }

    #[test]
    fn test_apply_with_deletion_rule_drops_segment() {
        let engine = engine();
        let defs: Vec<RuleDef> =
            engine.rule_defs().iter().filter(|d| d.name == "Apocope").cloned().collect();

        let result = engine.apply(&words(&["kasi", "ama"]), &defs, &[], false).unwrap();
        assert_eq!(result, words(&["kas", "am"]));
    }

    #[test]
    fn test_run_transcribes_once_each_way() {
        // With no applicable rules the words still make the orthographic
        // round trip through the rewrite pairs.
        let engine = Engine::new(
            inventory::segments().unwrap(),
            inventory::diacritics().unwrap(),
            inventory::feature_strings().unwrap(),
            vec![],
        )
        .unwrap();

        let pairs = parse_rewrite_pairs(&words(&["aa=aː"])).unwrap();
        let run = engine
            .run(&words(&["maan"]), 2, &pairs, false, &PhoneticProduct, Optimisation::Minimise)
            .unwrap();

        assert_eq!(run.words, words(&["maan"]));
    }

    #[test]
    fn test_reverse_run_undoes_forward_run() {
        // Forward evolution with the Voicing rule alone turns apata into
        // abada; the reverse run must select the reversed rule and return
        // to apata.
        let voicing: Vec<RuleDef> =
            inventory::rules().into_iter().filter(|d| d.name == "Voicing").collect();
        let engine = Engine::new(
            inventory::segments().unwrap(),
            inventory::diacritics().unwrap(),
            inventory::feature_strings().unwrap(),
            voicing,
        )
        .unwrap();

        let forward = engine
            .run(&words(&["apata"]), 1, &[], false, &PhoneticProduct, Optimisation::Minimise)
            .unwrap();
        assert_eq!(forward.words, words(&["abada"]));
        assert_eq!(forward.applied.len(), 1);
        assert_eq!(forward.applied[0].name, "Voicing");

        let reverse = engine
            .run(&forward.words, 1, &[], true, &PhoneticProduct, Optimisation::Minimise)
            .unwrap();
        assert_eq!(reverse.words, words(&["apata"]));
        assert_eq!(reverse.applied.len(), 1);
        assert_eq!(reverse.applied[0].name, "Voicing");
    }
}
