//! IPA parsing: tokenize word strings and accumulate feature vectors.

use log::warn;
use rayon::prelude::*;
use regex::Regex;

use crate::schema::{ConfigError, Diacritics, Segment, Segments, Word};

/// A word that could not be tokenized against the segment table.
///
/// Per-word and recoverable: the caller decides whether to skip the word
/// or abort the batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("cannot resolve {subword:?} in word {word:?} against the segment table")]
    UnresolvableSegment { word: String, subword: String },
}

/// A compiled IPA tokenizer for one segment/diacritic table pair.
///
/// The pattern matches one base segment character, any run of diacritics,
/// and optionally a second base-plus-diacritics run joined by U+0361
/// COMBINING DOUBLE INVERTED BREVE (which is how digraph keys such as
/// affricates are reached). Compiling it once gives a single linear
/// left-to-right matching pass per word.
#[derive(Debug)]
pub struct Tokenizer {
    regex: Regex,
}

impl Tokenizer {
    /// Compile the tokenizer for a table pair.
    pub fn new(segments: &Segments, diacritics: &Diacritics) -> Result<Self, ConfigError> {
        let bases: String = segments
            .single_chars()
            .map(|c| regex::escape(&c.to_string()))
            .collect();
        if bases.is_empty() {
            return Err(ConfigError::NoSingleCharacterSegments);
        }
        let marks: String = diacritics
            .chars()
            .map(|c| regex::escape(&c.to_string()))
            .collect();

        let pattern = if marks.is_empty() {
            format!("[{bases}](?:\u{0361}[{bases}])?")
        } else {
            format!("[{bases}][{marks}]*(?:\u{0361}[{bases}][{marks}]*)?")
        };

        Ok(Self {
            regex: Regex::new(&pattern)?,
        })
    }

    /// Split a word into segment tokens in one pass. Characters no token
    /// can start from are dropped with a warning.
    pub fn tokenize<'a>(&self, word: &'a str) -> Vec<&'a str> {
        let mut tokens = Vec::new();
        let mut last_end = 0;

        for found in self.regex.find_iter(word) {
            if found.start() > last_end {
                warn!(
                    "skipping unmatched {:?} in word {:?}",
                    &word[last_end..found.start()],
                    word
                );
            }
            tokens.push(found.as_str());
            last_end = found.end();
        }
        if last_end < word.len() {
            warn!("skipping unmatched {:?} in word {:?}", &word[last_end..], word);
        }

        tokens
    }

    /// Parse one word string into a [`Word`].
    pub fn parse_word(
        &self,
        word: &str,
        segments: &Segments,
        diacritics: &Diacritics,
    ) -> Result<Word, ParseError> {
        self.tokenize(word)
            .into_iter()
            .map(|token| {
                token_to_segment(token, segments, diacritics).map_err(|e| match e {
                    ParseError::UnresolvableSegment { subword, .. } => {
                        ParseError::UnresolvableSegment {
                            word: word.to_string(),
                            subword,
                        }
                    }
                })
            })
            .collect()
    }

    /// Parse a batch of word strings, in parallel across words.
    pub fn parse_words(
        &self,
        words: &[String],
        segments: &Segments,
        diacritics: &Diacritics,
    ) -> Result<Vec<Word>, ParseError> {
        words
            .par_iter()
            .map(|word| self.parse_word(word, segments, diacritics))
            .collect()
    }
}

/// Convert one token to a segment: look up the base characters as one
/// segment key, then fold each diacritic's delta onto it left to right.
/// Characters in neither table are dropped with a warning; a base that is
/// not a segment key is a [`ParseError`].
pub fn token_to_segment(
    token: &str,
    segments: &Segments,
    diacritics: &Diacritics,
) -> Result<Segment, ParseError> {
    let mut base = String::new();
    let mut marks = Vec::new();

    for c in token.chars() {
        if segments.contains_char(c) {
            base.push(c);
        } else if diacritics.contains_char(c) {
            marks.push(c);
        } else if c != '\u{0361}' {
            // The tie bar belongs to the token grammar, not the tables.
            warn!("unrecognised character {:?} in token {:?}", c, token);
        }
    }

    let Some(&vector) = segments.get(&base) else {
        return Err(ParseError::UnresolvableSegment {
            word: token.to_string(),
            subword: base,
        });
    };

    let mut segment = Segment::new(vector);
    for mark in marks {
        if let Some(delta) = diacritics.get(mark) {
            segment = segment.merged(delta);
        }
    }

    Ok(segment)
}
