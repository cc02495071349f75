//! Deparsing: match feature vectors back to the closest known IPA strings.

use std::collections::HashMap;
use std::sync::Mutex;

use rayon::prelude::*;

use crate::schema::{FeatureStrings, FeatureVector, Segment, Word};

/// Nearest-match deparser over one feature-string catalog.
///
/// The best match for a segment minimises, in order: Hamming distance to
/// the catalog vector, IPA length in characters (simpler transcriptions
/// win), and catalog position. Because common phonemes repeat constantly,
/// the vector-to-entry mapping is memoised; the cache lives as long as
/// this deparser, i.e. one batch, never across catalogs.
#[derive(Debug)]
pub struct Deparser<'a> {
    catalog: &'a FeatureStrings,
    cache: Mutex<HashMap<FeatureVector, usize>>,
}

impl<'a> Deparser<'a> {
    /// Create a deparser for a catalog.
    pub fn new(catalog: &'a FeatureStrings) -> Self {
        Self {
            catalog,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The catalog IPA string closest to this segment.
    pub fn match_segment(&self, segment: &Segment) -> &'a str {
        let vector = *segment.features();

        if let Ok(cache) = self.cache.lock()
            && let Some(&index) = cache.get(&vector)
        {
            return &self.catalog.entries()[index].0;
        }

        let index = self.scan(&vector);
        if let Ok(mut cache) = self.cache.lock() {
            // A concurrent scan of the same vector computed the same index,
            // so overwriting is harmless.
            cache.insert(vector, index);
        }

        &self.catalog.entries()[index].0
    }

    fn scan(&self, vector: &FeatureVector) -> usize {
        let mut best_index = 0;
        let mut best_key = (u32::MAX, usize::MAX);

        for (index, (ipa, candidate)) in self.catalog.entries().iter().enumerate() {
            let key = (vector.hamming(candidate), ipa.chars().count());
            // Strict comparison keeps the earliest catalog entry on ties.
            if key < best_key {
                best_key = key;
                best_index = index;
            }
        }

        best_index
    }

    /// Deparse one word, concatenating its matched segments in order.
    pub fn deparse_word(&self, word: &Word) -> String {
        word.segments()
            .iter()
            .map(|segment| self.match_segment(segment))
            .collect()
    }

    /// Deparse a batch of words, in parallel across words. Output order
    /// follows input order.
    pub fn deparse_words(&self, words: &[Word]) -> Vec<String> {
        words.par_iter().map(|word| self.deparse_word(word)).collect()
    }
}

/// Deparse a batch with a fresh per-batch cache.
pub fn deparse_words(words: &[Word], catalog: &FeatureStrings) -> Vec<String> {
    Deparser::new(catalog).deparse_words(words)
}
