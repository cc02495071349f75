//! Words as ordered segment sequences, with rule applicability and
//! application.

use super::rule::Rule;
use super::segment::Segment;

/// An ordered sequence of segments.
///
/// Words are immutable: applying a rule produces a new `Word`, so multiple
/// candidate evaluations against the same word stay independent. Equality
/// compares per-position feature sets, which the canonical vector form
/// makes a plain segment comparison.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Word {
    segments: Vec<Segment>,
}

impl Word {
    /// Build a word from its segments.
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// The segments in order.
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True for the empty word.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Check whether the segment at `index` satisfies the rule: its own
    /// conditions, the positional constraints, and the neighbour
    /// constraints. A `before`/`after` constraint with no neighbour at
    /// that side makes the rule inapplicable here, not an error.
    pub fn index_applicable(&self, index: usize, rule: &Rule) -> bool {
        if !self.segments[index].meets(rule.conditions()) {
            return false;
        }

        if let Some(first) = rule.first()
            && (index == 0) != first
        {
            return false;
        }

        if let Some(last) = rule.last()
            && (index == self.segments.len() - 1) != last
        {
            return false;
        }

        if let Some(before) = rule.before() {
            if index == 0 {
                return false;
            }
            if !self.segments[index - 1].meets(before) {
                return false;
            }
        }

        if let Some(after) = rule.after() {
            if index == self.segments.len() - 1 {
                return false;
            }
            if !self.segments[index + 1].meets(after) {
                return false;
            }
        }

        true
    }

    /// True if the rule applies at any position.
    pub fn applicable(&self, rule: &Rule) -> bool {
        (0..self.segments.len()).any(|i| self.index_applicable(i, rule))
    }

    /// Apply the rule at every applicable position, returning the new
    /// word. Matching segments receive the rule's feature delta, or are
    /// dropped entirely when the rule deletes.
    #[must_use]
    pub fn apply_rule(&self, rule: &Rule) -> Word {
        let mut segments = Vec::with_capacity(self.segments.len());

        for (i, segment) in self.segments.iter().enumerate() {
            if self.index_applicable(i, rule) {
                if !rule.deletes() {
                    segments.push(segment.merged(rule.applies()));
                }
            } else {
                segments.push(*segment);
            }
        }

        Word::new(segments)
    }
}

impl FromIterator<Segment> for Word {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Word::new(iter.into_iter().collect())
    }
}
