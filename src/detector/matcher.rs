// WHY: one Aho-Corasick pass over all active phrases replaces a per-phrase regex scan;
// same-offset conflicts are settled by an explicit ranking instead of set iteration order

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

use crate::dictionary::PhraseIndex;

/// A word-bounded phrase occurrence in normalized text (byte offsets)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseHit {
    pub start: usize,
    pub end: usize,
    pub phrase_id: usize,
}

/// Multi-pattern matcher over every active phrase
pub struct PhraseMatcher {
    automaton: Option<AhoCorasick>,
    phrases: Vec<String>,
    severities: Vec<u32>,
}

impl PhraseMatcher {
    /// Compile the automaton; phrases are sorted so pattern ids are stable across runs
    pub fn build(index: &PhraseIndex) -> Result<Self, aho_corasick::BuildError> {
        let mut phrases: Vec<String> = index.phrases().map(str::to_string).collect();
        phrases.sort_unstable();

        let severities = phrases
            .iter()
            .map(|p| index.info(p).map_or(0, |info| info.severity_score))
            .collect();

        let automaton = if phrases.is_empty() {
            None
        } else {
            Some(
                AhoCorasickBuilder::new()
                    .match_kind(MatchKind::Standard)
                    .build(&phrases)?,
            )
        };

        debug!("Compiled phrase automaton over {} patterns", phrases.len());
        Ok(Self {
            automaton,
            phrases,
            severities,
        })
    }

    pub fn phrase(&self, phrase_id: usize) -> &str {
        &self.phrases[phrase_id]
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// At most one hit per start offset, sorted by start
    ///
    /// Occurrences must sit on word boundaries at both ends. Occurrences of the
    /// same phrase never overlap each other (leftmost first). When several phrases
    /// start at one offset the longest wins, then the higher severity, then the
    /// lexicographically smaller phrase.
    pub fn find(&self, text: &str) -> Vec<PhraseHit> {
        let Some(automaton) = &self.automaton else {
            return Vec::new();
        };

        let mut last_end: HashMap<usize, usize> = HashMap::new();
        let mut best: HashMap<usize, PhraseHit> = HashMap::new();

        // Overlapping matches arrive ordered by end offset; for a single fixed-length
        // pattern that is also start order, so greedy acceptance is leftmost-first
        for m in automaton.find_overlapping_iter(text) {
            let hit = PhraseHit {
                start: m.start(),
                end: m.end(),
                phrase_id: m.pattern().as_usize(),
            };
            if !is_word_boundary(text, hit.start) || !is_word_boundary(text, hit.end) {
                continue;
            }
            if last_end.get(&hit.phrase_id).is_some_and(|&end| hit.start < end) {
                continue;
            }
            last_end.insert(hit.phrase_id, hit.end);

            match best.get(&hit.start) {
                Some(current) if self.rank(current, &hit) != Ordering::Less => {}
                _ => {
                    best.insert(hit.start, hit);
                }
            }
        }

        let mut hits: Vec<PhraseHit> = best.into_values().collect();
        hits.sort_by_key(|hit| hit.start);
        hits
    }

    /// Greater means `a` is preferred over `b` at the same start offset
    fn rank(&self, a: &PhraseHit, b: &PhraseHit) -> Ordering {
        (a.end - a.start)
            .cmp(&(b.end - b.start))
            .then_with(|| self.severities[a.phrase_id].cmp(&self.severities[b.phrase_id]))
            .then_with(|| self.phrases[b.phrase_id].cmp(&self.phrases[a.phrase_id]))
    }
}

/// Word characters follow the regex `\w` class: alphanumerics and underscore
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Transition between a word and a non-word char, with string ends as non-word
pub fn is_word_boundary(text: &str, byte_offset: usize) -> bool {
    let before = text[..byte_offset].chars().next_back().is_some_and(is_word_char);
    let after = text[byte_offset..].chars().next().is_some_and(is_word_char);
    before != after
}
