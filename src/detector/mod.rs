// WHY: top-level detection interface; construction is fallible, detection is total

use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

use crate::config::DetectorConfig;
use crate::dictionary::{
    csv_source, Category, DictionaryEntry, DictionaryStats, PhraseDictionary, PhraseInfo,
    RootWordTable,
};
use crate::error::EngineError;
use crate::obfuscation::ObfuscationExpander;

pub mod matcher;
pub mod normalization;
pub mod tokens;

pub use matcher::{PhraseHit, PhraseMatcher};
pub use normalization::{normalize_text, normalize_text_into};

/// Which scan produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    /// Word-bounded phrase occurrence in the normalized text
    Direct,
    /// Whitespace token whose de-obfuscated form is an active phrase
    Obfuscated,
}

/// One reported span
///
/// `start_offset` counts chars in the normalized text. Detail fields are only
/// filled when details were requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionMatch {
    pub matched_text: String,
    pub matched_as: String,
    pub start_offset: usize,
    pub source: MatchSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_form: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity_score: Option<u32>,
}

/// Outcome of scanning one text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionResult {
    pub is_toxic: bool,
    pub match_count: usize,
    /// `matched_text` of every match, in offset order
    pub matched_phrases: Vec<String>,
    /// Matches sorted by `start_offset`
    pub matches: Vec<DetectionMatch>,
}

impl DetectionResult {
    fn from_matches(matches: Vec<DetectionMatch>) -> Self {
        Self {
            is_toxic: !matches.is_empty(),
            match_count: matches.len(),
            matched_phrases: matches.iter().map(|m| m.matched_text.clone()).collect(),
            matches,
        }
    }

    pub fn clean() -> Self {
        Self::from_matches(Vec::new())
    }
}

/// Match found during a scan, keyed by byte offset until result assembly
struct PendingMatch {
    byte_start: usize,
    matched_text: String,
    matched_as: String,
    source: MatchSource,
}

/// Dictionary-backed toxicity detector
pub struct DetectionEngine {
    dictionary: PhraseDictionary,
    matcher: PhraseMatcher,
    expander: ObfuscationExpander,
    config: DetectorConfig,
}

impl DetectionEngine {
    /// Build from raw dictionary rows with the default root-word table
    pub fn from_entries(entries: Vec<DictionaryEntry>, config: DetectorConfig) -> Result<Self, EngineError> {
        Self::from_entries_with_roots(entries, config, &RootWordTable::default())
    }

    /// Build from raw dictionary rows and an injected root-word table
    pub fn from_entries_with_roots(
        entries: Vec<DictionaryEntry>,
        config: DetectorConfig,
        roots: &RootWordTable,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let dictionary = PhraseDictionary::load_with_roots(entries, config.threshold(), roots)?;
        Self::assemble(dictionary, config)
    }

    /// Read a slang CSV and build the engine
    pub fn from_path(dictionary_path: impl AsRef<Path>, config: DetectorConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let entries = csv_source::read_entries_from_path(dictionary_path)?;
        Self::from_entries(entries, config)
    }

    fn assemble(dictionary: PhraseDictionary, config: DetectorConfig) -> Result<Self, EngineError> {
        let matcher = PhraseMatcher::build(dictionary.index())?;
        let expander = ObfuscationExpander::new(config.max_expansion_candidates);
        info!(
            "Detection engine ready: {} active phrases, threshold {}, expansion cap {}",
            matcher.len(),
            config.severity_threshold,
            config.max_expansion_candidates
        );
        Ok(Self {
            dictionary,
            matcher,
            expander,
            config,
        })
    }

    pub fn dictionary(&self) -> &PhraseDictionary {
        &self.dictionary
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Scan `text` for toxic phrases
    ///
    /// Phase A reports word-bounded dictionary phrases. Phase B checks each
    /// whitespace token not already claimed by Phase A against its
    /// de-obfuscated candidates. At most one match is reported per offset.
    pub fn detect(&self, text: &str, want_details: bool) -> DetectionResult {
        let normalized = normalize_text(text);
        if normalized.is_empty() {
            return DetectionResult::clean();
        }

        let index = self.dictionary.index();
        let mut claimed: HashSet<usize> = HashSet::new();
        let mut pending: Vec<PendingMatch> = Vec::new();

        for hit in self.matcher.find(&normalized) {
            claimed.insert(hit.start);
            let phrase = self.matcher.phrase(hit.phrase_id).to_string();
            pending.push(PendingMatch {
                byte_start: hit.start,
                matched_text: phrase.clone(),
                matched_as: phrase,
                source: MatchSource::Direct,
            });
        }

        for token in tokens::tokens_with_offsets(&normalized) {
            if claimed.contains(&token.start) {
                continue;
            }
            // Quoted or bracketed tokens whose body was already matched directly
            if tokens::first_kept_offset(&token).is_some_and(|offset| claimed.contains(&offset)) {
                continue;
            }
            let cleaned = tokens::clean_token(token.text);
            if cleaned.is_empty() {
                continue;
            }
            let hit = self
                .expander
                .expand(&cleaned)
                .into_iter()
                .find(|candidate| index.contains(candidate));
            if let Some(candidate) = hit {
                claimed.insert(token.start);
                pending.push(PendingMatch {
                    byte_start: token.start,
                    matched_text: cleaned,
                    matched_as: candidate,
                    source: MatchSource::Obfuscated,
                });
            }
        }

        pending.sort_by_key(|m| m.byte_start);

        let mut matches = Vec::with_capacity(pending.len());
        let mut chars_before = 0usize;
        let mut last_byte = 0usize;
        for m in pending {
            chars_before += normalized[last_byte..m.byte_start].chars().count();
            last_byte = m.byte_start;

            let info: Option<&PhraseInfo> = if want_details { index.info(&m.matched_as) } else { None };
            matches.push(DetectionMatch {
                canonical_form: info.map(|i| i.canonical_form.clone()),
                category: info.map(|i| i.category.clone()),
                severity_score: info.map(|i| i.severity_score),
                matched_text: m.matched_text,
                matched_as: m.matched_as,
                start_offset: chars_before,
                source: m.source,
            });
        }

        debug!(
            "Detected {} matches in {} normalized bytes",
            matches.len(),
            normalized.len()
        );
        DetectionResult::from_matches(matches)
    }

    /// Detect each input independently, in order, without details
    pub fn detect_many<S: AsRef<str>>(&self, texts: &[S]) -> Vec<DetectionResult> {
        texts.iter().map(|text| self.detect(text.as_ref(), false)).collect()
    }

    /// Aggregate statistics over the retained dictionary entries
    pub fn get_statistics(&self) -> DictionaryStats {
        self.dictionary.statistics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(phrase: &str, category: &str, score: u32) -> DictionaryEntry {
        DictionaryEntry::new(phrase, None, Category::parse(category), score)
    }

    fn engine() -> DetectionEngine {
        DetectionEngine::from_entries(
            vec![
                entry("ragebait", "negative", 4),
                entry("goated", "positive", 1),
                entry("fuckton", "neutral", 2),
                entry("fcks", "negative", 3),
                entry("son of a bitch", "negative", 5),
            ],
            DetectorConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_clean_sentence() {
        let result = engine().detect("This is a wonderful day!", false);
        assert!(!result.is_toxic);
        assert_eq!(result.match_count, 0);
        assert!(result.matches.is_empty());
    }

    #[test]
    fn test_direct_phrase() {
        let result = engine().detect("Stop posting ragebait content", true);
        assert!(result.is_toxic);
        assert_eq!(result.match_count, 1);
        let m = &result.matches[0];
        assert_eq!(m.matched_text, "ragebait");
        assert_eq!(m.matched_as, "ragebait");
        assert_eq!(m.start_offset, 13);
        assert_eq!(m.source, MatchSource::Direct);
        assert_eq!(m.severity_score, Some(4));
    }

    #[test]
    fn test_two_roots() {
        let result = engine().detect("fuck this shit", false);
        assert_eq!(result.match_count, 2);
        assert_eq!(result.matched_phrases, vec!["fuck", "shit"]);
    }

    #[test]
    fn test_leet_token() {
        let result = engine().detect("f0ck", true);
        assert_eq!(result.match_count, 1);
        let m = &result.matches[0];
        assert_eq!(m.matched_text, "f0ck");
        assert_eq!(m.matched_as, "fuck");
        assert_eq!(m.source, MatchSource::Obfuscated);
        assert_eq!(m.category, Some(Category::Negative));
    }

    #[test]
    fn test_positive_below_threshold() {
        assert!(!engine().detect("That play was goated!", false).is_toxic);
        assert!(!engine().detect("a fuckton of work", false).is_toxic);
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert_eq!(engine().detect("", false), DetectionResult::clean());
        assert_eq!(engine().detect(" \n\t ", true), DetectionResult::clean());
    }

    #[test]
    fn test_offsets_are_char_based() {
        let result = engine().detect("😡😡  Crap", false);
        assert_eq!(result.matches[0].start_offset, 3);
    }

    #[test]
    fn test_repeated_obfuscated_tokens_each_reported() {
        let result = engine().detect("sh1t sh1t", false);
        let offsets: Vec<usize> = result.matches.iter().map(|m| m.start_offset).collect();
        assert_eq!(offsets, vec![0, 5]);
    }

    #[test]
    fn test_quoted_direct_match_not_double_counted() {
        let result = engine().detect("oh \"fuck\"", false);
        assert_eq!(result.match_count, 1);
        assert_eq!(result.matches[0].start_offset, 4);
    }

    #[test]
    fn test_details_omitted_by_default() {
        let result = engine().detect("ragebait", false);
        assert_eq!(result.matches[0].canonical_form, None);
        assert_eq!(result.matches[0].severity_score, None);
    }

    #[test]
    fn test_longest_phrase_wins() {
        let result = engine().detect("you son of a bitch", true);
        let phrases: Vec<&str> = result.matches.iter().map(|m| m.matched_as.as_str()).collect();
        assert_eq!(phrases, vec!["son of a bitch", "bitch"]);
        assert_eq!(result.matches[0].severity_score, Some(5));
    }

    #[test]
    fn test_detect_many_independent() {
        let engine = engine();
        let results = engine.detect_many(&["fuck", "", "nice day", "h3ll"]);
        let flags: Vec<bool> = results.iter().map(|r| r.is_toxic).collect();
        assert_eq!(flags, vec![true, false, false, true]);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let err = DetectionEngine::from_entries(vec![entry("x", "negative", 1)], DetectorConfig::with_threshold(-3));
        assert!(matches!(err, Err(EngineError::Config(_))));
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DetectionEngine>();
    }
}
