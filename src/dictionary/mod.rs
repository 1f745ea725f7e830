// WHY: the phrase index is built once and only read afterwards; every detection
// call shares it without locking

use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

use crate::error::DictionaryLoadError;

pub mod csv_source;
pub mod roots;

pub use roots::{RootWord, RootWordTable, DEFAULT_ROOT_WORDS};

/// Category label from the dictionary `type` column
///
/// Only `Negative` has special meaning (always retained); other labels are
/// opaque and pass through to results unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Negative,
    Neutral,
    Positive,
    Other(String),
}

impl Category {
    /// Labels are trimmed and compared case-insensitively, so `Negative` and
    /// `NEGATIVE` are both negative. Exact-match loaders would instead treat
    /// those spellings as opaque labels subject to the threshold.
    pub fn parse(label: &str) -> Self {
        let label = label.trim().to_lowercase();
        match label.as_str() {
            "negative" => Category::Negative,
            "neutral" => Category::Neutral,
            "positive" => Category::Positive,
            _ => Category::Other(label),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Category::Negative => "negative",
            Category::Neutral => "neutral",
            Category::Positive => "positive",
            Category::Other(label) => label,
        }
    }

    pub fn is_negative(&self) -> bool {
        matches!(self, Category::Negative)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One dictionary row after lowercase/trim normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub phrase: String,
    pub canonical_form: String,
    pub category: Category,
    pub severity_score: u32,
}

impl DictionaryEntry {
    /// Normalize a raw row; a missing or blank canonical form collapses to the phrase
    pub fn new(phrase: &str, canonical_form: Option<&str>, category: Category, severity_score: u32) -> Self {
        let phrase = phrase.trim().to_lowercase();
        let canonical_form = canonical_form
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| phrase.clone());
        Self {
            phrase,
            canonical_form,
            category,
            severity_score,
        }
    }

    /// Retention rule: negative entries always, others at or above the threshold
    pub fn is_retained(&self, threshold: u32) -> bool {
        self.category.is_negative() || self.severity_score >= threshold
    }

    fn info(&self) -> PhraseInfo {
        PhraseInfo {
            canonical_form: self.canonical_form.clone(),
            category: self.category.clone(),
            severity_score: self.severity_score,
        }
    }
}

/// Scoring data attached to every active phrase
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhraseInfo {
    pub canonical_form: String,
    pub category: Category,
    pub severity_score: u32,
}

/// Active phrase set keyed to scoring info
#[derive(Debug, Clone, Default)]
pub struct PhraseIndex {
    phrase_info: HashMap<String, PhraseInfo>,
}

impl PhraseIndex {
    pub fn contains(&self, phrase: &str) -> bool {
        self.phrase_info.contains_key(phrase)
    }

    pub fn info(&self, phrase: &str) -> Option<&PhraseInfo> {
        self.phrase_info.get(phrase)
    }

    /// Active phrases in unspecified order
    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.phrase_info.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.phrase_info.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrase_info.is_empty()
    }

    /// Insert or replace; dictionary rows use this so the last row for a key wins
    fn upsert(&mut self, phrase: &str, info: PhraseInfo) {
        if !phrase.is_empty() {
            self.phrase_info.insert(phrase.to_string(), info);
        }
    }

    /// Insert unless the phrase is already present; returns whether it was new
    fn insert_if_absent(&mut self, phrase: &str, info: PhraseInfo) -> bool {
        if phrase.is_empty() || self.phrase_info.contains_key(phrase) {
            return false;
        }
        self.phrase_info.insert(phrase.to_string(), info);
        true
    }
}

/// Aggregate figures over the retained entries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DictionaryStats {
    pub total_unique_phrases: usize,
    pub total_entries: usize,
    pub by_category: BTreeMap<String, usize>,
    pub mean_severity: f64,
    pub min_severity: Option<u32>,
    pub max_severity: Option<u32>,
}

/// Filtered, root-augmented phrase dictionary
#[derive(Debug, Clone)]
pub struct PhraseDictionary {
    index: PhraseIndex,
    retained: Vec<DictionaryEntry>,
    threshold: u32,
}

impl PhraseDictionary {
    /// Build with the default root-word table
    pub fn load(entries: Vec<DictionaryEntry>, threshold: u32) -> Result<Self, DictionaryLoadError> {
        Self::load_with_roots(entries, threshold, &RootWordTable::default())
    }

    /// Build from raw entries, an explicit threshold and an injected root table
    ///
    /// Dictionary-sourced keys are inserted before any root so a root never
    /// overwrites independently sourced info. Among rows, the last one to
    /// produce a key (as phrase or canonical form) wins.
    pub fn load_with_roots(
        entries: Vec<DictionaryEntry>,
        threshold: u32,
        roots: &RootWordTable,
    ) -> Result<Self, DictionaryLoadError> {
        if entries.is_empty() {
            return Err(DictionaryLoadError::Empty);
        }
        let total_rows = entries.len();

        let retained: Vec<DictionaryEntry> = entries
            .into_iter()
            .filter(|entry| !entry.phrase.is_empty() && entry.is_retained(threshold))
            .collect();

        let mut index = PhraseIndex::default();
        for entry in &retained {
            index.upsert(&entry.phrase, entry.info());
            if entry.canonical_form != entry.phrase {
                index.upsert(&entry.canonical_form, entry.info());
            }
        }

        let mut propagated = 0usize;
        for entry in &retained {
            for root in roots.roots_in(&entry.phrase) {
                if index.insert_if_absent(&root.word, root_info(root)) {
                    propagated += 1;
                }
            }
        }

        let mut seeded = 0usize;
        for root in roots.iter() {
            if index.insert_if_absent(&root.word, root_info(root)) {
                seeded += 1;
            }
        }

        debug!(
            "Root words: {} propagated from compounds, {} seeded unconditionally",
            propagated, seeded
        );
        info!(
            "Loaded {} unique toxic phrases from {} of {} entries (threshold {})",
            index.len(),
            retained.len(),
            total_rows,
            threshold
        );

        Ok(Self {
            index,
            retained,
            threshold,
        })
    }

    /// Read a slang CSV and build the dictionary with the default roots
    pub fn from_csv_path(path: impl AsRef<Path>, threshold: u32) -> Result<Self, DictionaryLoadError> {
        let entries = csv_source::read_entries_from_path(path)?;
        Self::load(entries, threshold)
    }

    pub fn index(&self) -> &PhraseIndex {
        &self.index
    }

    pub fn retained_entries(&self) -> &[DictionaryEntry] {
        &self.retained
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Aggregate statistics; recomputed on each call
    pub fn statistics(&self) -> DictionaryStats {
        let mut by_category = BTreeMap::new();
        let mut sum = 0u64;
        let mut min_severity: Option<u32> = None;
        let mut max_severity: Option<u32> = None;

        for entry in &self.retained {
            *by_category.entry(entry.category.as_str().to_string()).or_insert(0) += 1;
            sum += u64::from(entry.severity_score);
            min_severity = Some(min_severity.map_or(entry.severity_score, |m| m.min(entry.severity_score)));
            max_severity = Some(max_severity.map_or(entry.severity_score, |m| m.max(entry.severity_score)));
        }

        let mean_severity = if self.retained.is_empty() {
            0.0
        } else {
            sum as f64 / self.retained.len() as f64
        };

        DictionaryStats {
            total_unique_phrases: self.index.len(),
            total_entries: self.retained.len(),
            by_category,
            mean_severity,
            min_severity,
            max_severity,
        }
    }
}

fn root_info(root: &RootWord) -> PhraseInfo {
    PhraseInfo {
        canonical_form: root.word.to_string(),
        category: root.category.clone(),
        severity_score: root.severity_score,
    }
}
