// WHY: candidate slang is any corpus token unknown to the base vocabulary, in either its
// raw or repeat-collapsed spelling; the output feeds SpellNormalizer::annotate_csv

use anyhow::Result;
use regex_automata::meta::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::io::{Read, Write};
use tracing::{debug, info, warn};

use crate::spell::Vocabulary;

/// Corpus columns scanned for text, matched case-insensitively
pub const DEFAULT_TEXT_COLUMNS: &[&str] = &["text", "body", "selftext", "comment", "content"];

const TOKEN_PATTERN: &str = r"\b[a-zA-Z-]+\b";

/// Token length bounds (inclusive) for slang candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiningConfig {
    pub min_len: usize,
    pub max_len: usize,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self { min_len: 3, max_len: 19 }
    }
}

/// A mined token with its corpus frequency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlangCandidate {
    pub slang: String,
    pub frequency: u64,
    pub canonical_form: String,
}

/// Lowercase and collapse runs of three or more identical chars to two ("heloooo" -> "heloo")
pub fn canonicalize_token(token: &str) -> String {
    let mut result = String::with_capacity(token.len());
    let mut prev: Option<char> = None;
    let mut run = 0usize;
    for ch in token.chars().flat_map(char::to_lowercase) {
        if Some(ch) == prev {
            run += 1;
        } else {
            prev = Some(ch);
            run = 1;
        }
        if run <= 2 {
            result.push(ch);
        }
    }
    result
}

/// Indices of known text columns; falls back to column 1 when none match
pub fn text_column_indices(headers: &[&str]) -> Vec<usize> {
    let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    let indices: Vec<usize> = DEFAULT_TEXT_COLUMNS
        .iter()
        .filter_map(|name| lowered.iter().position(|h| h.as_str() == *name))
        .collect();
    if indices.is_empty() && headers.len() > 1 {
        warn!("No default text columns found, falling back to column 1 ('{}')", headers[1]);
        return vec![1];
    }
    indices
}

/// Frequency counter for slang candidates
pub struct SlangMiner {
    base: Vocabulary,
    config: MiningConfig,
    token_re: Regex,
    counts: HashMap<String, u64>,
}

impl SlangMiner {
    pub fn new(base: Vocabulary, config: MiningConfig) -> Result<Self> {
        let token_re = Regex::new(TOKEN_PATTERN)?;
        Ok(Self {
            base,
            config,
            token_re,
            counts: HashMap::new(),
        })
    }

    /// Count candidate tokens in one text
    pub fn observe_text(&mut self, text: &str) {
        for m in self.token_re.find_iter(text) {
            let token = &text[m.range()];
            let len = token.chars().count();
            if len < self.config.min_len || len > self.config.max_len {
                continue;
            }
            let lower = token.to_lowercase();
            if lower.chars().all(char::is_numeric) {
                continue;
            }
            if self.base.contains(&lower) || self.base.contains(&canonicalize_token(&lower)) {
                continue;
            }
            *self.counts.entry(lower).or_insert(0) += 1;
        }
    }

    /// Scan every text column of a corpus CSV; returns the number of rows read
    pub fn observe_csv<R: Read>(&mut self, input: R, mut on_row: impl FnMut(u64)) -> Result<u64> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
        let headers = reader.headers()?.clone();
        let header_names: Vec<&str> = headers.iter().collect();
        let columns = text_column_indices(&header_names);
        if columns.is_empty() {
            anyhow::bail!("could not determine which corpus column holds text");
        }
        debug!("Mining text columns {:?}", columns);

        let mut rows = 0u64;
        for record in reader.records() {
            let record = record?;
            rows += 1;
            for &idx in &columns {
                if let Some(text) = record.get(idx) {
                    self.observe_text(text);
                }
            }
            on_row(rows);
        }
        info!("Processed {} corpus rows, {} distinct candidates", rows, self.counts.len());
        Ok(rows)
    }

    pub fn distinct_candidates(&self) -> usize {
        self.counts.len()
    }

    /// Candidates at or above `min_freq`, most frequent first, ties by token
    pub fn candidates(&self, min_freq: u64) -> Vec<SlangCandidate> {
        let mut candidates: Vec<SlangCandidate> = self
            .counts
            .iter()
            .filter(|(_, &freq)| freq >= min_freq)
            .map(|(token, &frequency)| SlangCandidate {
                slang: token.clone(),
                frequency,
                canonical_form: canonicalize_token(token),
            })
            .collect();
        candidates.sort_by(|a, b| b.frequency.cmp(&a.frequency).then_with(|| a.slang.cmp(&b.slang)));
        candidates
    }
}

/// Write candidates as `slang,frequency,canonical_form` CSV
pub fn write_candidates_csv<W: Write>(candidates: &[SlangCandidate], output: W) -> Result<usize> {
    let mut writer = csv::Writer::from_writer(output);
    for candidate in candidates {
        writer.serialize(candidate)?;
    }
    writer.flush()?;
    Ok(candidates.len())
}
