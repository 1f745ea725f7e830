// WHY: bounded breadth-first leetspeak expansion; a token with many distinct leet
// characters would otherwise grow the candidate list exponentially

use std::collections::HashSet;

use crate::config::DEFAULT_MAX_EXPANSION_CANDIDATES;

/// Exact-token misspellings and their corrected forms
pub const MISSPELLINGS: &[(&str, &str)] = &[
    ("fuk", "fuck"),
    ("fck", "fuck"),
    ("f0ck", "fuck"),
    ("fock", "fuck"),
    ("phuck", "fuck"),
    ("sht", "shit"),
    ("shlt", "shit"),
    ("sh1t", "shit"),
    ("dmn", "damn"),
    ("hll", "hell"),
    ("h3ll", "hell"),
    ("btch", "bitch"),
    ("b1tch", "bitch"),
    ("azz", "ass"),
    ("a55", "ass"),
    ("@ss", "ass"),
];

/// Leet character to letter substitutions, applied in this order
pub const LEET_SUBSTITUTIONS: &[(char, &[char])] = &[
    ('0', &['o']),
    ('1', &['i', 'l']),
    ('3', &['e']),
    ('4', &['a']),
    ('5', &['s']),
    ('7', &['t']),
    ('8', &['b']),
    ('@', &['a']),
    ('$', &['s']),
    ('!', &['i']),
    ('|', &['l', 'i']),
];

/// True for characters that take part in leet substitution
pub fn is_leet_char(c: char) -> bool {
    LEET_SUBSTITUTIONS.iter().any(|(leet, _)| *leet == c)
}

/// Corrected form for an exact known misspelling
pub fn correct_misspelling(token: &str) -> Option<&'static str> {
    MISSPELLINGS
        .iter()
        .find(|(misspelled, _)| *misspelled == token)
        .map(|(_, correct)| *correct)
}

/// Maps an obfuscated token to de-obfuscated candidates
#[derive(Debug, Clone)]
pub struct ObfuscationExpander {
    max_candidates: usize,
}

/// Ordered, deduplicated candidate list with a hard size cap
struct Candidates {
    list: Vec<String>,
    seen: HashSet<String>,
    cap: usize,
}

impl Candidates {
    fn new(cap: usize) -> Self {
        Self {
            list: Vec::new(),
            seen: HashSet::new(),
            cap,
        }
    }

    fn is_full(&self) -> bool {
        self.list.len() >= self.cap
    }

    /// Returns false when the value was already present or the cap is reached
    fn push(&mut self, value: String) -> bool {
        if self.is_full() || self.seen.contains(&value) {
            return false;
        }
        self.seen.insert(value.clone());
        self.list.push(value);
        true
    }
}

impl ObfuscationExpander {
    /// `max_candidates` is clamped to at least 1 so the token itself is always kept
    pub fn new(max_candidates: usize) -> Self {
        Self {
            max_candidates: max_candidates.max(1),
        }
    }

    pub fn max_candidates(&self) -> usize {
        self.max_candidates
    }

    /// Candidates for `token` in discovery order; the first element is always `token`
    pub fn expand(&self, token: &str) -> Vec<String> {
        let mut candidates = Candidates::new(self.max_candidates);
        candidates.push(token.to_string());

        if let Some(correct) = correct_misspelling(token) {
            candidates.push(correct.to_string());
        }

        // Frontier of variants that further substitutions apply to
        let mut frontier: Vec<String> = vec![token.to_string()];

        for (leet, replacements) in LEET_SUBSTITUTIONS {
            if !token.contains(*leet) {
                continue;
            }
            let mut produced = Vec::new();
            for variant in &frontier {
                for replacement in replacements.iter() {
                    if candidates.is_full() {
                        return candidates.list;
                    }
                    let substituted = variant.replace(*leet, &replacement.to_string());
                    if candidates.push(substituted.clone()) {
                        if let Some(correct) = correct_misspelling(&substituted) {
                            candidates.push(correct.to_string());
                        }
                        produced.push(substituted);
                    }
                }
            }
            frontier.extend(produced);
        }

        candidates.list
    }
}

impl Default for ObfuscationExpander {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_EXPANSION_CANDIDATES)
    }
}
