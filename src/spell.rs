// WHY: offline canonicalization of mined slang; edit-distance-2 search is quadratic in
// the neighborhood size and must stay out of the detection path

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::error::VocabularyLoadError;

const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// Known-good lowercase words used as correction targets
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    words: HashSet<String>,
}

impl Vocabulary {
    /// Collect words, lowercased and trimmed; blank entries are skipped
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Newline-delimited word list; an empty result is not an error here
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, std::io::Error> {
        let mut words = HashSet::new();
        for line in BufReader::new(reader).lines() {
            let word = line?.trim().to_lowercase();
            if !word.is_empty() {
                words.insert(word);
            }
        }
        Ok(Self { words })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, VocabularyLoadError> {
        let path = path.as_ref();
        let io_err = |source| VocabularyLoadError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(io_err)?;
        let vocabulary = Self::from_reader(file).map_err(io_err)?;
        if vocabulary.is_empty() {
            return Err(VocabularyLoadError::Empty);
        }
        info!("Loaded {} vocabulary words from {}", vocabulary.len(), path.display());
        Ok(vocabulary)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// All strings one delete, transpose, replace or insert away from `word`
pub fn edits1(word: &str) -> HashSet<String> {
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    let mut edits = HashSet::with_capacity(n * 54 + 26);

    let build = |parts: &[&[char]]| -> String { parts.iter().flat_map(|p| p.iter()).collect() };

    for i in 0..=n {
        let (left, right) = chars.split_at(i);
        if !right.is_empty() {
            edits.insert(build(&[left, &right[1..]]));
        }
        if right.len() > 1 {
            edits.insert(build(&[left, &[right[1], right[0]], &right[2..]]));
        }
        for c in ALPHABET.chars() {
            if !right.is_empty() {
                edits.insert(build(&[left, &[c], &right[1..]]));
            }
            edits.insert(build(&[left, &[c], right]));
        }
    }
    edits
}

/// Bounded edit-distance corrector over a fixed vocabulary
#[derive(Debug, Clone)]
pub struct SpellNormalizer {
    vocabulary: Vocabulary,
}

impl SpellNormalizer {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Suggested canonical spelling for `word`
    ///
    /// Known words return unchanged; otherwise the lexicographically greatest
    /// known word at distance 1, then at distance 2; otherwise `word` lowercased.
    pub fn correct(&self, word: &str) -> String {
        let word = word.to_lowercase();
        if self.vocabulary.contains(&word) {
            return word;
        }

        let first = edits1(&word);
        if let Some(best) = self.best_known(first.iter()) {
            debug!("Corrected '{}' -> '{}' at distance 1", word, best);
            return best.clone();
        }

        let mut best: Option<String> = None;
        for e1 in &first {
            for e2 in edits1(e1) {
                if self.vocabulary.contains(&e2) && best.as_ref().map_or(true, |b| e2 > *b) {
                    best = Some(e2);
                }
            }
        }
        if let Some(best) = best {
            debug!("Corrected '{}' -> '{}' at distance 2", word, best);
            return best;
        }

        word
    }

    fn best_known<'a>(&self, candidates: impl Iterator<Item = &'a String>) -> Option<&'a String> {
        candidates.filter(|c| self.vocabulary.contains(c)).max()
    }

    /// Copy a mined-slang CSV, appending a `suggested_canon` column
    ///
    /// `on_row` is called after each row with the running count. Returns the
    /// number of data rows written.
    pub fn annotate_csv<R: Read, W: Write>(
        &self,
        input: R,
        output: W,
        mut on_row: impl FnMut(u64),
    ) -> anyhow::Result<u64> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
        let mut writer = csv::Writer::from_writer(output);

        let headers = reader.headers()?.clone();
        let slang_idx = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case("slang"))
            .ok_or_else(|| anyhow::anyhow!("'slang' column not found in input"))?;

        let mut out_headers = headers.clone();
        out_headers.push_field("suggested_canon");
        writer.write_record(&out_headers)?;

        let mut count = 0u64;
        for record in reader.records() {
            let mut record = record?;
            let suggestion = self.correct(record.get(slang_idx).unwrap_or(""));
            record.push_field(&suggestion);
            writer.write_record(&record)?;
            count += 1;
            on_row(count);
        }
        writer.flush()?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer(words: &[&str]) -> SpellNormalizer {
        SpellNormalizer::new(Vocabulary::from_words(words))
    }

    #[test]
    fn test_edits1_neighborhood() {
        let edits = edits1("ab");
        assert!(edits.contains("a"), "delete");
        assert!(edits.contains("ba"), "transpose");
        assert!(edits.contains("xb"), "replace");
        assert!(edits.contains("abz"), "insert at end");
        assert!(edits.contains("zab"), "insert at start");
        // deletes 2 + transposes 1 + replaces 52 + inserts 78, minus duplicates
        assert!(edits.len() <= 133);
    }

    #[test]
    fn test_known_word_unchanged() {
        let n = normalizer(&["hello", "help"]);
        assert_eq!(n.correct("Hello"), "hello");
    }

    #[test]
    fn test_distance_one_prefers_lexicographic_max() {
        let n = normalizer(&["cat", "bat", "hat"]);
        // "at" is one insert away from all three
        assert_eq!(n.correct("at"), "hat");
    }

    #[test]
    fn test_distance_two() {
        let n = normalizer(&["because"]);
        assert_eq!(n.correct("becuz"), "becuz", "three edits away stays unchanged");
        assert_eq!(n.correct("becuse"), "because");
        assert_eq!(n.correct("bcuse"), "because");
    }

    #[test]
    fn test_distance_one_beats_distance_two() {
        let n = normalizer(&["ab", "zzz"]);
        assert_eq!(n.correct("abc"), "ab");
    }

    #[test]
    fn test_no_correction_found() {
        let n = normalizer(&["apple"]);
        assert_eq!(n.correct("Yeet"), "yeet");
    }

    #[test]
    fn test_vocabulary_reader() {
        let vocab = Vocabulary::from_reader("Apple\n\n  banana \n".as_bytes()).unwrap();
        assert_eq!(vocab.len(), 2);
        assert!(vocab.contains("apple"));
        assert!(vocab.contains("banana"));
    }

    #[test]
    fn test_vocabulary_missing_file() {
        let err = Vocabulary::from_path("/nonexistent/words.txt").unwrap_err();
        assert!(matches!(err, VocabularyLoadError::Io { .. }));
    }

    #[test]
    fn test_annotate_csv() {
        let n = normalizer(&["because", "cool"]);
        let input = "slang,frequency,canonical_form\nbecuse,4,becuse\ncool,2,cool\n";
        let mut output = Vec::new();
        let mut seen = 0;
        let rows = n.annotate_csv(input.as_bytes(), &mut output, |c| seen = c).unwrap();
        assert_eq!(rows, 2);
        assert_eq!(seen, 2);
        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "slang,frequency,canonical_form,suggested_canon");
        assert_eq!(lines[1], "becuse,4,becuse,because");
        assert_eq!(lines[2], "cool,2,cool,cool");
    }

    #[test]
    fn test_annotate_csv_requires_slang_column() {
        let n = normalizer(&["x"]);
        let result = n.annotate_csv("word\nabc\n".as_bytes(), Vec::new(), |_| {});
        assert!(result.is_err());
    }
}
