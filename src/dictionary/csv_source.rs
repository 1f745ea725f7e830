// WHY: thin CSV adapter; all filtering and augmentation happens in PhraseDictionary::load

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::{Category, DictionaryEntry};
use crate::error::DictionaryLoadError;

pub const PHRASE_COLUMN: &str = "slang";
pub const CANONICAL_COLUMN: &str = "canonical_form";
pub const CATEGORY_COLUMN: &str = "type";
pub const SCORE_COLUMN: &str = "toxic_score";

/// Read dictionary rows from a CSV file on disk
pub fn read_entries_from_path(path: impl AsRef<Path>) -> Result<Vec<DictionaryEntry>, DictionaryLoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DictionaryLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Reading slang dictionary from {}", path.display());
    read_entries(file)
}

/// Read dictionary rows from any CSV source
///
/// Columns `slang`, `type` and `toxic_score` are required; `canonical_form` is
/// optional and falls back to the phrase when absent or blank. Extra columns
/// (e.g. `frequency` from the miner) are ignored.
pub fn read_entries<R: Read>(reader: R) -> Result<Vec<DictionaryEntry>, DictionaryLoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let column = |name: &'static str| -> Option<usize> {
        headers.iter().position(|h| h.eq_ignore_ascii_case(name))
    };
    let phrase_idx = column(PHRASE_COLUMN).ok_or(DictionaryLoadError::MissingColumn(PHRASE_COLUMN))?;
    let category_idx = column(CATEGORY_COLUMN).ok_or(DictionaryLoadError::MissingColumn(CATEGORY_COLUMN))?;
    let score_idx = column(SCORE_COLUMN).ok_or(DictionaryLoadError::MissingColumn(SCORE_COLUMN))?;
    let canonical_idx = column(CANONICAL_COLUMN);

    let mut entries = Vec::new();
    for (idx, record) in csv_reader.records().enumerate() {
        let record = record?;
        let row = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 2);

        let field = |i: usize| record.get(i).unwrap_or("");

        let phrase = field(phrase_idx);
        if phrase.is_empty() {
            return Err(DictionaryLoadError::MissingField { row, field: PHRASE_COLUMN });
        }
        let category = field(category_idx);
        if category.is_empty() {
            return Err(DictionaryLoadError::MissingField { row, field: CATEGORY_COLUMN });
        }
        let raw_score = field(score_idx);
        if raw_score.is_empty() {
            return Err(DictionaryLoadError::MissingField { row, field: SCORE_COLUMN });
        }
        let severity_score = parse_score(raw_score).ok_or_else(|| DictionaryLoadError::InvalidScore {
            row,
            value: raw_score.to_string(),
        })?;
        let canonical = canonical_idx.map(field).filter(|c| !c.is_empty());

        entries.push(DictionaryEntry::new(
            phrase,
            canonical,
            Category::parse(category),
            severity_score,
        ));
    }

    if entries.is_empty() {
        return Err(DictionaryLoadError::Empty);
    }
    debug!("Read {} dictionary rows", entries.len());
    Ok(entries)
}

/// Integer score; spreadsheet exports sometimes write whole numbers as "3.0"
fn parse_score(raw: &str) -> Option<u32> {
    if let Ok(score) = raw.parse::<u32>() {
        return Some(score);
    }
    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) {
        Some(value as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_basic_rows() {
        let csv = "slang,canonical_form,type,toxic_score\n\
                   Ragebait,ragebait,negative,4\n\
                   goated,goated,positive,1\n";
        let entries = read_entries(csv.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].phrase, "ragebait");
        assert_eq!(entries[0].category, Category::Negative);
        assert_eq!(entries[0].severity_score, 4);
        assert_eq!(entries[1].category, Category::Positive);
    }

    #[test]
    fn test_extra_columns_and_missing_canonical() {
        let csv = "slang,frequency,type,toxic_score\nfcks,12,negative,3\n";
        let entries = read_entries(csv.as_bytes()).unwrap();
        assert_eq!(entries[0].phrase, "fcks");
        assert_eq!(entries[0].canonical_form, "fcks");
    }

    #[test]
    fn test_missing_column() {
        let csv = "slang,canonical_form,toxic_score\nx,x,3\n";
        let err = read_entries(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DictionaryLoadError::MissingColumn("type")));
    }

    #[test]
    fn test_missing_field() {
        let csv = "slang,canonical_form,type,toxic_score\n,x,negative,3\n";
        let err = read_entries(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DictionaryLoadError::MissingField { field: "slang", .. }));
    }

    #[test]
    fn test_invalid_score() {
        let csv = "slang,canonical_form,type,toxic_score\nabc,abc,negative,-1\n";
        let err = read_entries(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DictionaryLoadError::InvalidScore { .. }));
    }

    #[test]
    fn test_empty_source() {
        let csv = "slang,canonical_form,type,toxic_score\n";
        assert!(matches!(read_entries(csv.as_bytes()), Err(DictionaryLoadError::Empty)));
        assert!(read_entries("".as_bytes()).is_err());
    }

    #[test]
    fn test_parse_score_forms() {
        assert_eq!(parse_score("3"), Some(3));
        assert_eq!(parse_score("3.0"), Some(3));
        assert_eq!(parse_score("3.5"), None);
        assert_eq!(parse_score("-2"), None);
        assert_eq!(parse_score("high"), None);
    }

    #[test]
    fn test_unreadable_path() {
        let err = read_entries_from_path("/nonexistent/slang.csv").unwrap_err();
        assert!(matches!(err, DictionaryLoadError::Io { .. }));
    }
}
