// WHY: one error enum per load surface; detection itself has no error type

use std::path::PathBuf;

/// Failures while building a phrase index from a slang dictionary
#[derive(Debug, thiserror::Error)]
pub enum DictionaryLoadError {
    #[error("failed to read dictionary {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dictionary CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("dictionary is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: required field '{field}' is empty")]
    MissingField { row: usize, field: &'static str },

    #[error("row {row}: toxic_score '{value}' is not a non-negative integer")]
    InvalidScore { row: usize, value: String },

    #[error("dictionary contains no entries")]
    Empty,
}

/// Rejected detector configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("severity threshold must be >= 0, got {0}")]
    NegativeThreshold(i64),

    #[error("max_expansion_candidates must be at least 1")]
    ZeroCandidateCap,

    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Failures while loading the reference vocabulary for spell normalization
#[derive(Debug, thiserror::Error)]
pub enum VocabularyLoadError {
    #[error("failed to read vocabulary {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("vocabulary contains no words")]
    Empty,
}

/// Construction-time failure of a detection engine
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dictionary(#[from] DictionaryLoadError),

    #[error("failed to compile phrase automaton: {0}")]
    Automaton(#[from] aho_corasick::BuildError),
}
