pub mod config;
pub mod detector;
pub mod dictionary;
pub mod error;
pub mod evaluation;
pub mod mining;
pub mod obfuscation;
pub mod spell;

// Re-export main types for convenient access
pub use config::DetectorConfig;
pub use detector::{normalize_text, DetectionEngine, DetectionMatch, DetectionResult, MatchSource};
pub use dictionary::{Category, DictionaryEntry, DictionaryStats, PhraseDictionary, RootWord, RootWordTable};
pub use error::{ConfigError, DictionaryLoadError, EngineError, VocabularyLoadError};

// Re-export offline tooling
pub use evaluation::{EvaluationReport, Evaluator, TestCase};
pub use obfuscation::ObfuscationExpander;
pub use spell::{SpellNormalizer, Vocabulary};
