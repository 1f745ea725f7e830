// WHY: single validated configuration shared by the CLI, tests and benches

use serde::Deserialize;
use std::path::Path;

use crate::error::ConfigError;

/// Default minimum severity for non-negative categories to stay in the index
pub const DEFAULT_SEVERITY_THRESHOLD: i64 = 3;

/// Default ceiling on obfuscation candidates generated for a single token
pub const DEFAULT_MAX_EXPANSION_CANDIDATES: usize = 64;

/// Detector configuration, loadable from TOML
///
/// ```toml
/// severity_threshold = 3
/// max_expansion_candidates = 64
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectorConfig {
    /// Entries whose category is not `negative` are kept only at or above this score
    pub severity_threshold: i64,
    /// Hard cap on the candidate list produced by the obfuscation expander
    pub max_expansion_candidates: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            severity_threshold: DEFAULT_SEVERITY_THRESHOLD,
            max_expansion_candidates: DEFAULT_MAX_EXPANSION_CANDIDATES,
        }
    }
}

impl DetectorConfig {
    /// Config with a custom threshold and default cap
    pub fn with_threshold(severity_threshold: i64) -> Self {
        Self {
            severity_threshold,
            ..Self::default()
        }
    }

    /// Parse a TOML document; missing keys fall back to defaults
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Reject values that cannot be honored; never clamps
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.severity_threshold < 0 {
            return Err(ConfigError::NegativeThreshold(self.severity_threshold));
        }
        if self.max_expansion_candidates == 0 {
            return Err(ConfigError::ZeroCandidateCap);
        }
        Ok(())
    }

    /// Threshold as an unsigned score; only meaningful after `validate`
    pub fn threshold(&self) -> u32 {
        u32::try_from(self.severity_threshold).unwrap_or(u32::MAX)
    }
}
