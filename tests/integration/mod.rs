// Integration test utilities and common code
// WHY: Centralized utilities avoid duplication across integration tests

#![allow(dead_code)]

pub mod fixtures;

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use toxscan::{DetectionEngine, DetectorConfig};

/// Temporary directory holding dictionary, vocabulary and corpus files
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with temporary directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self { temp_dir, root_path }
    }

    /// Write an arbitrary file relative to the fixture root
    pub fn create_file<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        let file_path = self.root_path.join(relative_path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    /// Write `slang.csv` with the standard dictionary fixture
    pub fn create_dictionary(&self) -> PathBuf {
        self.create_file("slang.csv", fixtures::SLANG_CSV)
    }

    /// Write a newline-delimited vocabulary file
    pub fn create_vocabulary<P: AsRef<Path>>(&self, relative_path: P, words: &[&str]) -> PathBuf {
        let mut content = words.join("\n");
        content.push('\n');
        self.create_file(relative_path, &content)
    }

    /// Engine over the standard dictionary fixture with default settings
    pub fn engine(&self) -> DetectionEngine {
        self.engine_with(DetectorConfig::default())
    }

    pub fn engine_with(&self, config: DetectorConfig) -> DetectionEngine {
        let path = self.create_dictionary();
        DetectionEngine::from_path(&path, config).expect("Failed to build engine from fixture dictionary")
    }

    pub fn path<P: AsRef<Path>>(&self, relative_path: P) -> PathBuf {
        self.root_path.join(relative_path)
    }
}

/// Compare two strings line by line, providing detailed diff on mismatch
pub fn assert_golden_file(actual: &str, expected: &str, context: &str) {
    let actual_lines: Vec<&str> = actual.lines().collect();
    let expected_lines: Vec<&str> = expected.lines().collect();

    if actual_lines.len() != expected_lines.len() {
        panic!(
            "{}: Line count mismatch. Expected {} lines, got {} lines",
            context,
            expected_lines.len(),
            actual_lines.len()
        );
    }

    for (i, (actual_line, expected_line)) in actual_lines.iter().zip(expected_lines.iter()).enumerate() {
        if actual_line != expected_line {
            panic!(
                "{}: Line {} mismatch\nExpected: {}\nActual:   {}",
                context,
                i + 1,
                expected_line,
                actual_line
            );
        }
    }
}
