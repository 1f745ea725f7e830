// WHY: labelled-case evaluation of a detection engine; metrics match the usual
// binary-classification definitions with zero denominators reported as 0.0

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::info;

use crate::detector::DetectionEngine;

/// A labelled sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub sentence: String,
    pub expected_toxic: bool,
    pub expected_count: usize,
}

impl TestCase {
    pub fn new(sentence: &str, expected_toxic: bool, expected_count: usize) -> Self {
        Self {
            sentence: sentence.to_string(),
            expected_toxic,
            expected_count,
        }
    }
}

/// Per-case prediction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseOutcome {
    pub sentence: String,
    pub expected_toxic: bool,
    pub predicted_toxic: bool,
    pub expected_count: usize,
    pub predicted_count: usize,
    pub toxic_phrases: Vec<String>,
    pub correct: bool,
}

/// Aggregate metrics plus per-case details
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub total_test_cases: usize,
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub accuracy: f64,
    pub count_accuracy: f64,
    pub total_expected_phrases: usize,
    pub total_detected_phrases: usize,
    pub detailed_results: Vec<CaseOutcome>,
}

impl EvaluationReport {
    /// Cases where either the label or the count was wrong
    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.detailed_results.iter().filter(|c| !c.correct)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total test cases: {}", self.total_test_cases)?;
        writeln!(
            f,
            "Confusion matrix: TP={} FP={} TN={} FN={}",
            self.true_positives, self.false_positives, self.true_negatives, self.false_negatives
        )?;
        writeln!(f, "Accuracy:       {:.2}%", self.accuracy * 100.0)?;
        writeln!(f, "Precision:      {:.2}%", self.precision * 100.0)?;
        writeln!(f, "Recall:         {:.2}%", self.recall * 100.0)?;
        writeln!(f, "F1-score:       {:.2}%", self.f1_score * 100.0)?;
        writeln!(f, "Count accuracy: {:.2}%", self.count_accuracy * 100.0)?;
        write!(
            f,
            "Phrases expected/detected: {}/{}",
            self.total_expected_phrases, self.total_detected_phrases
        )
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Runs labelled cases through a detection engine
pub struct Evaluator<'a> {
    engine: &'a DetectionEngine,
}

impl<'a> Evaluator<'a> {
    pub fn new(engine: &'a DetectionEngine) -> Self {
        Self { engine }
    }

    pub fn evaluate(&self, cases: &[TestCase]) -> EvaluationReport {
        let (mut tp, mut fp, mut tn, mut fn_) = (0, 0, 0, 0);
        let mut correct_counts = 0;
        let mut total_expected_phrases = 0;
        let mut total_detected_phrases = 0;
        let mut detailed_results = Vec::with_capacity(cases.len());

        for case in cases {
            let result = self.engine.detect(&case.sentence, true);
            let predicted_toxic = result.is_toxic;
            let predicted_count = result.match_count;

            match (case.expected_toxic, predicted_toxic) {
                (true, true) => tp += 1,
                (false, true) => fp += 1,
                (false, false) => tn += 1,
                (true, false) => fn_ += 1,
            }
            if predicted_count == case.expected_count {
                correct_counts += 1;
            }
            total_expected_phrases += case.expected_count;
            total_detected_phrases += predicted_count;

            detailed_results.push(CaseOutcome {
                sentence: case.sentence.clone(),
                expected_toxic: case.expected_toxic,
                predicted_toxic,
                expected_count: case.expected_count,
                predicted_count,
                toxic_phrases: result.matched_phrases,
                correct: case.expected_toxic == predicted_toxic && case.expected_count == predicted_count,
            });
        }

        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1_score = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        let report = EvaluationReport {
            total_test_cases: cases.len(),
            true_positives: tp,
            false_positives: fp,
            true_negatives: tn,
            false_negatives: fn_,
            precision,
            recall,
            f1_score,
            accuracy: ratio(tp + tn, cases.len()),
            count_accuracy: ratio(correct_counts, cases.len()),
            total_expected_phrases,
            total_detected_phrases,
            detailed_results,
        };
        info!(
            "Evaluated {} cases: accuracy {:.3}, f1 {:.3}",
            report.total_test_cases, report.accuracy, report.f1_score
        );
        report
    }
}

/// Load cases from a JSON array of `{sentence, expected_toxic, expected_count}`
pub fn load_cases(path: impl AsRef<Path>) -> anyhow::Result<Vec<TestCase>> {
    let text = std::fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&text)?)
}

const QUIT_WORDS: &[&str] = &["quit", "exit", "q"];

/// Prompted read-detect-print loop over `input`, one sentence per line
///
/// Stops at end of input or at a quit word (`quit`, `exit`, `q`, any case).
/// Blank lines are skipped. Returns the number of sentences checked.
pub fn interactive_session<R: BufRead, W: Write>(engine: &DetectionEngine, input: R, mut output: W) -> io::Result<usize> {
    let mut checked = 0usize;
    let mut lines = input.lines();
    loop {
        write!(output, "Enter sentence: ")?;
        output.flush()?;
        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        let line = line?;
        let sentence = line.trim();
        if QUIT_WORDS.iter().any(|q| sentence.eq_ignore_ascii_case(q)) {
            break;
        }
        if sentence.is_empty() {
            continue;
        }

        let result = engine.detect(sentence, true);
        checked += 1;
        writeln!(output)?;
        writeln!(output, "  Is Toxic: {}", result.is_toxic)?;
        writeln!(output, "  Toxic Count: {}", result.match_count)?;
        if !result.matched_phrases.is_empty() {
            writeln!(output, "  Toxic Phrases: {}", result.matched_phrases.join(", "))?;
            writeln!(output, "  Details:")?;
            for m in &result.matches {
                let score = m.severity_score.map_or_else(|| "-".to_string(), |s| s.to_string());
                let category = m.category.as_ref().map_or("-", |c| c.as_str());
                writeln!(output, "    - {} (score: {}, type: {})", m.matched_text, score, category)?;
            }
        }
        writeln!(output)?;
    }
    info!("Interactive session checked {} sentences", checked);
    Ok(checked)
}

/// Built-in smoke cases
pub fn default_cases() -> Vec<TestCase> {
    vec![
        TestCase::new("This is a wonderful day!", false, 0),
        TestCase::new("Thank you very much", false, 0),
        TestCase::new("The weather is beautiful", false, 0),
        TestCase::new("What the fuck is this", true, 1),
        TestCase::new("fuck this shit", true, 2),
        TestCase::new("Oh sh1t", true, 1),
        TestCase::new("You are such a b1tch", true, 1),
        TestCase::new("Go to h3ll", true, 1),
        TestCase::new("damn fck", true, 2),
        TestCase::new("What the hell is this shit", true, 2),
    ]
}
