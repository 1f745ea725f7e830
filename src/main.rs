use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufWriter, Read};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use toxscan::evaluation::{self, Evaluator};
use toxscan::mining::{self, MiningConfig, SlangMiner};
use toxscan::spell::{SpellNormalizer, Vocabulary};
use toxscan::{DetectionEngine, DetectorConfig};

#[derive(Parser, Debug)]
#[command(name = "toxscan")]
#[command(about = "Dictionary-driven toxic phrase detection with leetspeak and slang handling")]
#[command(version)]
struct Args {
    /// Slang dictionary CSV (slang, canonical_form, type, toxic_score)
    #[arg(long, global = true, default_value = "slang.csv")]
    dictionary: PathBuf,

    /// Minimum severity for non-negative entries; overrides the config file
    #[arg(long, global = true, allow_negative_numbers = true)]
    threshold: Option<i64>,

    /// TOML file with detector settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Suppress console progress bars
    #[arg(long, global = true)]
    no_progress: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan a text for toxic phrases
    Detect {
        /// Text to scan
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        text: Option<String>,

        /// Scan each line of this file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Include canonical form, category and severity per match
        #[arg(long)]
        details: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Also print dictionary statistics
        #[arg(long)]
        stats: bool,
    },

    /// Print statistics over the loaded dictionary
    Stats,

    /// Mine unknown tokens from a corpus CSV
    Mine {
        #[arg(long)]
        corpus: PathBuf,

        /// Newline-delimited list of known words
        #[arg(long)]
        base_dict: PathBuf,

        #[arg(long)]
        out: PathBuf,

        #[arg(long, default_value_t = 1)]
        min_freq: u64,
    },

    /// Append spelling suggestions to a mined-slang CSV
    Normalize {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        vocabulary: PathBuf,

        #[arg(long)]
        out: PathBuf,
    },

    /// Score the detector against labelled cases
    Evaluate {
        /// JSON array of {sentence, expected_toxic, expected_count}; built-in cases when omitted
        #[arg(long)]
        cases: Option<PathBuf>,

        /// Write the full report as JSON
        #[arg(long)]
        report_out: Option<PathBuf>,

        /// Print each failing case
        #[arg(long)]
        details: bool,

        /// After the report, check sentences typed on stdin until quit/exit/q
        #[arg(long)]
        interactive: bool,
    },
}

fn main() -> Result<()> {
    // WHY: structured JSON logs on stderr keep stdout free for results
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args = Args::parse();
    info!(?args, "Parsed CLI arguments");

    match &args.command {
        Command::Detect {
            text,
            file,
            details,
            json,
            stats,
        } => {
            let engine = build_engine(&args)?;
            if *stats {
                println!("{}", serde_json::to_string_pretty(&engine.get_statistics())?);
            }
            run_detect(&engine, text.as_deref(), file.as_deref(), *details, *json)
        }
        Command::Stats => {
            let engine = build_engine(&args)?;
            println!("{}", serde_json::to_string_pretty(&engine.get_statistics())?);
            Ok(())
        }
        Command::Mine {
            corpus,
            base_dict,
            out,
            min_freq,
        } => run_mine(corpus, base_dict, out, *min_freq, args.no_progress),
        Command::Normalize { input, vocabulary, out } => run_normalize(input, vocabulary, out, args.no_progress),
        Command::Evaluate {
            cases,
            report_out,
            details,
            interactive,
        } => {
            let engine = build_engine(&args)?;
            run_evaluate(&engine, cases.as_deref(), report_out.as_deref(), *details)?;
            if *interactive {
                println!("Enter sentences to test (or 'quit' to exit):");
                evaluation::interactive_session(&engine, std::io::stdin().lock(), std::io::stdout().lock())?;
            }
            Ok(())
        }
    }
}

/// Config file first, then CLI overrides, validated before any dictionary I/O
fn load_config(args: &Args) -> Result<DetectorConfig> {
    let mut config = match &args.config {
        Some(path) => DetectorConfig::from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => DetectorConfig::default(),
    };
    if let Some(threshold) = args.threshold {
        config.severity_threshold = threshold;
    }
    config.validate()?;
    Ok(config)
}

fn build_engine(args: &Args) -> Result<DetectionEngine> {
    let config = load_config(args)?;
    // WHY: fail fast with a path in the message rather than a bare io error
    if !args.dictionary.exists() {
        anyhow::bail!("Dictionary file does not exist: {}", args.dictionary.display());
    }
    DetectionEngine::from_path(&args.dictionary, config)
        .with_context(|| format!("Failed to build detector from {}", args.dictionary.display()))
}

fn run_detect(engine: &DetectionEngine, text: Option<&str>, file: Option<&Path>, details: bool, json: bool) -> Result<()> {
    let inputs: Vec<String> = match (text, file) {
        (Some(text), _) => vec![text.to_string()],
        (None, Some(path)) => {
            let mut content = String::new();
            File::open(path)
                .and_then(|mut f| f.read_to_string(&mut content))
                .with_context(|| format!("Failed to read {}", path.display()))?;
            content.lines().filter(|l| !l.trim().is_empty()).map(str::to_string).collect()
        }
        (None, None) => anyhow::bail!("either --text or --file is required"),
    };

    let mut toxic = 0usize;
    for input in &inputs {
        let result = engine.detect(input, details);
        if result.is_toxic {
            toxic += 1;
        }
        if json {
            println!("{}", serde_json::to_string(&result)?);
            continue;
        }
        let label = if result.is_toxic { "TOXIC" } else { "CLEAN" };
        println!("[{label}] {input}");
        for m in &result.matches {
            match (&m.category, m.severity_score) {
                (Some(category), Some(score)) => println!(
                    "  {} -> {} @{} ({}, severity {})",
                    m.matched_text, m.matched_as, m.start_offset, category, score
                ),
                _ => println!("  {} -> {} @{}", m.matched_text, m.matched_as, m.start_offset),
            }
        }
    }
    info!("Scanned {} inputs, {} toxic", inputs.len(), toxic);
    Ok(())
}

fn row_progress(no_progress: bool, message: &'static str) -> Result<ProgressBar> {
    if no_progress {
        return Ok(ProgressBar::hidden());
    }
    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::with_template("{spinner} {msg}: {pos} rows [{elapsed_precise}]")?);
    bar.set_message(message);
    Ok(bar)
}

fn run_mine(corpus: &Path, base_dict: &Path, out: &Path, min_freq: u64, no_progress: bool) -> Result<()> {
    let vocabulary = Vocabulary::from_path(base_dict)?;
    let mut miner = SlangMiner::new(vocabulary, MiningConfig::default())?;

    let input = File::open(corpus).with_context(|| format!("Failed to open corpus {}", corpus.display()))?;
    let bar = row_progress(no_progress, "Mining")?;
    let rows = miner.observe_csv(input, |n| bar.set_position(n))?;
    bar.finish_and_clear();

    let candidates = miner.candidates(min_freq);
    let output = File::create(out).with_context(|| format!("Failed to create {}", out.display()))?;
    let written = mining::write_candidates_csv(&candidates, BufWriter::new(output))?;

    println!(
        "Mined {} rows: {} distinct candidates, {} with frequency >= {} written to {}",
        rows,
        miner.distinct_candidates(),
        written,
        min_freq,
        out.display()
    );
    Ok(())
}

fn run_normalize(input: &Path, vocabulary: &Path, out: &Path, no_progress: bool) -> Result<()> {
    let normalizer = SpellNormalizer::new(Vocabulary::from_path(vocabulary)?);
    let reader = File::open(input).with_context(|| format!("Failed to open {}", input.display()))?;
    let writer = File::create(out).with_context(|| format!("Failed to create {}", out.display()))?;

    let bar = row_progress(no_progress, "Normalizing")?;
    let rows = normalizer.annotate_csv(reader, BufWriter::new(writer), |n| bar.set_position(n))?;
    bar.finish_and_clear();

    println!("Annotated {} rows into {}", rows, out.display());
    Ok(())
}

fn run_evaluate(engine: &DetectionEngine, cases: Option<&Path>, report_out: Option<&Path>, details: bool) -> Result<()> {
    let cases = match cases {
        Some(path) => evaluation::load_cases(path).with_context(|| format!("Failed to load cases from {}", path.display()))?,
        None => evaluation::default_cases(),
    };
    let report = Evaluator::new(engine).evaluate(&cases);
    println!("{report}");

    if details {
        for case in report.failures() {
            println!(
                "FAIL: {:?} expected toxic={} count={}, got toxic={} count={} {:?}",
                case.sentence,
                case.expected_toxic,
                case.expected_count,
                case.predicted_toxic,
                case.predicted_count,
                case.toxic_phrases
            );
        }
    }

    if let Some(path) = report_out {
        std::fs::write(path, report.to_json_pretty()?)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!("Evaluation report written to {}", path.display());
    }
    Ok(())
}
