//! ErgoScan CLI - Command-line interface for the screening engine
//!
//! Commands:
//! - analyze: Score a survey submission (optionally with a landmark frame)
//! - posture: Analyze a landmark frame into posture metrics
//! - generate: Produce labeled synthetic datasets or longitudinal sequences
//! - train: Train the statistical classifier on synthetic data
//! - predict: Predict a risk band with a trained model

use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use ergoscan::classifier::{ClassifierConfig, RiskClassifier};
use ergoscan::pipeline::{analyze_frame_json, analyze_survey_json};
use ergoscan::survey::SurveyResponse;
use ergoscan::synthetic::{
    dataset_to_vectors, generate_dataset, generate_longitudinal, ProfileWeights,
    DEFAULT_PROFILE_WEIGHTS,
};
use ergoscan::ENGINE_VERSION;

/// ErgoScan - On-device screening engine for ergonomic health-risk signals
#[derive(Parser)]
#[command(name = "ergoscan")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Screen habit surveys and posture landmarks for health risk", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a survey submission, optionally with a landmark frame
    Analyze {
        /// Survey JSON file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Landmark frame JSON file path
        #[arg(long)]
        landmarks: Option<PathBuf>,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,
    },

    /// Analyze a landmark frame into posture metrics
    Posture {
        /// Landmark frame JSON file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,
    },

    /// Generate labeled synthetic survey data
    Generate {
        /// Number of labeled samples
        #[arg(long, default_value = "1000")]
        samples: usize,

        /// RNG seed for reproducible output
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Profile weights as healthy,moderate,at_risk
        #[arg(long, default_value = "30,45,25")]
        weights: String,

        /// Generate longitudinal (user, day) records instead of a flat dataset
        #[arg(long)]
        longitudinal: bool,

        /// Number of users (longitudinal mode)
        #[arg(long, default_value = "50")]
        users: u32,

        /// Days per user (longitudinal mode)
        #[arg(long, default_value = "30")]
        days: u32,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        format: OutputFormat,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,
    },

    /// Train the statistical classifier on synthetic data
    Train {
        /// Number of training samples
        #[arg(long, default_value = "1000")]
        samples: usize,

        /// RNG seed for the training set
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Softmax temperature
        #[arg(long, default_value = "1.0")]
        temperature: f64,

        /// Model output path
        #[arg(short, long)]
        model: PathBuf,
    },

    /// Predict a risk band with a trained model
    Predict {
        /// Trained model path
        #[arg(short, long)]
        model: PathBuf,

        /// Survey JSON file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one record per line)
    Ndjson,
    /// JSON array of records
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), ScanCliError> {
    match cli.command {
        Commands::Analyze {
            input,
            landmarks,
            output,
        } => cmd_analyze(&input, landmarks.as_deref(), &output),

        Commands::Posture { input, output } => cmd_posture(&input, &output),

        Commands::Generate {
            samples,
            seed,
            weights,
            longitudinal,
            users,
            days,
            format,
            output,
        } => cmd_generate(
            samples,
            seed,
            &weights,
            longitudinal,
            users,
            days,
            format,
            &output,
        ),

        Commands::Train {
            samples,
            seed,
            temperature,
            model,
        } => cmd_train(samples, seed, temperature, &model),

        Commands::Predict { model, input } => cmd_predict(&model, &input),
    }
}

fn cmd_analyze(
    input: &Path,
    landmarks: Option<&Path>,
    output: &Path,
) -> Result<(), ScanCliError> {
    let survey_json = read_input(input)?;
    let landmarks_json = match landmarks {
        Some(path) => Some(fs::read_to_string(path)?),
        None => None,
    };

    let report = analyze_survey_json(&survey_json, landmarks_json.as_deref())?;
    write_output(output, &report)
}

fn cmd_posture(input: &Path, output: &Path) -> Result<(), ScanCliError> {
    let landmarks_json = read_input(input)?;
    let metrics = analyze_frame_json(&landmarks_json)?;
    write_output(output, &metrics)
}

fn cmd_generate(
    samples: usize,
    seed: u64,
    weights: &str,
    longitudinal: bool,
    users: u32,
    days: u32,
    format: OutputFormat,
    output: &Path,
) -> Result<(), ScanCliError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let data = if longitudinal {
        let records = generate_longitudinal(users, days, &mut rng);
        format_records(&records, &format)?
    } else {
        let weights = parse_weights(weights)?;
        let dataset = generate_dataset(samples, &weights, &mut rng)?;
        let rows: Vec<DatasetRow> = dataset
            .iter()
            .map(|(features, level)| DatasetRow {
                features: features.to_vector(),
                label: level.label(),
            })
            .collect();
        format_records(&rows, &format)?
    };

    write_output(output, &data)
}

fn cmd_train(
    samples: usize,
    seed: u64,
    temperature: f64,
    model_path: &Path,
) -> Result<(), ScanCliError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let dataset = generate_dataset(samples, &DEFAULT_PROFILE_WEIGHTS, &mut rng)?;
    let (features, labels) = dataset_to_vectors(&dataset);

    let mut classifier = RiskClassifier::new(ClassifierConfig {
        softmax_temperature: temperature,
    });
    let report = classifier.train(&features, &labels)?;
    classifier.save(model_path)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_predict(model_path: &Path, input: &Path) -> Result<(), ScanCliError> {
    let classifier = RiskClassifier::load(model_path)?;

    let survey_json = read_input(input)?;
    let response: SurveyResponse = serde_json::from_str(&survey_json)?;
    let prediction = classifier.predict(&response.resolve())?;

    println!("{}", serde_json::to_string_pretty(&prediction)?);
    Ok(())
}

fn parse_weights(spec: &str) -> Result<ProfileWeights, ScanCliError> {
    let parts: Vec<&str> = spec.split(',').collect();
    if parts.len() != 3 {
        return Err(ScanCliError::BadWeights(spec.to_string()));
    }
    let parse = |s: &str| {
        s.trim()
            .parse::<u32>()
            .map_err(|_| ScanCliError::BadWeights(spec.to_string()))
    };
    Ok(ProfileWeights {
        healthy: parse(parts[0])?,
        moderate: parse(parts[1])?,
        at_risk: parse(parts[2])?,
    })
}

fn format_records<T: serde::Serialize>(
    records: &[T],
    format: &OutputFormat,
) -> Result<String, ScanCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut lines = Vec::with_capacity(records.len());
            for record in records {
                lines.push(serde_json::to_string(record)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
    }
}

fn read_input(path: &Path) -> Result<String, ScanCliError> {
    if path.to_string_lossy() == "-" {
        if atty::is(atty::Stream::Stdin) {
            return Err(ScanCliError::NoStdin);
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn write_output(path: &Path, data: &str) -> Result<(), ScanCliError> {
    if path.to_string_lossy() == "-" {
        print!("{data}");
        if !data.ends_with('\n') {
            println!();
        }
        Ok(())
    } else {
        fs::write(path, data)?;
        Ok(())
    }
}

#[derive(serde::Serialize)]
struct DatasetRow {
    features: [f64; 9],
    label: u8,
}

// Error types

#[derive(Debug)]
enum ScanCliError {
    Io(io::Error),
    Engine(ergoscan::EngineError),
    Json(serde_json::Error),
    BadWeights(String),
    NoStdin,
}

impl From<io::Error> for ScanCliError {
    fn from(e: io::Error) -> Self {
        ScanCliError::Io(e)
    }
}

impl From<ergoscan::EngineError> for ScanCliError {
    fn from(e: ergoscan::EngineError) -> Self {
        ScanCliError::Engine(e)
    }
}

impl From<serde_json::Error> for ScanCliError {
    fn from(e: serde_json::Error) -> Self {
        ScanCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<ScanCliError> for CliError {
    fn from(e: ScanCliError) -> Self {
        match e {
            ScanCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            ScanCliError::Engine(e) => CliError {
                code: "ENGINE_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
            ScanCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            ScanCliError::BadWeights(spec) => CliError {
                code: "BAD_WEIGHTS".to_string(),
                message: format!("Cannot parse profile weights: {spec}"),
                hint: Some("Expected three integers, e.g. 30,45,25".to_string()),
            },
            ScanCliError::NoStdin => CliError {
                code: "NO_STDIN".to_string(),
                message: "Input is '-' but stdin is a terminal".to_string(),
                hint: Some("Pipe data in or pass a file path".to_string()),
            },
        }
    }
}
