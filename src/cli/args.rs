use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::normalizer::NormalizerKind;

#[derive(Parser, Debug)]
#[command(name = "atc-eval")]
#[command(about = "Evaluate speech recognition on air traffic control audio", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use this config file instead of ~/.config/atc-eval/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Transcribe a test corpus and write a WER report
    Evaluate(EvaluateCliArgs),
    /// Normalize text into canonical ATC spoken form
    Normalize(NormalizeCliArgs),
    /// Score a hypothesis against a reference
    Wer(WerCliArgs),
    /// Build train/test manifests from labeled corpora
    Dataset(DatasetCliArgs),
    /// Inspect the augmentation schedule or augment audio files
    Augment(AugmentCliArgs),
    /// Inspect or test the transcription provider
    Provider(ProviderCliArgs),
    /// Print version information
    Version,
}

#[derive(ClapArgs, Debug)]
pub struct EvaluateCliArgs {
    /// JSON Lines manifest of the test corpus
    #[arg(short, long)]
    pub manifest: PathBuf,
    /// Override the configured provider (openai-api, whisper-cpp)
    #[arg(long)]
    pub provider: Option<String>,
    /// Override the configured model name
    #[arg(long)]
    pub model: Option<String>,
    /// Override the configured language code
    #[arg(long)]
    pub language: Option<String>,
    /// Normalizer applied to hypotheses before scoring
    #[arg(long, value_enum)]
    pub normalizer: Option<NormalizerKind>,
    /// Directory for the CSV report
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Leading part of the report file name
    #[arg(long)]
    pub report_prefix: Option<String>,
    /// Only evaluate the first N manifest entries
    #[arg(long)]
    pub limit: Option<usize>,
    /// Print the full report as JSON
    #[arg(long)]
    pub json: bool,
    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
    /// Keep the per-sample run log after a successful run
    #[arg(long)]
    pub keep_run_log: bool,
}

#[derive(ClapArgs, Debug)]
pub struct NormalizeCliArgs {
    /// Text to normalize; reads lines from stdin when omitted
    pub text: Vec<String>,
    #[arg(long, value_enum, default_value_t = NormalizerKind::Atc)]
    pub normalizer: NormalizerKind,
}

#[derive(ClapArgs, Debug)]
pub struct WerCliArgs {
    pub reference: String,
    pub hypothesis: String,
    /// Normalize the hypothesis before scoring
    #[arg(long, value_enum)]
    pub normalizer: Option<NormalizerKind>,
    /// Print the error counts as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(ClapArgs, Debug)]
pub struct DatasetCliArgs {
    #[command(subcommand)]
    pub command: DatasetCommand,
}

#[derive(Subcommand, Debug)]
pub enum DatasetCommand {
    /// Merge manifests, split into train/test and drop excluded transcripts
    Prepare {
        /// Source manifests, concatenated in the order given
        #[arg(short, long = "manifest", required = true)]
        manifests: Vec<PathBuf>,
        /// Directory for train.jsonl and test.jsonl
        #[arg(short, long)]
        output_dir: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        test_fraction: Option<f64>,
        /// Keep every transcript, ignoring the configured exclusions
        #[arg(long)]
        no_exclusions: bool,
    },
}

#[derive(ClapArgs, Debug)]
pub struct AugmentCliArgs {
    #[command(subcommand)]
    pub command: AugmentCommand,
}

#[derive(Subcommand, Debug)]
pub enum AugmentCommand {
    /// Print the augmentation level and perturbation ranges per epoch
    Schedule {
        #[arg(long)]
        initial_level: Option<f64>,
        #[arg(long)]
        final_level: Option<f64>,
        #[arg(long)]
        epochs: Option<u32>,
        #[arg(long)]
        json: bool,
    },
    /// Augment a WAV file at a given epoch or level
    Apply {
        input: PathBuf,
        output: PathBuf,
        /// 0-based epoch of the configured schedule
        #[arg(long, conflicts_with = "level")]
        epoch: Option<u32>,
        /// Explicit augmentation level
        #[arg(long)]
        level: Option<f64>,
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(ClapArgs, Debug)]
pub struct ProviderCliArgs {
    #[command(subcommand)]
    pub command: ProviderCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProviderCommand {
    /// Show the current transcription provider configuration
    Show,
    /// Check whether the configured provider is ready
    Status,
    /// Initialize the provider and optionally transcribe a WAV file
    Test {
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
