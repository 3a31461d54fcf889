//! CLI Argument Structures
//!
//! This module contains all CLI argument definitions and command structures
//! used by the patchsplit binary.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use patchsplit_rs::core::config::ProjectStrategyKind;
use patchsplit_rs::Granularity;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Leakage-aware train/test splitting for labeled patch-pair datasets
#[derive(Parser)]
#[command(name = "patchsplit")]
#[command(version = VERSION)]
#[command(about = "Patchsplit - leakage-aware train/test splits for patch-pair datasets")]
#[command(long_about = "
Split a labeled table of patch pairs into train and test tables without letting
structurally related pairs end up on both sides.

Common Usage:

  # Signature split at class granularity, 30% of records in train
  patchsplit split --input labeled_pairs.csv --patches-dir patches

  # Method-level signatures, 70% train, at most 20 pairs per signature
  patchsplit split --granularity method --train-ratio 0.7 --max-per-signature 20

  # Cross-project split, largest projects to test
  patchsplit split-projects --strategy largest-to-test --test-ratio 0.7

  # Hold out explicit projects
  patchsplit split-projects --test-projects Chart,Lang

  # See what the extractor finds in one patch
  patchsplit inspect-patch patches/patch1-defects4j-Chart-1.patch
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split by structural signature, targeting a train fraction
    Split(Box<SplitArgs>),

    /// Split by project, targeting a test fraction
    #[command(name = "split-projects")]
    SplitProjects(Box<ProjectSplitArgs>),

    /// Print the features extracted from a single patch file
    #[command(name = "inspect-patch")]
    InspectPatch(InspectPatchArgs),

    /// Print default configuration in YAML format
    #[command(name = "print-default-config")]
    PrintDefaultConfig,

    /// Initialize a configuration file with defaults
    #[command(name = "init-config")]
    InitConfig(InitConfigArgs),

    /// Validate a patchsplit configuration file
    #[command(name = "validate-config")]
    ValidateConfig(ValidateConfigArgs),
}

/// Input and output table locations shared by both splits
#[derive(Args, Debug, Clone, Default)]
pub struct TableArgs {
    /// Configuration file (defaults to .patchsplit.yml in the working directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Labeled pair table to split
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Train output table [default: <input>_train.csv]
    #[arg(long)]
    pub train_output: Option<PathBuf>,

    /// Test output table [default: <input>_test.csv]
    #[arg(long)]
    pub test_output: Option<PathBuf>,
}

/// Reporting options shared by both splits
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Also write the split report as JSON to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Number of largest groups to list in the summary
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Suppress the progress bar and summary tables
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the signature split
#[derive(Args, Debug, Clone)]
pub struct SplitArgs {
    #[command(flatten)]
    pub tables: TableArgs,

    /// Directory holding <identifier>.patch files
    #[arg(short, long)]
    pub patches_dir: Option<PathBuf>,

    /// Signature granularity
    #[arg(short, long, value_enum)]
    pub granularity: Option<Granularity>,

    /// Target fraction of records in train (0 < r < 1)
    #[arg(long)]
    pub train_ratio: Option<f64>,

    /// Keep at most this many randomly sampled pairs per signature
    #[arg(long)]
    pub max_per_signature: Option<usize>,

    /// Seed for the per-signature sampling
    #[arg(long)]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub output: ReportArgs,
}

/// Arguments for the project split
#[derive(Args, Debug, Clone)]
pub struct ProjectSplitArgs {
    #[command(flatten)]
    pub tables: TableArgs,

    /// Target fraction of records in test (0 < r < 1)
    #[arg(long)]
    pub test_ratio: Option<f64>,

    /// How test projects are chosen
    #[arg(short, long, value_enum)]
    pub strategy: Option<ProjectStrategyKind>,

    /// Projects to hold out for test (implies the manual strategy)
    #[arg(long, value_delimiter = ',')]
    pub test_projects: Vec<String>,

    /// Choose the strategy from a prompt after seeing the projects
    #[arg(long)]
    pub interactive: bool,

    #[command(flatten)]
    pub output: ReportArgs,
}

/// Arguments for inspecting one patch
#[derive(Args, Debug, Clone)]
pub struct InspectPatchArgs {
    /// Patch file to parse
    pub patch: PathBuf,

    /// Only files with this extension contribute features
    #[arg(long, default_value = ".java")]
    pub source_extension: String,

    /// Print the features as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct InitConfigArgs {
    /// Output configuration file name
    #[arg(short, long, default_value = ".patchsplit.yml")]
    pub output: PathBuf,

    /// Overwrite existing configuration file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ValidateConfigArgs {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: PathBuf,
}
