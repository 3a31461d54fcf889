//! Configuration types and management for patchsplit-rs.
//!
//! A configuration is assembled in layers by the CLI: built-in defaults, an
//! optional YAML file, then command-line overrides. [`PatchsplitConfig::validate`]
//! runs last and is the single gate before any split is computed.

pub mod validation;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{PatchsplitError, Result};
use crate::signature::Granularity;
use crate::split::ProjectStrategy;

pub use validation::{
    validate_extension, validate_non_blank, validate_open_unit_interval, validate_positive_usize,
};

/// Main configuration for a split run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchsplitConfig {
    /// Input table, patch archive and output locations
    pub dataset: DatasetConfig,

    /// Patch feature extraction settings
    pub extraction: ExtractionConfig,

    /// Signature-based split settings
    pub signature: SignatureSplitConfig,

    /// Project-based split settings
    pub projects: ProjectSplitConfig,
}

impl PatchsplitConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            PatchsplitError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        serde_yaml::from_str(&content).map_err(Into::into)
    }

    /// Save configuration to a YAML file
    pub fn to_yaml_file(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content).map_err(|e| {
            PatchsplitError::io(
                format!("Failed to write config file: {}", path.display()),
                e,
            )
        })
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        self.dataset.validate()?;
        self.extraction.validate()?;
        self.signature.validate()?;
        self.projects.validate()?;
        Ok(())
    }
}

/// Dataset locations and column names
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Labeled pair table (CSV with a header row)
    pub input_path: PathBuf,

    /// Directory holding one `<identifier><patch_extension>` file per patch
    pub patches_dir: PathBuf,

    /// Train output table; defaults to `<input_stem>_train.csv` next to the input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub train_output: Option<PathBuf>,

    /// Test output table; defaults to `<input_stem>_test.csv` next to the input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_output: Option<PathBuf>,

    /// Column naming the candidate patch
    pub uid_column: String,

    /// Column naming the ground-truth patch
    pub groundtruth_column: String,

    /// Candidate names for the label column, first present wins
    pub label_columns: Vec<String>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("labeled_pairs.csv"),
            patches_dir: PathBuf::from("patches"),
            train_output: None,
            test_output: None,
            uid_column: "uid".to_string(),
            groundtruth_column: "groundtruth_index".to_string(),
            label_columns: vec!["expert_label".to_string(), "label".to_string()],
        }
    }
}

impl DatasetConfig {
    /// Resolved path of the train output table
    pub fn train_output_path(&self) -> PathBuf {
        self.train_output
            .clone()
            .unwrap_or_else(|| derived_output_path(&self.input_path, "train"))
    }

    /// Resolved path of the test output table
    pub fn test_output_path(&self) -> PathBuf {
        self.test_output
            .clone()
            .unwrap_or_else(|| derived_output_path(&self.input_path, "test"))
    }

    /// Validate dataset configuration
    pub fn validate(&self) -> Result<()> {
        validate_non_blank(&self.uid_column, "dataset.uid_column")?;
        validate_non_blank(&self.groundtruth_column, "dataset.groundtruth_column")?;
        if self.uid_column == self.groundtruth_column {
            return Err(PatchsplitError::config_field(
                "uid and ground-truth columns must differ",
                "dataset.groundtruth_column",
            ));
        }
        if self.train_output_path() == self.test_output_path() {
            return Err(PatchsplitError::config_field(
                "train and test outputs must be different files",
                "dataset.test_output",
            ));
        }
        Ok(())
    }
}

fn derived_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("labeled_pairs");
    let ext = input
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("csv");
    input.with_file_name(format!("{stem}_{suffix}.{ext}"))
}

/// Patch parsing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Only files with this extension contribute features
    pub source_extension: String,

    /// Extension of patch files in the patch directory
    pub patch_extension: String,

    /// Benchmark prefix preceding `<Project>-<Number>` in patch identifiers
    pub bug_id_prefix: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            source_extension: ".java".to_string(),
            patch_extension: ".patch".to_string(),
            bug_id_prefix: "defects4j".to_string(),
        }
    }
}

impl ExtractionConfig {
    /// Validate extraction configuration
    pub fn validate(&self) -> Result<()> {
        validate_extension(&self.source_extension, "extraction.source_extension")?;
        validate_extension(&self.patch_extension, "extraction.patch_extension")?;
        validate_non_blank(&self.bug_id_prefix, "extraction.bug_id_prefix")?;
        Ok(())
    }
}

/// Signature-based split settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignatureSplitConfig {
    /// Level at which touched code is fingerprinted
    pub granularity: Granularity,

    /// Target fraction of records placed in train
    pub train_ratio: f64,

    /// Keep at most this many records per signature (sampled)
    pub max_per_signature: Option<usize>,

    /// Seed for the per-signature sampling
    pub seed: u64,
}

impl Default for SignatureSplitConfig {
    fn default() -> Self {
        Self {
            granularity: Granularity::Class,
            train_ratio: 0.3,
            max_per_signature: None,
            seed: 42,
        }
    }
}

impl SignatureSplitConfig {
    /// Validate signature split configuration
    pub fn validate(&self) -> Result<()> {
        validate_open_unit_interval(self.train_ratio, "signature.train_ratio")?;
        if let Some(cap) = self.max_per_signature {
            validate_positive_usize(cap, "signature.max_per_signature")?;
        }
        Ok(())
    }
}

/// How the project-based split chooses its test projects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStrategyKind {
    /// Largest projects go to test first
    LargestToTest,
    /// Smallest projects go to test first
    SmallestToTest,
    /// An explicit project list goes to test
    Manual,
}

/// Project-based split settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSplitConfig {
    /// Target fraction of records placed in test
    pub test_ratio: f64,

    /// Greedy strategy or manual selection
    pub strategy: ProjectStrategyKind,

    /// Projects sent to test when `strategy` is `manual`
    pub test_projects: Vec<String>,
}

impl Default for ProjectSplitConfig {
    fn default() -> Self {
        Self {
            test_ratio: 0.7,
            strategy: ProjectStrategyKind::LargestToTest,
            test_projects: Vec::new(),
        }
    }
}

impl ProjectSplitConfig {
    /// The splitter-facing strategy described by this configuration
    pub fn strategy(&self) -> ProjectStrategy {
        match self.strategy {
            ProjectStrategyKind::LargestToTest => ProjectStrategy::LargestToTest,
            ProjectStrategyKind::SmallestToTest => ProjectStrategy::SmallestToTest,
            ProjectStrategyKind::Manual => {
                ProjectStrategy::Manual(self.test_projects.iter().cloned().collect())
            }
        }
    }

    /// Validate project split configuration
    pub fn validate(&self) -> Result<()> {
        validate_open_unit_interval(self.test_ratio, "projects.test_ratio")?;
        if self.strategy == ProjectStrategyKind::Manual
            && self.test_projects.iter().all(|p| p.trim().is_empty())
        {
            return Err(PatchsplitError::config_field(
                "manual strategy requires at least one test project",
                "projects.test_projects",
            ));
        }
        Ok(())
    }
}
