//! Configuration Layer Management
//!
//! Configuration is assembled in layers: built-in defaults, then a YAML file
//! (explicit `--config` or an implicit `.patchsplit.yml`), then CLI overrides.
//! Validation runs once, on the merged result.

use std::path::{Path, PathBuf};

use patchsplit_rs::core::config::ProjectStrategyKind;
use patchsplit_rs::PatchsplitConfig;

use crate::cli::args::{ProjectSplitArgs, SplitArgs, TableArgs};

/// Files picked up from the working directory when no `--config` is given.
pub const IMPLICIT_CONFIG_FILES: [&str; 2] = [".patchsplit.yml", ".patchsplit.yaml"];

/// Apply CLI arguments on top of a loaded configuration
pub trait ApplyCliOverrides {
    /// Overwrite every setting the arguments carry explicitly
    fn apply_to(&self, config: &mut PatchsplitConfig);
}

/// Load the file layer: explicit path, implicit local file, or defaults.
pub fn load_configuration(explicit: Option<&Path>) -> anyhow::Result<PatchsplitConfig> {
    let implicit = if explicit.is_none() {
        IMPLICIT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
    } else {
        None
    };

    match explicit.map(Path::to_path_buf).or(implicit) {
        Some(path) => PatchsplitConfig::from_yaml_file(&path).map_err(|e| {
            anyhow::anyhow!(
                "Failed to load configuration from {}: {}",
                path.display(),
                e
            )
        }),
        None => Ok(PatchsplitConfig::default()),
    }
}

/// Defaults, file, CLI overrides, then validation.
pub fn build_layered_config<A: ApplyCliOverrides>(
    config_path: Option<&Path>,
    args: &A,
) -> anyhow::Result<PatchsplitConfig> {
    let mut config = load_configuration(config_path)?;
    args.apply_to(&mut config);
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Configuration validation failed: {}", e))?;
    Ok(config)
}

impl ApplyCliOverrides for TableArgs {
    fn apply_to(&self, config: &mut PatchsplitConfig) {
        if let Some(input) = &self.input {
            config.dataset.input_path = input.clone();
        }
        if let Some(train) = &self.train_output {
            config.dataset.train_output = Some(train.clone());
        }
        if let Some(test) = &self.test_output {
            config.dataset.test_output = Some(test.clone());
        }
    }
}

impl ApplyCliOverrides for SplitArgs {
    fn apply_to(&self, config: &mut PatchsplitConfig) {
        self.tables.apply_to(config);

        if let Some(dir) = &self.patches_dir {
            config.dataset.patches_dir = dir.clone();
        }
        if let Some(granularity) = self.granularity {
            config.signature.granularity = granularity;
        }
        if let Some(ratio) = self.train_ratio {
            config.signature.train_ratio = ratio;
        }
        if let Some(cap) = self.max_per_signature {
            config.signature.max_per_signature = Some(cap);
        }
        if let Some(seed) = self.seed {
            config.signature.seed = seed;
        }
    }
}

impl ApplyCliOverrides for ProjectSplitArgs {
    fn apply_to(&self, config: &mut PatchsplitConfig) {
        self.tables.apply_to(config);

        if let Some(ratio) = self.test_ratio {
            config.projects.test_ratio = ratio;
        }
        let projects: Vec<String> = self
            .test_projects
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        if !projects.is_empty() {
            config.projects.test_projects = projects;
            if self.strategy.is_none() {
                config.projects.strategy = ProjectStrategyKind::Manual;
            }
        }
        if let Some(strategy) = self.strategy {
            config.projects.strategy = strategy;
        }
    }
}
