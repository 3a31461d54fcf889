//! Configuration management commands.
//!
//! This module contains commands for managing patchsplit configuration files,
//! including initialization, validation, and printing defaults.

use owo_colors::OwoColorize;
use tabled::{settings::Style as TableStyle, Table, Tabled};

use patchsplit_rs::PatchsplitConfig;

use crate::cli::args::{InitConfigArgs, ValidateConfigArgs};
use crate::cli::config_layer::load_configuration;
use crate::cli::output::{display_project_config, display_signature_config};

/// Print default configuration in YAML format
pub fn print_default_config() -> anyhow::Result<()> {
    println!("{}", "# Default patchsplit configuration".dimmed());
    println!(
        "{}",
        "# Save this to a file and customize as needed".dimmed()
    );
    println!(
        "{}",
        "# Usage: patchsplit split --config your-config.yml".dimmed()
    );
    println!();

    let yaml_output = serde_yaml::to_string(&PatchsplitConfig::default())?;
    println!("{}", yaml_output);

    Ok(())
}

/// Initialize a configuration file with defaults
pub fn init_config(args: InitConfigArgs) -> anyhow::Result<()> {
    if args.output.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Configuration file already exists: {}. Use --force to overwrite or choose a different name with --output",
            args.output.display()
        ));
    }

    PatchsplitConfig::default().to_yaml_file(&args.output)?;

    println!(
        "{} {}",
        "Configuration saved to:".bright_green().bold(),
        args.output.display().to_string().cyan()
    );
    println!();
    println!("{}", "Key settings you can customize:".bright_blue().bold());

    /// Row type for the configuration tips table.
    #[derive(Tabled)]
    struct CustomizationRow {
        setting: &'static str,
        description: &'static str,
    }

    let rows = vec![
        CustomizationRow {
            setting: "dataset.patches_dir",
            description: "Directory of <identifier>.patch files (default: patches)",
        },
        CustomizationRow {
            setting: "signature.granularity",
            description: "method, class or file (default: class)",
        },
        CustomizationRow {
            setting: "signature.train_ratio",
            description: "Target fraction of records in train (default: 0.3)",
        },
        CustomizationRow {
            setting: "signature.max_per_signature",
            description: "Sample signatures down to this many pairs (default: unlimited)",
        },
        CustomizationRow {
            setting: "projects.strategy",
            description: "largest-to-test, smallest-to-test or manual",
        },
        CustomizationRow {
            setting: "projects.test_projects",
            description: "Projects held out when the strategy is manual",
        },
    ];

    let mut table = Table::new(rows);
    table.with(TableStyle::rounded());
    println!("{}", table);

    Ok(())
}

/// Validate a patchsplit configuration file
pub fn validate_config(args: ValidateConfigArgs) -> anyhow::Result<()> {
    println!(
        "{} {}",
        "Validating configuration:".bright_blue().bold(),
        args.config.display().to_string().cyan()
    );
    println!();

    let config = load_configuration(Some(&args.config)).and_then(|config| {
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        Ok(config)
    });

    let config = match config {
        Ok(config) => {
            println!("{}", "Configuration file is valid!".bright_green().bold());
            println!();
            config
        }
        Err(e) => {
            eprintln!("{} {}", "Configuration validation failed:".red(), e);
            println!();
            println!("{}", "Common issues:".bright_blue().bold());
            println!("   • Check YAML syntax (indentation, colons, quotes)");
            println!("   • Ratios must lie strictly between 0 and 1");
            println!("   • Extensions must start with '.'");
            println!();
            println!(
                "{}",
                "Tip: Use 'patchsplit print-default-config' to see valid format".dimmed()
            );
            return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
        }
    };

    display_signature_config(&config);
    display_project_config(&config);

    Ok(())
}
