//! Output Formatting and Progress Feedback
//!
//! Console summaries, the parsing progress bar and the JSON report writer.

mod display;

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use patchsplit_rs::{ProgressCallback, SplitReport};

pub use display::{
    display_patch_features, display_project_config, display_signature_config,
    display_split_summary, print_header,
};

/// Progress bar over the records of the input table
pub fn parsing_progress_bar(quiet: bool) -> anyhow::Result<Option<ProgressBar>> {
    if quiet {
        return Ok(None);
    }
    let pb = ProgressBar::new(100);
    pb.set_style(ProgressStyle::with_template(
        "{msg} [{bar:40.bright_blue/blue}] {pos:>3}% {elapsed_precise}",
    )?);
    pb.set_message("Parsing patches");
    Ok(Some(pb))
}

/// Callback feeding the engine's progress into `pb`
pub fn progress_callback(pb: &ProgressBar) -> ProgressCallback {
    let pb = pb.clone();
    Box::new(move |stage: &str, progress: f64| {
        pb.set_message(stage.to_string());
        pb.set_position((progress * 100.0).round() as u64);
    })
}

/// Write the JSON report when a path was requested
pub fn write_report(report: &SplitReport, path: Option<&Path>, quiet: bool) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    report
        .write_json(path)
        .map_err(|e| anyhow::anyhow!("Failed to write report: {}", e))?;
    if !quiet {
        println!(
            "{} {}",
            "Report:".bright_green().bold(),
            path.display().to_string().cyan()
        );
    }
    Ok(())
}
