//! Signature split command.

use tracing::info;

use patchsplit_rs::SplitEngine;

use crate::cli::args::SplitArgs;
use crate::cli::config_layer::build_layered_config;
use crate::cli::output::{
    display_signature_config, display_split_summary, parsing_progress_bar, print_header,
    progress_callback, write_report,
};

/// Run the signature-based split
pub fn split_command(args: SplitArgs) -> anyhow::Result<()> {
    let config = build_layered_config(args.tables.config.as_deref(), &args)?;
    let quiet = args.output.quiet;

    if !quiet {
        print_header();
        display_signature_config(&config);
    }

    let engine = SplitEngine::new(config)?;
    let pb = parsing_progress_bar(quiet)?;
    let callback = pb.as_ref().map(progress_callback);

    let run = engine
        .run_signature_split(callback.as_ref())
        .map_err(|e| anyhow::anyhow!("Signature split failed: {}", e))?;

    if let Some(pb) = pb {
        pb.finish_with_message("Patches parsed");
    }
    info!(
        "Wrote {} train and {} test records",
        run.split.train.len(),
        run.split.test.len()
    );

    if !quiet {
        display_split_summary(&run.report, args.output.top);
    }
    write_report(&run.report, args.output.report.as_deref(), quiet)?;

    Ok(())
}
