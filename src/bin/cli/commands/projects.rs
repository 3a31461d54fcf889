//! Project split command.

use console::Term;
use tracing::info;

use patchsplit_rs::core::bug_id::BugIdParser;
use patchsplit_rs::split::group_by_project;
use patchsplit_rs::SplitEngine;

use crate::cli::args::ProjectSplitArgs;
use crate::cli::config_layer::build_layered_config;
use crate::cli::output::{display_project_config, display_split_summary, print_header, write_report};
use crate::cli::prompt::choose_strategy;

/// Run the project-based split
pub fn split_projects_command(args: ProjectSplitArgs) -> anyhow::Result<()> {
    let config = build_layered_config(args.tables.config.as_deref(), &args)?;
    let quiet = args.output.quiet;

    if args.interactive && !Term::stdout().is_term() {
        anyhow::bail!("--interactive needs a terminal; pass --strategy or --test-projects instead");
    }

    if !quiet {
        print_header();
        if !args.interactive {
            display_project_config(&config);
        }
    }

    let engine = SplitEngine::new(config)?;
    let dataset = engine.load_dataset()?;

    let strategy = if args.interactive {
        let parser = BugIdParser::new(&engine.config().extraction.bug_id_prefix)?;
        let grouping = group_by_project(dataset.records.clone(), &parser);
        choose_strategy(&grouping, engine.config().projects.test_ratio)?
    } else {
        engine.config().projects.strategy()
    };
    info!("Project strategy: {}", strategy);

    let mut run = engine.project_split(dataset, &strategy);
    engine
        .write_outputs(&mut run)
        .map_err(|e| anyhow::anyhow!("Project split failed: {}", e))?;

    if !quiet {
        display_split_summary(&run.report, args.output.top);
    }
    write_report(&run.report, args.output.report.as_deref(), quiet)?;

    Ok(())
}
