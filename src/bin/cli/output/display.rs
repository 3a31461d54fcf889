//! Display and output formatting functions for CLI.
//!
//! Summary tables for a finished split: settings, achieved versus target
//! statistics and the largest groups.

use owo_colors::OwoColorize;
use tabled::{settings::Style as TableStyle, Table, Tabled};

use patchsplit_rs::split::{SplitMode, SplitReport, SplitSide};
use patchsplit_rs::{PatchFeatures, PatchsplitConfig};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Print patchsplit header with version info
pub fn print_header() {
    println!("{}", format!("Patchsplit v{VERSION}").bright_blue().bold());
}

#[derive(Tabled)]
struct SettingRow {
    setting: String,
    value: String,
}

#[derive(Tabled)]
struct StatRow {
    metric: String,
    train: String,
    test: String,
}

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "#")]
    rank: usize,
    group: String,
    records: usize,
    side: String,
}

/// Print the settings a signature split will run with
pub fn display_signature_config(config: &PatchsplitConfig) {
    let rows = vec![
        SettingRow {
            setting: "Input".to_string(),
            value: config.dataset.input_path.display().to_string(),
        },
        SettingRow {
            setting: "Patches".to_string(),
            value: config.dataset.patches_dir.display().to_string(),
        },
        SettingRow {
            setting: "Granularity".to_string(),
            value: config.signature.granularity.to_string(),
        },
        SettingRow {
            setting: "Train ratio".to_string(),
            value: format!("{:.2}", config.signature.train_ratio),
        },
        SettingRow {
            setting: "Max per signature".to_string(),
            value: config
                .signature
                .max_per_signature
                .map_or_else(|| "unlimited".to_string(), |cap| cap.to_string()),
        },
        SettingRow {
            setting: "Seed".to_string(),
            value: config.signature.seed.to_string(),
        },
    ];
    print_table(rows);
}

/// Print the settings a project split will run with
pub fn display_project_config(config: &PatchsplitConfig) {
    let rows = vec![
        SettingRow {
            setting: "Input".to_string(),
            value: config.dataset.input_path.display().to_string(),
        },
        SettingRow {
            setting: "Test ratio".to_string(),
            value: format!("{:.2}", config.projects.test_ratio),
        },
        SettingRow {
            setting: "Strategy".to_string(),
            value: config.projects.strategy().to_string(),
        },
    ];
    print_table(rows);
}

/// Print achieved versus target statistics and the largest groups
pub fn display_split_summary(report: &SplitReport, top: usize) {
    let stats = &report.stats;
    let group_label = match report.mode {
        SplitMode::Signature => "Signatures",
        SplitMode::Project => "Projects",
    };

    println!();
    println!("{}", "Split Summary".bright_blue().bold());

    let rows = vec![
        StatRow {
            metric: group_label.to_string(),
            train: format!("{} ({:.1}%)", stats.train_groups, stats.train_group_pct()),
            test: format!("{} ({:.1}%)", stats.test_groups, stats.test_group_pct()),
        },
        StatRow {
            metric: "Records".to_string(),
            train: format!("{} ({:.1}%)", stats.train_records, stats.train_record_pct()),
            test: format!("{} ({:.1}%)", stats.test_records, stats.test_record_pct()),
        },
        StatRow {
            metric: "Target".to_string(),
            train: format!("{:.1}%", stats.target_train_pct()),
            test: format!("{:.1}%", 100.0 - stats.target_train_pct()),
        },
    ];
    print_table(rows);

    println!(
        "  target {} {} | achieved {} | difference {}",
        stats.target_side,
        stats.target_count,
        stats.achieved_count(),
        stats.difference()
    );
    println!(
        "  {} input records | {} grouped | {} dropped",
        report.input_records,
        stats.records_before_cap,
        report.dropped_records
    );
    if stats.capped_out() > 0 {
        println!(
            "  {} records removed by the per-signature cap ({} -> {})",
            stats.capped_out(),
            stats.records_before_cap,
            stats.total_records
        );
    }
    if report.mode == SplitMode::Signature {
        println!(
            "  {} patches parsed | {} cache hits",
            report.patches_parsed, report.cache_hits
        );
    }
    if report.dropped_records > 0 {
        let reason = match report.mode {
            SplitMode::Signature => "candidate and ground-truth address different bugs",
            SplitMode::Project => "no project identifier in uid",
        };
        println!(
            "  {} {} records dropped: {}",
            "!".yellow().bold(),
            report.dropped_records,
            reason
        );
    }

    let largest = report.largest_groups(top);
    if !largest.is_empty() {
        println!();
        println!("{}", format!("Largest {} {}", largest.len(), group_label.to_lowercase()).bright_blue().bold());
        let rows: Vec<GroupRow> = largest
            .iter()
            .enumerate()
            .map(|(index, group)| GroupRow {
                rank: index + 1,
                group: group.key.clone(),
                records: group.size,
                side: match group.side {
                    SplitSide::Train => "train".green().to_string(),
                    SplitSide::Test => "test".yellow().to_string(),
                },
            })
            .collect();
        print_table(rows);
    }

    if let (Some(train), Some(test)) = (&report.train_output, &report.test_output) {
        println!();
        println!(
            "{} {}",
            "Train:".bright_green().bold(),
            train.display().to_string().cyan()
        );
        println!(
            "{} {}",
            "Test: ".bright_green().bold(),
            test.display().to_string().cyan()
        );
    }
}

/// Print the features extracted from one patch
pub fn display_patch_features(features: &PatchFeatures) {
    println!("{}", "Modified files".bright_blue().bold());
    if features.modified_files.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for file in &features.modified_files {
        println!("  {file}");
    }

    println!("{}", "Modified methods".bright_blue().bold());
    let rows: Vec<SettingRow> = features
        .file_method_pairs
        .iter()
        .map(|(file, method)| SettingRow {
            setting: method.clone(),
            value: file.clone(),
        })
        .collect();
    if rows.is_empty() {
        println!("  {}", "(none)".dimmed());
    } else {
        print_table(rows);
    }
}

fn print_table<T: Tabled>(rows: Vec<T>) {
    let mut table = Table::new(rows);
    table.with(TableStyle::rounded());
    println!("{table}");
}
