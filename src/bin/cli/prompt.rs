//! Interactive strategy selection for the project split.
//!
//! Only resolves a [`ProjectStrategy`]; the split itself stays a pure call on
//! the library splitter.

use std::collections::BTreeSet;

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use owo_colors::OwoColorize;

use patchsplit_rs::split::{ProjectGrouping, ProjectSplitter, SplitSide};
use patchsplit_rs::ProjectStrategy;

/// One line per greedy strategy, previewing the test projects it would pick.
pub fn strategy_previews(grouping: &ProjectGrouping, test_ratio: f64) -> Vec<(ProjectStrategy, String)> {
    let splitter = ProjectSplitter::new(test_ratio);
    [ProjectStrategy::LargestToTest, ProjectStrategy::SmallestToTest]
        .into_iter()
        .map(|strategy| {
            let preview = splitter.split(grouping.groups.clone(), &strategy);
            let names: Vec<&str> = preview
                .groups_on(SplitSide::Test)
                .map(|g| g.key.as_str())
                .collect();
            let label = format!(
                "{strategy}: test = [{}] ({} records, {:.1}%)",
                names.join(", "),
                preview.stats.test_records,
                preview.stats.test_record_pct()
            );
            (strategy, label)
        })
        .collect()
}

/// Parse a comma-separated project list, dropping blanks.
pub fn parse_project_list(input: &str) -> BTreeSet<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Ask the operator for a strategy.
pub fn choose_strategy(grouping: &ProjectGrouping, test_ratio: f64) -> anyhow::Result<ProjectStrategy> {
    println!("{}", "Projects".bright_blue().bold());
    for (project, records) in &grouping.groups {
        println!("  {:<20} {}", project, records.len());
    }
    println!();

    let theme = ColorfulTheme::default();
    let mut options = strategy_previews(grouping, test_ratio);
    let mut items: Vec<String> = options.iter().map(|(_, label)| label.clone()).collect();
    items.push("custom: enter test projects".to_string());

    let choice = Select::with_theme(&theme)
        .with_prompt(format!("Select test projects (target {:.0}% of records)", test_ratio * 100.0))
        .items(&items)
        .default(0)
        .interact()?;

    if choice < options.len() {
        return Ok(options.swap_remove(choice).0);
    }

    let known: BTreeSet<&str> = grouping.groups.keys().map(String::as_str).collect();
    let raw: String = Input::with_theme(&theme)
        .with_prompt("Test projects (comma-separated)")
        .validate_with(|text: &String| -> Result<(), String> {
            let projects = parse_project_list(text);
            if projects.is_empty() {
                return Err("enter at least one project".to_string());
            }
            match projects.iter().find(|p| !known.contains(p.as_str())) {
                Some(unknown) => Err(format!("unknown project '{unknown}'")),
                None => Ok(()),
            }
        })
        .interact_text()?;

    Ok(ProjectStrategy::Manual(parse_project_list(&raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchsplit_rs::Record;

    fn grouping() -> ProjectGrouping {
        let mut grouping = ProjectGrouping::default();
        for (project, size) in [("Lang", 2), ("Chart", 5), ("Math", 1)] {
            let records = (0..size)
                .map(|i| Record::new(format!("p{i}-defects4j-{project}-{i}"), "gt", "1"))
                .collect();
            grouping.groups.insert(project.to_string(), records);
        }
        grouping
    }

    #[test]
    fn previews_name_the_test_projects() {
        let previews = strategy_previews(&grouping(), 0.5);
        assert_eq!(previews.len(), 2);
        assert!(previews[0].1.starts_with("largest-to-test: test = [Chart]"));
        assert!(previews[1].1.starts_with("smallest-to-test: test = [Math, Lang, Chart]"));
    }

    #[test]
    fn project_list_parsing_trims_and_dedups() {
        let projects = parse_project_list(" Chart, ,Lang,Chart ");
        assert_eq!(projects.into_iter().collect::<Vec<_>>(), vec!["Chart", "Lang"]);
    }
}
