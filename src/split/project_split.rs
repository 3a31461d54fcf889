//! Project-atomic split aiming at a test fraction of records.
//!
//! Cross-project evaluation: every record of a project lands on one side, so
//! a model is tested on projects it never saw during training.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use tracing::{info, warn};

use super::{collect_split, greedy_fill, target_count, ProjectSplit, SplitSide, SplitStats};
use crate::core::bug_id::BugIdParser;
use crate::core::config::ProjectSplitConfig;
use crate::core::dataset::Record;

/// How test projects are chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectStrategy {
    /// Greedily fill test with the largest projects first
    LargestToTest,
    /// Greedily fill test with the smallest projects first
    SmallestToTest,
    /// Exactly these projects go to test
    Manual(BTreeSet<String>),
}

impl std::fmt::Display for ProjectStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LargestToTest => f.write_str("largest-to-test"),
            Self::SmallestToTest => f.write_str("smallest-to-test"),
            Self::Manual(projects) => {
                let names: Vec<&str> = projects.iter().map(String::as_str).collect();
                write!(f, "manual ({})", names.join(", "))
            }
        }
    }
}

/// Records bucketed by project, plus those without a recognisable project.
#[derive(Debug, Clone, Default)]
pub struct ProjectGrouping {
    /// Project name to its records, in order of first appearance
    pub groups: IndexMap<String, Vec<Record>>,
    /// Records whose uid carries no bug identifier
    pub unparseable: Vec<Record>,
}

impl ProjectGrouping {
    /// Records that made it into a project bucket
    pub fn grouped_records(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// Bucket `records` by the project named in each uid.
pub fn group_by_project(records: Vec<Record>, parser: &BugIdParser) -> ProjectGrouping {
    let mut grouping = ProjectGrouping::default();
    for record in records {
        match parser.parse(&record.uid) {
            Some(bug) => grouping.groups.entry(bug.project).or_default().push(record),
            None => {
                warn!("No project identifier in uid '{}'; record excluded", record.uid);
                grouping.unparseable.push(record);
            }
        }
    }
    if !grouping.unparseable.is_empty() {
        warn!(
            "{} records excluded from project grouping",
            grouping.unparseable.len()
        );
    }
    grouping
}

/// Greedy, project-atomic splitter.
#[derive(Debug, Clone)]
pub struct ProjectSplitter {
    test_ratio: f64,
}

impl ProjectSplitter {
    /// Splitter targeting `test_ratio` of records in test.
    pub fn new(test_ratio: f64) -> Self {
        Self { test_ratio }
    }

    /// Splitter configured from the project split settings.
    pub fn from_config(config: &ProjectSplitConfig) -> Self {
        Self::new(config.test_ratio)
    }

    /// Assign every project in `groups` to train or test according to `strategy`.
    pub fn split(
        &self,
        groups: IndexMap<String, Vec<Record>>,
        strategy: &ProjectStrategy,
    ) -> ProjectSplit {
        let total: usize = groups.values().map(Vec::len).sum();
        let target_test = target_count(total, self.test_ratio);
        let mut ordered: Vec<(String, Vec<Record>)> = groups.into_iter().collect();

        let assigned = match strategy {
            ProjectStrategy::LargestToTest => {
                ordered.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
                greedy_fill(ordered, SplitSide::Test, target_test)
            }
            ProjectStrategy::SmallestToTest => {
                ordered.sort_by(|a, b| a.1.len().cmp(&b.1.len()));
                greedy_fill(ordered, SplitSide::Test, target_test)
            }
            ProjectStrategy::Manual(test_projects) => {
                for name in test_projects {
                    if !ordered.iter().any(|(project, _)| project == name) {
                        warn!("Requested test project '{}' does not occur in the input", name);
                    }
                }
                ordered
                    .into_iter()
                    .map(|(project, records)| {
                        let side = if test_projects.contains(&project) {
                            SplitSide::Test
                        } else {
                            SplitSide::Train
                        };
                        (project, records, side)
                    })
                    .collect()
            }
        };

        let stats = SplitStats {
            total_groups: 0,
            train_groups: 0,
            test_groups: 0,
            records_before_cap: total,
            total_records: total,
            train_records: 0,
            test_records: 0,
            target_side: SplitSide::Test,
            target_ratio: self.test_ratio,
            target_count: target_test,
        };
        let split = collect_split(assigned, |record: Record| record, stats);

        info!(
            "Project split ({}): {} train / {} test projects, {} train / {} test records (target {} test)",
            strategy,
            split.stats.train_groups,
            split.stats.test_groups,
            split.stats.train_records,
            split.stats.test_records,
            split.stats.target_count
        );
        split
    }
}
