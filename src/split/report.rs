//! Split statistics.
//!
//! Group-level and record-level percentages are reported separately: half of
//! the groups may hold far more or far fewer than half of the records. Every
//! percentage is 0.0 when its denominator is zero.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::GroupedSplit;
use crate::core::errors::{PatchsplitError, Result};

/// Side of a train/test split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitSide {
    /// Training subset
    Train,
    /// Testing subset
    Test,
}

impl std::fmt::Display for SplitSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Train => f.write_str("train"),
            Self::Test => f.write_str("test"),
        }
    }
}

/// One group and where it went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary<K> {
    /// Group key (signature or project)
    pub key: K,
    /// Records in the group after capping
    pub size: usize,
    /// Side the whole group was assigned to
    pub side: SplitSide,
}

/// Counts describing one split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitStats {
    /// Number of groups
    pub total_groups: usize,
    /// Groups assigned to train
    pub train_groups: usize,
    /// Groups assigned to test
    pub test_groups: usize,
    /// Records entering the split, before any per-group cap
    pub records_before_cap: usize,
    /// Records actually split
    pub total_records: usize,
    /// Records in train
    pub train_records: usize,
    /// Records in test
    pub test_records: usize,
    /// Side whose size the greedy fill aimed at
    pub target_side: SplitSide,
    /// Requested fraction of records on `target_side`
    pub target_ratio: f64,
    /// `floor(total_records * target_ratio)`
    pub target_count: usize,
}

impl SplitStats {
    /// Percentage of groups in train
    pub fn train_group_pct(&self) -> f64 {
        percentage(self.train_groups, self.total_groups)
    }

    /// Percentage of groups in test
    pub fn test_group_pct(&self) -> f64 {
        percentage(self.test_groups, self.total_groups)
    }

    /// Percentage of records in train
    pub fn train_record_pct(&self) -> f64 {
        percentage(self.train_records, self.total_records)
    }

    /// Percentage of records in test
    pub fn test_record_pct(&self) -> f64 {
        percentage(self.test_records, self.total_records)
    }

    /// Target percentage of records in train
    pub fn target_train_pct(&self) -> f64 {
        match self.target_side {
            SplitSide::Train => self.target_ratio * 100.0,
            SplitSide::Test => (1.0 - self.target_ratio) * 100.0,
        }
    }

    /// Records that landed on the target side
    pub fn achieved_count(&self) -> usize {
        match self.target_side {
            SplitSide::Train => self.train_records,
            SplitSide::Test => self.test_records,
        }
    }

    /// Absolute distance between achieved and target counts
    pub fn difference(&self) -> usize {
        self.achieved_count().abs_diff(self.target_count)
    }

    /// Records removed by the per-group cap
    pub fn capped_out(&self) -> usize {
        self.records_before_cap - self.total_records
    }
}

/// Which splitter produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// Grouped by signature, train fraction targeted
    Signature,
    /// Grouped by project, test fraction targeted
    Project,
}

/// A group in the serialized report, keyed by its display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupReport {
    /// Signature tuple or project name
    pub key: String,
    /// Records in the group
    pub size: usize,
    /// Side the group was assigned to
    pub side: SplitSide,
}

/// Everything a run reports: statistics, drops, cache use and groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitReport {
    /// Splitter that ran
    pub mode: SplitMode,
    /// Granularity or strategy in effect
    pub setting: String,
    /// Train table written, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub train_output: Option<PathBuf>,
    /// Test table written, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_output: Option<PathBuf>,
    /// Records read from the input table
    pub input_records: usize,
    /// Records excluded before grouping (identifier mismatch or unparseable)
    pub dropped_records: usize,
    /// Distinct patches parsed
    pub patches_parsed: usize,
    /// Patch lookups answered from the cache
    pub cache_hits: usize,
    /// Split statistics
    pub stats: SplitStats,
    /// Every group in assignment order
    pub groups: Vec<GroupReport>,
}

impl SplitReport {
    /// Report over `split`; counters not known to the splitter start at zero.
    pub fn new<K: Display>(mode: SplitMode, setting: impl Into<String>, split: &GroupedSplit<K>) -> Self {
        Self {
            mode,
            setting: setting.into(),
            train_output: None,
            test_output: None,
            input_records: split.stats.records_before_cap,
            dropped_records: 0,
            patches_parsed: 0,
            cache_hits: 0,
            stats: split.stats.clone(),
            groups: split
                .groups
                .iter()
                .map(|g| GroupReport {
                    key: g.key.to_string(),
                    size: g.size,
                    side: g.side,
                })
                .collect(),
        }
    }

    /// The `n` largest groups, ties in assignment order.
    pub fn largest_groups(&self, n: usize) -> Vec<&GroupReport> {
        let mut groups: Vec<&GroupReport> = self.groups.iter().collect();
        groups.sort_by(|a, b| b.size.cmp(&a.size));
        groups.truncate(n);
        groups
    }

    /// Write the report as pretty JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| {
            PatchsplitError::io(format!("Failed to write report: {}", path.display()), e)
        })
    }
}

/// `part / total` as a percentage, 0.0 for an empty total.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}
