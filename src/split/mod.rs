//! Group-atomic train/test splitting.
//!
//! Both splitters assign whole groups, never individual records, so that
//! related patch pairs cannot leak across the split. The greedy fill walks
//! groups in a strategy-specific order and keeps feeding the target side
//! until it holds at least the target number of records.

pub mod project_split;
pub mod report;
pub mod signature_split;

pub use project_split::{group_by_project, ProjectGrouping, ProjectSplitter, ProjectStrategy};
pub use report::{percentage, GroupReport, GroupSummary, SplitMode, SplitReport, SplitSide, SplitStats};
pub use signature_split::{GroupEntry, SignatureGroups, SignatureSplitter};

use crate::core::dataset::Record;
use crate::signature::Signature;

/// Records on each side of a split plus the groups behind them.
#[derive(Debug, Clone)]
pub struct GroupedSplit<K> {
    /// Training records
    pub train: Vec<Record>,
    /// Testing records
    pub test: Vec<Record>,
    /// Every group in assignment order
    pub groups: Vec<GroupSummary<K>>,
    /// Summary counts
    pub stats: SplitStats,
}

impl<K> GroupedSplit<K> {
    /// Groups that went to `side`, in assignment order
    pub fn groups_on(&self, side: SplitSide) -> impl Iterator<Item = &GroupSummary<K>> {
        self.groups.iter().filter(move |g| g.side == side)
    }
}

/// Result of the signature-based split
pub type SignatureSplit = GroupedSplit<Signature>;

/// Result of the project-based split
pub type ProjectSplit = GroupedSplit<String>;

/// `floor(total * ratio)`.
pub(crate) fn target_count(total: usize, ratio: f64) -> usize {
    (total as f64 * ratio).floor() as usize
}

/// Greedily assign ordered groups to `target` until it holds `target_count`
/// records; every later group goes to the other side. Groups stay whole.
pub(crate) fn greedy_fill<K, T>(
    ordered: Vec<(K, Vec<T>)>,
    target: SplitSide,
    target_count: usize,
) -> Vec<(K, Vec<T>, SplitSide)> {
    let other = match target {
        SplitSide::Train => SplitSide::Test,
        SplitSide::Test => SplitSide::Train,
    };

    let mut filled = 0usize;
    ordered
        .into_iter()
        .map(|(key, members)| {
            if filled < target_count {
                filled += members.len();
                (key, members, target)
            } else {
                (key, members, other)
            }
        })
        .collect()
}

/// Flatten assigned groups into a [`GroupedSplit`].
pub(crate) fn collect_split<K, T, F>(
    assigned: Vec<(K, Vec<T>, SplitSide)>,
    into_record: F,
    mut stats: SplitStats,
) -> GroupedSplit<K>
where
    F: Fn(T) -> Record,
{
    let mut train = Vec::new();
    let mut test = Vec::new();
    let mut groups = Vec::with_capacity(assigned.len());

    for (key, members, side) in assigned {
        groups.push(GroupSummary {
            key,
            size: members.len(),
            side,
        });
        let bucket = match side {
            SplitSide::Train => &mut train,
            SplitSide::Test => &mut test,
        };
        bucket.extend(members.into_iter().map(&into_record));
    }

    stats.total_groups = groups.len();
    stats.train_groups = groups.iter().filter(|g| g.side == SplitSide::Train).count();
    stats.test_groups = stats.total_groups - stats.train_groups;
    stats.train_records = train.len();
    stats.test_records = test.len();

    GroupedSplit {
        train,
        test,
        groups,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greedy_fill_keeps_groups_whole() {
        let ordered = vec![("a", vec![1; 5]), ("b", vec![2; 3]), ("c", vec![3; 2])];
        let assigned = greedy_fill(ordered, SplitSide::Train, 7);
        let sides: Vec<_> = assigned.iter().map(|(k, _, s)| (*k, *s)).collect();
        assert_eq!(
            sides,
            vec![
                ("a", SplitSide::Train),
                ("b", SplitSide::Train),
                ("c", SplitSide::Test)
            ]
        );
    }

    #[test]
    fn greedy_fill_with_zero_target_sends_everything_away() {
        let ordered = vec![("a", vec![1, 2]), ("b", vec![3])];
        let assigned = greedy_fill(ordered, SplitSide::Test, 0);
        assert!(assigned.iter().all(|(_, _, s)| *s == SplitSide::Train));
    }

    #[test]
    fn target_count_floors() {
        assert_eq!(target_count(10, 0.7), 7);
        assert_eq!(target_count(9, 0.5), 4);
        assert_eq!(target_count(0, 0.3), 0);
    }
}
