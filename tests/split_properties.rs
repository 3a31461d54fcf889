//! Property tests for the group-atomic splitters.
//!
//! Groups are generated with a distinctive ground-truth id per group, so the
//! side every record lands on can be traced back to its group.

use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;
use proptest::prelude::*;

use patchsplit_rs::split::{
    GroupEntry, ProjectSplitter, SignatureGroups, SignatureSplitter, SplitSide,
};
use patchsplit_rs::{ProjectStrategy, Record, Signature};

fn signature_groups(sizes: &[usize]) -> SignatureGroups {
    let mut groups = SignatureGroups::new();
    for (index, size) in sizes.iter().enumerate() {
        let name = format!("Group{index}::run");
        let entries = (0..*size)
            .map(|i| GroupEntry {
                record: Record::new(format!("cand-{index}-{i}"), format!("gt-{index}"), "1"),
                bug_id: None,
            })
            .collect();
        groups.insert(Signature::from_parts([name]), entries);
    }
    groups
}

fn project_groups(sizes: &[usize]) -> IndexMap<String, Vec<Record>> {
    sizes
        .iter()
        .enumerate()
        .map(|(index, size)| {
            let project = format!("Project{index}");
            let records = (0..*size)
                .map(|i| {
                    Record::new(
                        format!("patch{i}-defects4j-{project}-{i}"),
                        format!("gt-{index}"),
                        "0",
                    )
                })
                .collect();
            (project, records)
        })
        .collect()
}

/// Side of every ground-truth id; fails if one id appears on both sides.
fn sides_by_group(train: &[Record], test: &[Record]) -> Result<HashMap<String, SplitSide>, String> {
    let mut sides = HashMap::new();
    for (records, side) in [(train, SplitSide::Train), (test, SplitSide::Test)] {
        for record in records {
            let previous = sides.insert(record.groundtruth_index.clone(), side);
            if previous.is_some_and(|p| p != side) {
                return Err(format!("group {} is split", record.groundtruth_index));
            }
        }
    }
    Ok(sides)
}

proptest! {
    #[test]
    fn signature_groups_are_atomic(
        sizes in prop::collection::vec(1usize..20, 0..30),
        ratio in 0.05f64..0.95,
    ) {
        let split = SignatureSplitter::new(ratio).split(signature_groups(&sizes));
        prop_assert!(sides_by_group(&split.train, &split.test).is_ok());
    }

    #[test]
    fn signature_split_conserves_records(
        sizes in prop::collection::vec(1usize..20, 0..30),
        ratio in 0.05f64..0.95,
        cap in prop::option::of(1usize..10),
        seed in any::<u64>(),
    ) {
        let expected: usize = sizes.iter().map(|&s| cap.map_or(s, |c| s.min(c))).sum();
        let split = SignatureSplitter::new(ratio)
            .with_cap(cap)
            .with_seed(seed)
            .split(signature_groups(&sizes));

        prop_assert_eq!(split.train.len() + split.test.len(), expected);
        prop_assert_eq!(split.stats.total_records, expected);
        prop_assert_eq!(split.stats.records_before_cap, sizes.iter().sum::<usize>());

        let uids: BTreeSet<&str> = split.train.iter().chain(&split.test).map(|r| r.uid.as_str()).collect();
        prop_assert_eq!(uids.len(), expected);
    }

    #[test]
    fn signature_split_is_deterministic(
        sizes in prop::collection::vec(1usize..30, 1..20),
        ratio in 0.05f64..0.95,
        cap in prop::option::of(1usize..10),
        seed in any::<u64>(),
    ) {
        let run = || {
            SignatureSplitter::new(ratio)
                .with_cap(cap)
                .with_seed(seed)
                .split(signature_groups(&sizes))
        };
        let first = run();
        let second = run();
        prop_assert_eq!(first.train, second.train);
        prop_assert_eq!(first.test, second.test);
    }

    #[test]
    fn signature_split_lands_within_one_group_of_target(
        sizes in prop::collection::vec(1usize..10, 1..60),
        ratio in 0.05f64..0.95,
    ) {
        let split = SignatureSplitter::new(ratio).split(signature_groups(&sizes));
        let largest = sizes.iter().copied().max().unwrap_or(0);
        let target = split.stats.target_count;
        let achieved = split.train.len();

        prop_assert!(achieved >= target);
        prop_assert!(target == 0 || achieved - target < largest);
    }

    #[test]
    fn project_greedy_strategies_keep_projects_whole(
        sizes in prop::collection::vec(1usize..25, 0..15),
        ratio in 0.05f64..0.95,
        largest_first in any::<bool>(),
    ) {
        let strategy = if largest_first {
            ProjectStrategy::LargestToTest
        } else {
            ProjectStrategy::SmallestToTest
        };
        let split = ProjectSplitter::new(ratio).split(project_groups(&sizes), &strategy);

        prop_assert!(sides_by_group(&split.train, &split.test).is_ok());
        prop_assert_eq!(split.train.len() + split.test.len(), sizes.iter().sum::<usize>());

        let largest = sizes.iter().copied().max().unwrap_or(0);
        let target = split.stats.target_count;
        prop_assert!(split.test.len() >= target);
        prop_assert!(target == 0 || split.test.len() - target < largest);
    }

    #[test]
    fn manual_projects_go_exactly_to_test(
        sizes in prop::collection::vec(1usize..10, 1..12),
        picks in prop::collection::btree_set(0usize..12, 0..6),
    ) {
        let chosen: BTreeSet<String> = picks.iter().map(|i| format!("Project{i}")).collect();
        let split = ProjectSplitter::new(0.5)
            .split(project_groups(&sizes), &ProjectStrategy::Manual(chosen.clone()));

        for group in &split.groups {
            let expected = if chosen.contains(&group.key) { SplitSide::Test } else { SplitSide::Train };
            prop_assert_eq!(group.side, expected);
        }
    }
}

#[test]
fn five_three_two_at_seventy_percent_gives_eight_two() {
    let split = SignatureSplitter::new(0.7).split(signature_groups(&[5, 3, 2]));
    assert_eq!(split.train.len(), 8);
    assert_eq!(split.test.len(), 2);

    let sides = sides_by_group(&split.train, &split.test).unwrap();
    assert_eq!(sides["gt-0"], SplitSide::Train);
    assert_eq!(sides["gt-1"], SplitSide::Train);
    assert_eq!(sides["gt-2"], SplitSide::Test);
}

#[test]
fn empty_input_gives_empty_split_and_zero_percentages() {
    let split = SignatureSplitter::new(0.7).split(SignatureGroups::new());
    assert!(split.train.is_empty() && split.test.is_empty());
    assert_eq!(split.stats.train_record_pct(), 0.0);
    assert_eq!(split.stats.test_group_pct(), 0.0);

    let split = ProjectSplitter::new(0.7).split(IndexMap::new(), &ProjectStrategy::SmallestToTest);
    assert!(split.train.is_empty() && split.test.is_empty());
}
