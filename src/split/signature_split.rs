//! Signature-stratified split aiming at a train fraction of records.

use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use super::{collect_split, greedy_fill, target_count, SignatureSplit, SplitSide, SplitStats};
use crate::core::bug_id::BugId;
use crate::core::config::SignatureSplitConfig;
use crate::core::dataset::Record;
use crate::signature::Signature;

/// A record filed under a signature, with the bug both of its patches address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupEntry {
    /// The labeled pair
    pub record: Record,
    /// Shared bug identifier, `None` when neither patch name carries one
    pub bug_id: Option<BugId>,
}

/// Records grouped by signature, in order of first appearance.
pub type SignatureGroups = IndexMap<Signature, Vec<GroupEntry>>;

/// Greedy, group-atomic splitter over signature groups.
#[derive(Debug, Clone)]
pub struct SignatureSplitter {
    train_ratio: f64,
    max_per_signature: Option<usize>,
    seed: u64,
}

impl SignatureSplitter {
    /// Splitter targeting `train_ratio` of records in train.
    pub fn new(train_ratio: f64) -> Self {
        Self {
            train_ratio,
            max_per_signature: None,
            seed: 42,
        }
    }

    /// Keep at most `cap` randomly sampled records per signature.
    pub fn with_cap(mut self, cap: Option<usize>) -> Self {
        self.max_per_signature = cap;
        self
    }

    /// Seed for the per-signature sampling.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Splitter configured from the signature split settings.
    pub fn from_config(config: &SignatureSplitConfig) -> Self {
        Self::new(config.train_ratio)
            .with_cap(config.max_per_signature)
            .with_seed(config.seed)
    }

    /// Split `groups` into train and test without ever dividing a group.
    ///
    /// Groups over the cap are sampled down first. The largest groups are then
    /// placed in train until it reaches `floor(total * train_ratio)` records;
    /// everything after goes to test. This lands near the target, not on it.
    pub fn split(&self, groups: SignatureGroups) -> SignatureSplit {
        let records_before_cap: usize = groups.values().map(Vec::len).sum();
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut capped: Vec<(Signature, Vec<GroupEntry>)> = groups
            .into_iter()
            .map(|(signature, entries)| match self.max_per_signature {
                Some(cap) if entries.len() > cap => {
                    debug!(
                        "Sampling {} of {} records for signature {}",
                        cap,
                        entries.len(),
                        signature
                    );
                    (signature, sample_entries(entries, cap, &mut rng))
                }
                _ => (signature, entries),
            })
            .collect();

        let total: usize = capped.iter().map(|(_, entries)| entries.len()).sum();
        let target_train = target_count(total, self.train_ratio);

        // Stable: equally sized groups keep first-appearance order
        capped.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

        let assigned = greedy_fill(capped, SplitSide::Train, target_train);
        let stats = SplitStats {
            total_groups: 0,
            train_groups: 0,
            test_groups: 0,
            records_before_cap,
            total_records: total,
            train_records: 0,
            test_records: 0,
            target_side: SplitSide::Train,
            target_ratio: self.train_ratio,
            target_count: target_train,
        };
        let split = collect_split(assigned, |entry: GroupEntry| entry.record, stats);

        info!(
            "Signature split: {} signatures ({} train / {} test), {} train / {} test records (target {} train)",
            split.stats.total_groups,
            split.stats.train_groups,
            split.stats.test_groups,
            split.stats.train_records,
            split.stats.test_records,
            split.stats.target_count
        );
        split
    }
}

/// Uniformly sample `cap` entries without replacement, keeping input order.
fn sample_entries(entries: Vec<GroupEntry>, cap: usize, rng: &mut StdRng) -> Vec<GroupEntry> {
    let mut keep = vec![false; entries.len()];
    for index in rand::seq::index::sample(rng, entries.len(), cap) {
        keep[index] = true;
    }
    entries
        .into_iter()
        .zip(keep)
        .filter_map(|(entry, kept)| kept.then_some(entry))
        .collect()
}
