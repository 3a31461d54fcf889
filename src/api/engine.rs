//! Split engine: records to features to signatures to groups to split.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::core::bug_id::BugIdParser;
use crate::core::config::PatchsplitConfig;
use crate::core::dataset::{Dataset, Record};
use crate::core::errors::{PatchsplitError, Result};
use crate::patch::{FeatureCache, PatchFeatureExtractor};
use crate::signature::{Signature, SignatureBuilder};
use crate::split::{
    group_by_project, GroupEntry, GroupedSplit, ProjectSplitter, ProjectStrategy,
    SignatureGroups, SignatureSplitter, SplitMode, SplitReport,
};

/// Progress callback: stage message and completed fraction in `[0, 1]`.
pub type ProgressCallback = Box<dyn Fn(&str, f64) + Send + Sync>;

/// Records between progress log lines while parsing patches.
pub const PROGRESS_INTERVAL: usize = 500;

/// Signature groups plus the records left out of them.
#[derive(Debug, Clone, Default)]
pub struct SignatureGrouping {
    /// Records by signature, in order of first appearance
    pub groups: SignatureGroups,
    /// Records whose two patches name different bugs
    pub mismatched: Vec<Record>,
}

/// A finished split together with the schema and report describing it.
#[derive(Debug, Clone)]
pub struct SplitRun<K> {
    /// Header row shared by both output tables
    pub headers: Vec<String>,
    /// The split itself
    pub split: GroupedSplit<K>,
    /// Summary of the run
    pub report: SplitReport,
}

/// Main patchsplit engine
pub struct SplitEngine {
    config: PatchsplitConfig,
    extractor: PatchFeatureExtractor,
    bug_ids: BugIdParser,
    signatures: SignatureBuilder,
}

impl SplitEngine {
    /// Create an engine; the configuration is validated first.
    pub fn new(config: PatchsplitConfig) -> Result<Self> {
        config.validate()?;

        let extractor = PatchFeatureExtractor::from_config(&config.extraction);
        let bug_ids = BugIdParser::new(&config.extraction.bug_id_prefix)?;
        let signatures = SignatureBuilder::new(
            config.signature.granularity,
            config.extraction.source_extension.clone(),
        );

        debug!(
            "Engine ready: granularity={}, train_ratio={}, test_ratio={}",
            config.signature.granularity, config.signature.train_ratio, config.projects.test_ratio
        );

        Ok(Self {
            config,
            extractor,
            bug_ids,
            signatures,
        })
    }

    /// Get the current configuration
    pub fn config(&self) -> &PatchsplitConfig {
        &self.config
    }

    /// Read the configured input table.
    pub fn load_dataset(&self) -> Result<Dataset> {
        Dataset::read_csv(&self.config.dataset.input_path, &self.config.dataset)
    }

    /// Fresh per-run feature cache over the configured patch directory.
    ///
    /// Fails when the directory is missing or is not a directory.
    pub fn feature_cache(&self) -> Result<FeatureCache> {
        let dir = &self.config.dataset.patches_dir;
        ensure_directory(dir)?;
        Ok(FeatureCache::new(
            dir.clone(),
            self.config.extraction.patch_extension.clone(),
        ))
    }

    /// Group records by the signature of their two patches.
    ///
    /// Records whose uid and ground-truth patch name different bugs are set
    /// aside. Two names without any bug identifier count as the same bug.
    pub fn build_signature_groups(
        &self,
        records: Vec<Record>,
        cache: &mut FeatureCache,
        progress: Option<&ProgressCallback>,
    ) -> SignatureGrouping {
        let total = records.len();
        let mut grouping = SignatureGrouping::default();

        for (index, record) in records.into_iter().enumerate() {
            let processed = index + 1;
            if processed % PROGRESS_INTERVAL == 0 {
                info!("Processed {}/{} records", processed, total);
            }
            if let Some(callback) = progress {
                callback("Parsing patches", processed as f64 / total as f64);
            }

            let candidate_bug = self.bug_ids.parse(&record.uid);
            let groundtruth_bug = self.bug_ids.parse(&record.groundtruth_index);
            if candidate_bug != groundtruth_bug {
                debug!(
                    "Bug mismatch for '{}' vs '{}'; record skipped",
                    record.uid, record.groundtruth_index
                );
                grouping.mismatched.push(record);
                continue;
            }

            let candidate = cache.get_or_extract(&record.uid, &self.extractor);
            let groundtruth = cache.get_or_extract(&record.groundtruth_index, &self.extractor);
            let signature = self.signatures.build(&candidate, &groundtruth);

            grouping.groups.entry(signature).or_default().push(GroupEntry {
                record,
                bug_id: candidate_bug,
            });
        }

        if !grouping.mismatched.is_empty() {
            warn!(
                "{} records skipped: candidate and ground-truth patches address different bugs",
                grouping.mismatched.len()
            );
        }
        info!(
            "Grouped {} records into {} signatures ({} patches parsed)",
            total - grouping.mismatched.len(),
            grouping.groups.len(),
            cache.len()
        );
        grouping
    }

    /// Signature-based split of an already loaded dataset.
    pub fn signature_split(
        &self,
        dataset: Dataset,
        progress: Option<&ProgressCallback>,
    ) -> Result<SplitRun<Signature>> {
        let mut cache = self.feature_cache()?;
        let input_records = dataset.records.len();
        let grouping = self.build_signature_groups(dataset.records, &mut cache, progress);

        let split = SignatureSplitter::from_config(&self.config.signature).split(grouping.groups);

        let (hits, _) = cache.stats();
        let mut report = SplitReport::new(
            SplitMode::Signature,
            format!("granularity={}", self.signatures.granularity()),
            &split,
        );
        report.input_records = input_records;
        report.dropped_records = grouping.mismatched.len();
        report.patches_parsed = cache.len();
        report.cache_hits = hits;

        Ok(SplitRun {
            headers: dataset.headers,
            split,
            report,
        })
    }

    /// Project-based split of an already loaded dataset.
    pub fn project_split(&self, dataset: Dataset, strategy: &ProjectStrategy) -> SplitRun<String> {
        let input_records = dataset.records.len();
        let grouping = group_by_project(dataset.records, &self.bug_ids);
        let dropped = grouping.unparseable.len();

        let split = ProjectSplitter::from_config(&self.config.projects).split(grouping.groups, strategy);

        let mut report = SplitReport::new(SplitMode::Project, strategy.to_string(), &split);
        report.input_records = input_records;
        report.dropped_records = dropped;

        SplitRun {
            headers: dataset.headers,
            split,
            report,
        }
    }

    /// Write both output tables and record their paths in the report.
    pub fn write_outputs<K>(&self, run: &mut SplitRun<K>) -> Result<()> {
        let train_path = self.config.dataset.train_output_path();
        let test_path = self.config.dataset.test_output_path();

        Dataset::write_csv(&train_path, &run.headers, &run.split.train)?;
        Dataset::write_csv(&test_path, &run.headers, &run.split.test)?;

        run.report.train_output = Some(train_path);
        run.report.test_output = Some(test_path);
        Ok(())
    }

    /// Load, split by signature and write the outputs.
    pub fn run_signature_split(
        &self,
        progress: Option<&ProgressCallback>,
    ) -> Result<SplitRun<Signature>> {
        info!(
            "Starting signature split of {}",
            self.config.dataset.input_path.display()
        );
        let dataset = self.load_dataset()?;
        let mut run = self.signature_split(dataset, progress)?;
        self.write_outputs(&mut run)?;
        Ok(run)
    }

    /// Load, split by project with `strategy` and write the outputs.
    pub fn run_project_split(&self, strategy: &ProjectStrategy) -> Result<SplitRun<String>> {
        info!(
            "Starting project split of {}",
            self.config.dataset.input_path.display()
        );
        let dataset = self.load_dataset()?;
        let mut run = self.project_split(dataset, strategy);
        self.write_outputs(&mut run)?;
        Ok(run)
    }
}

fn ensure_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(PatchsplitError::io(
            format!("Patch directory does not exist: {}", path.display()),
            std::io::Error::new(std::io::ErrorKind::NotFound, "Path not found"),
        ));
    }
    if !path.is_dir() {
        return Err(PatchsplitError::validation_field(
            format!("Patch path is not a directory: {}", path.display()),
            "dataset.patches_dir",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    use crate::split::SplitSide;

    const PLOT_DRAW: &str = "\
--- a/source/org/jfree/chart/plot/Plot.java
+++ b/source/org/jfree/chart/plot/Plot.java
@@ -10,3 +10,3 @@ public abstract class Plot
     public void draw(Graphics2D g2) {
-        g2.fill(area);
+        g2.draw(area);
";

    const AXIS_SCALE: &str = "\
--- a/source/org/jfree/chart/axis/Axis.java
+++ b/source/org/jfree/chart/axis/Axis.java
@@ -40,2 +40,2 @@
     protected double scale(double v) {
-        return v * 2;
+        return v * 3;
";

    fn fixture() -> (TempDir, PatchsplitConfig) {
        let dir = TempDir::new().unwrap();
        let patches = dir.path().join("patches");
        fs::create_dir(&patches).unwrap();

        for (name, body) in [
            ("patch1-defects4j-Chart-1", PLOT_DRAW),
            ("patch2-defects4j-Chart-1", PLOT_DRAW),
            ("defects4j-Chart-1-dev", PLOT_DRAW),
            ("patch1-defects4j-Chart-2", AXIS_SCALE),
            ("defects4j-Chart-2-dev", AXIS_SCALE),
        ] {
            fs::write(patches.join(format!("{name}.patch")), body).unwrap();
        }

        let input = dir.path().join("pairs.csv");
        fs::write(
            &input,
            "uid,groundtruth_index,expert_label\n\
             patch1-defects4j-Chart-1,defects4j-Chart-1-dev,1\n\
             patch2-defects4j-Chart-1,defects4j-Chart-1-dev,0\n\
             patch1-defects4j-Chart-2,defects4j-Chart-2-dev,1\n\
             patch9-defects4j-Lang-4,defects4j-Chart-2-dev,0\n",
        )
        .unwrap();

        let mut config = PatchsplitConfig::default();
        config.dataset.input_path = input;
        config.dataset.patches_dir = patches;
        config.signature.train_ratio = 0.5;
        (dir, config)
    }

    #[test]
    fn groups_by_signature_and_drops_mismatches() {
        let (_dir, config) = fixture();
        let engine = SplitEngine::new(config).unwrap();
        let dataset = engine.load_dataset().unwrap();
        let mut cache = engine.feature_cache().unwrap();

        let grouping = engine.build_signature_groups(dataset.records, &mut cache, None);

        assert_eq!(grouping.mismatched.len(), 1);
        assert_eq!(grouping.groups.len(), 2);
        let first = grouping.groups.get_index(0).unwrap();
        assert_eq!(first.0.parts(), ["Plot::draw"]);
        assert_eq!(first.1.len(), 2);
        assert_eq!(first.1[0].bug_id.as_ref().unwrap().to_string(), "Chart-1");

        // The developer patch of Chart-1 is parsed once for two records
        assert_eq!(cache.len(), 5);
        assert_eq!(cache.stats(), (1, 5));
    }

    #[test]
    fn signature_run_writes_both_tables() {
        let (dir, config) = fixture();
        let engine = SplitEngine::new(config).unwrap();
        let run = engine.run_signature_split(None).unwrap();

        assert_eq!(run.split.train.len(), 2);
        assert_eq!(run.split.test.len(), 1);
        assert_eq!(run.report.dropped_records, 1);
        assert_eq!(run.report.input_records, 4);

        let train = fs::read_to_string(dir.path().join("pairs_train.csv")).unwrap();
        let test = fs::read_to_string(dir.path().join("pairs_test.csv")).unwrap();
        assert!(train.starts_with("uid,groundtruth_index,expert_label\n"));
        assert_eq!(train.lines().count(), 3);
        assert!(test.contains("patch1-defects4j-Chart-2"));
    }

    #[test]
    fn progress_reaches_completion() {
        let (_dir, config) = fixture();
        let engine = SplitEngine::new(config).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: ProgressCallback = Box::new(move |_stage: &str, fraction: f64| {
            sink.lock().unwrap().push(fraction);
        });

        let dataset = engine.load_dataset().unwrap();
        engine.signature_split(dataset, Some(&callback)).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 4);
        assert_eq!(*seen.last().unwrap(), 1.0);
    }

    #[test]
    fn missing_patch_directory_aborts() {
        let (dir, mut config) = fixture();
        config.dataset.patches_dir = dir.path().join("nowhere");
        let engine = SplitEngine::new(config).unwrap();
        let dataset = engine.load_dataset().unwrap();
        let err = engine.signature_split(dataset, None).unwrap_err();
        assert!(err.to_string().contains("Patch directory does not exist"));
    }

    #[test]
    fn patch_path_that_is_a_file_aborts() {
        let (dir, mut config) = fixture();
        config.dataset.patches_dir = dir.path().join("pairs.csv");
        let engine = SplitEngine::new(config).unwrap();
        assert!(matches!(
            engine.feature_cache(),
            Err(PatchsplitError::Validation { .. })
        ));
    }

    #[test]
    fn project_run_keeps_projects_whole() {
        let (dir, config) = fixture();
        let engine = SplitEngine::new(config).unwrap();
        let run = engine
            .run_project_split(&ProjectStrategy::LargestToTest)
            .unwrap();

        assert_eq!(run.report.dropped_records, 0);
        let test_projects: Vec<_> = run
            .split
            .groups_on(SplitSide::Test)
            .map(|g| g.key.as_str())
            .collect();
        assert_eq!(test_projects, vec!["Chart"]);
        assert_eq!(run.split.train.len(), 1);
        assert!(dir.path().join("pairs_test.csv").exists());
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let mut config = PatchsplitConfig::default();
        config.signature.train_ratio = 1.5;
        assert!(SplitEngine::new(config).is_err());
    }
}
