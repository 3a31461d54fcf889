//! Line-oriented feature extraction from unified diffs.
//!
//! A patch is scanned once, top to bottom. File headers (`--- a/...`,
//! `+++ b/...`) move a cursor onto the file being changed, hunk headers may
//! name the enclosing method, and content lines are offered to the
//! declaration [`MatcherChain`]. Features only attach while the cursor sits on
//! a file with the configured source extension.
//!
//! Extraction never fails: a missing patch has no features and an unreadable
//! one keeps whatever was collected before the fault.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::matchers::MatcherChain;
use crate::core::config::ExtractionConfig;

static FILE_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]{3} [ab]/(.+)$").expect("file header pattern"));

static HUNK_METHOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@@.*@@\s*([a-zA-Z_][a-zA-Z0-9_]*)\s*\(").expect("hunk method pattern")
});

/// Structural features of one patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchFeatures {
    /// Source files the patch touches
    pub modified_files: BTreeSet<String>,
    /// Bare names of methods the patch touches
    pub modified_methods: BTreeSet<String>,
    /// `(file, method)` pairs the patch touches
    pub file_method_pairs: BTreeSet<(String, String)>,
}

impl PatchFeatures {
    /// Whether nothing at all was extracted
    pub fn is_empty(&self) -> bool {
        self.modified_files.is_empty()
            && self.modified_methods.is_empty()
            && self.file_method_pairs.is_empty()
    }

    fn record_method(&mut self, file: &str, method: &str) {
        self.modified_methods.insert(method.to_string());
        self.file_method_pairs
            .insert((file.to_string(), method.to_string()));
    }
}

/// Extracts [`PatchFeatures`] from diff text.
pub struct PatchFeatureExtractor {
    source_extension: String,
    matchers: MatcherChain,
}

impl PatchFeatureExtractor {
    /// Extractor for files ending in `source_extension` using the Java heuristics.
    pub fn new(source_extension: impl Into<String>) -> Self {
        Self::with_matchers(source_extension, MatcherChain::java())
    }

    /// Extractor with a custom declaration matcher chain.
    pub fn with_matchers(source_extension: impl Into<String>, matchers: MatcherChain) -> Self {
        Self {
            source_extension: source_extension.into(),
            matchers,
        }
    }

    /// Extractor configured from the extraction settings.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(config.source_extension.clone())
    }

    /// The extension that selects files for feature extraction
    pub fn source_extension(&self) -> &str {
        &self.source_extension
    }

    /// Extract features from the patch at `path`.
    ///
    /// A missing file yields empty features. Read failures are logged and the
    /// features gathered so far are returned.
    pub fn extract_file(&self, path: &Path) -> PatchFeatures {
        if !path.exists() {
            debug!("Patch not found, treating as featureless: {}", path.display());
            return PatchFeatures::default();
        }

        match File::open(path) {
            Ok(file) => self.extract_reader(BufReader::new(file), &path.display().to_string()),
            Err(e) => {
                warn!("Could not parse patch {}: {}", path.display(), e);
                PatchFeatures::default()
            }
        }
    }

    /// Extract features from diff text already in memory.
    pub fn extract_text(&self, text: &str) -> PatchFeatures {
        let mut scan = PatchScan::new(self);
        for line in text.lines() {
            scan.feed(line);
        }
        scan.finish()
    }

    /// Extract features line by line from `reader`.
    ///
    /// Invalid UTF-8 is replaced rather than rejected. An I/O error ends the
    /// scan early with a warning naming `origin`.
    pub fn extract_reader<R: BufRead>(&self, mut reader: R, origin: &str) -> PatchFeatures {
        let mut scan = PatchScan::new(self);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    scan.feed(line.trim_end_matches(['\n', '\r']));
                }
                Err(e) => {
                    warn!("Could not parse patch {}: {}", origin, e);
                    break;
                }
            }
        }
        scan.finish()
    }
}

impl Default for PatchFeatureExtractor {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}

/// Cursor state for a single pass over one patch.
struct PatchScan<'e> {
    extractor: &'e PatchFeatureExtractor,
    current_file: Option<String>,
    features: PatchFeatures,
}

impl<'e> PatchScan<'e> {
    fn new(extractor: &'e PatchFeatureExtractor) -> Self {
        Self {
            extractor,
            current_file: None,
            features: PatchFeatures::default(),
        }
    }

    fn feed(&mut self, line: &str) {
        if let Some(caps) = FILE_HEADER.captures(line) {
            let path = caps[1].trim_end();
            if path.ends_with(self.extractor.source_extension.as_str()) {
                self.features.modified_files.insert(path.to_string());
                self.current_file = Some(path.to_string());
            } else {
                self.current_file = None;
            }
        }

        let Some(file) = self.current_file.as_deref() else {
            return;
        };

        if line.starts_with("@@") {
            if let Some(method) = HUNK_METHOD.captures(line).and_then(|c| c.get(1)) {
                self.features.record_method(file, method.as_str());
            }
            return;
        }

        if let Some(content) = line
            .strip_prefix('+')
            .or_else(|| line.strip_prefix('-'))
            .or_else(|| line.strip_prefix(' '))
        {
            if let Some(method) = self.extractor.matchers.match_method(content.trim()) {
                self.features.record_method(file, method);
            }
        }
    }

    fn finish(self) -> PatchFeatures {
        self.features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Read};
    use tempfile::tempdir;

    const CHART_PATCH: &str = "\
diff --git a/source/org/jfree/chart/renderer/category/AbstractCategoryItemRenderer.java b/source/org/jfree/chart/renderer/category/AbstractCategoryItemRenderer.java
--- a/source/org/jfree/chart/renderer/category/AbstractCategoryItemRenderer.java
+++ b/source/org/jfree/chart/renderer/category/AbstractCategoryItemRenderer.java
@@ -1794,7 +1794,7 @@ public LegendItemCollection getLegendItems() {
         }
         int index = this.plot.getIndexOf(this);
         CategoryDataset dataset = this.plot.getDataset(index);
-        if (dataset != null) {
+        if (dataset == null) {
             return result;
         }
";

    fn extractor() -> PatchFeatureExtractor {
        PatchFeatureExtractor::new(".java")
    }

    #[test]
    fn file_header_sets_modified_file() {
        let features = extractor().extract_text(CHART_PATCH);
        assert_eq!(
            features.modified_files.iter().collect::<Vec<_>>(),
            vec!["source/org/jfree/chart/renderer/category/AbstractCategoryItemRenderer.java"]
        );
        // The hunk context starts with a modifier, so it names no method
        assert!(features.modified_methods.is_empty());
    }

    #[test]
    fn hunk_header_names_method() {
        let patch = "\
--- a/src/Foo.java
+++ b/src/Foo.java
@@ -10,6 +10,7 @@ computeTotal(int a, int b) {
     int x = 1;
";
        let features = extractor().extract_text(patch);
        assert!(features.modified_methods.contains("computeTotal"));
        assert!(features
            .file_method_pairs
            .contains(&("src/Foo.java".to_string(), "computeTotal".to_string())));
    }

    #[test]
    fn content_lines_name_methods() {
        let patch = "\
--- a/src/main/java/org/Util.java
+++ b/src/main/java/org/Util.java
@@ -1,3 +1,4 @@
 public class Util {
-    public static int parse(String s) {
+    public static long parse(String s) throws NumberFormatException {
+        if (s == null) {
";
        let features = extractor().extract_text(patch);
        assert_eq!(
            features.modified_methods.iter().collect::<Vec<_>>(),
            vec!["parse"]
        );
        assert_eq!(features.file_method_pairs.len(), 1);
    }

    #[test]
    fn other_languages_are_ignored() {
        let patch = "\
--- a/build.xml
+++ b/build.xml
@@ -1,3 +1,4 @@ target(name)
+    public void notJava() {
";
        let features = extractor().extract_text(patch);
        assert!(features.is_empty());
    }

    #[test]
    fn non_source_header_clears_cursor() {
        let patch = "\
--- a/src/A.java
+++ b/src/A.java
+    public void inA() {
--- a/README.md
+++ b/README.md
+    public void inReadme() {
";
        let features = extractor().extract_text(patch);
        assert!(features.modified_methods.contains("inA"));
        assert!(!features.modified_methods.contains("inReadme"));
    }

    #[test]
    fn lines_before_any_header_are_ignored() {
        let features = extractor().extract_text("+    public void orphan() {\n");
        assert!(features.is_empty());
    }

    #[test]
    fn missing_file_has_no_features() {
        let dir = tempdir().unwrap();
        let features = extractor().extract_file(&dir.path().join("absent.patch"));
        assert_eq!(features, PatchFeatures::default());
    }

    #[test]
    fn invalid_utf8_is_tolerated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin1.patch");
        let mut bytes = b"--- a/src/Caf\xe9.java\n+++ b/src/Caf\xe9.java\n".to_vec();
        bytes.extend_from_slice(b"+    private void brew() {\n");
        std::fs::write(&path, bytes).unwrap();

        let features = extractor().extract_file(&path);
        assert_eq!(features.modified_files.len(), 1);
        assert!(features.modified_methods.contains("brew"));
    }

    #[test]
    fn crlf_line_endings_are_handled() {
        let patch = "--- a/src/W.java\r\n+++ b/src/W.java\r\n+    public void win() {\r\n";
        let features = extractor()
            .extract_reader(io::Cursor::new(patch.as_bytes()), "crlf");
        assert!(features.modified_files.contains("src/W.java"));
        assert!(features.modified_methods.contains("win"));
    }

    #[test]
    fn read_failure_keeps_partial_features() {
        struct FailAfter {
            data: io::Cursor<Vec<u8>>,
        }
        impl Read for FailAfter {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                let n = self.data.read(buf)?;
                if n == 0 {
                    Err(io::Error::new(io::ErrorKind::Other, "disk vanished"))
                } else {
                    Ok(n)
                }
            }
        }

        let reader = io::BufReader::new(FailAfter {
            data: io::Cursor::new(b"--- a/src/P.java\n+++ b/src/P.java\n+  public void kept() {\n".to_vec()),
        });
        let features = extractor().extract_reader(reader, "failing");
        assert!(features.modified_methods.contains("kept"));
    }

    #[test]
    fn extraction_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chart.patch");
        std::fs::write(&path, CHART_PATCH).unwrap();

        let first = extractor().extract_file(&path);
        let second = extractor().extract_file(&path);
        assert_eq!(first, second);
        assert_eq!(first, extractor().extract_text(CHART_PATCH));
    }
}
