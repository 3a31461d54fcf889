//! Per-run memoization of patch features.
//!
//! A patch identifier is usually referenced by many records (every candidate
//! is compared against the same developer patch), so each patch is parsed at
//! most once per run. The cache is owned by the run context and passed
//! explicitly to whatever needs it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ahash::AHashMap;

use super::extractor::{PatchFeatureExtractor, PatchFeatures};

/// Lazily populated map from patch identifier to its features.
pub struct FeatureCache {
    patches_dir: PathBuf,
    patch_extension: String,
    entries: AHashMap<String, Arc<PatchFeatures>>,
    hits: usize,
    misses: usize,
}

impl FeatureCache {
    /// Cache resolving identifiers to `<patches_dir>/<identifier><patch_extension>`.
    pub fn new(patches_dir: impl Into<PathBuf>, patch_extension: impl Into<String>) -> Self {
        Self {
            patches_dir: patches_dir.into(),
            patch_extension: patch_extension.into(),
            entries: AHashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Location of the patch file for `identifier`.
    pub fn patch_path(&self, identifier: &str) -> PathBuf {
        self.patches_dir
            .join(format!("{identifier}{}", self.patch_extension))
    }

    /// Directory patches are resolved against
    pub fn patches_dir(&self) -> &Path {
        &self.patches_dir
    }

    /// Features for `identifier`, parsing the patch on first reference.
    pub fn get_or_extract(
        &mut self,
        identifier: &str,
        extractor: &PatchFeatureExtractor,
    ) -> Arc<PatchFeatures> {
        if let Some(features) = self.entries.get(identifier) {
            self.hits += 1;
            return Arc::clone(features);
        }

        self.misses += 1;
        let features = Arc::new(extractor.extract_file(&self.patch_path(identifier)));
        self.entries
            .insert(identifier.to_string(), Arc::clone(&features));
        features
    }

    /// Number of distinct patches parsed so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no patch has been parsed yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since the cache was created
    pub fn stats(&self) -> (usize, usize) {
        (self.hits, self.misses)
    }
}
