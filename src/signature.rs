//! Canonical signatures for patch pairs.
//!
//! A signature fingerprints the code a pair of patches touches. Records with
//! equal signatures are treated as near-duplicates and must land on the same
//! side of a split. Signatures are sorted and deduplicated, so they do not
//! depend on which patch of the pair contributed a feature.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::patch::PatchFeatures;

/// Abstraction level at which touched code is compared.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Bare method names, regardless of file
    Method,
    /// `Class::method`, class taken from the file name
    #[default]
    Class,
    /// Full file path together with the method
    File,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Method => "method",
            Self::Class => "class",
            Self::File => "file",
        };
        f.write_str(name)
    }
}

/// Sorted, deduplicated tuple of feature strings. Compared by value only.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Signature(Vec<String>);

impl Signature {
    /// The empty signature shared by all featureless pairs
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Signature over arbitrary parts; sorts and deduplicates them.
    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = parts.into_iter().map(Into::into).collect();
        Self(set.into_iter().collect())
    }

    /// Components in canonical order
    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// Whether this is the empty signature
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of components
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}

/// Class name of a source file: its base name without the source extension.
pub fn class_name(path: &str, source_extension: &str) -> String {
    let base = path.rsplit('/').next().unwrap_or(path);
    base.strip_suffix(source_extension).unwrap_or(base).to_string()
}

/// Reduces a patch pair's features to a [`Signature`].
#[derive(Debug, Clone)]
pub struct SignatureBuilder {
    granularity: Granularity,
    source_extension: String,
}

impl SignatureBuilder {
    /// Builder at `granularity`; class names strip `source_extension`.
    pub fn new(granularity: Granularity, source_extension: impl Into<String>) -> Self {
        Self {
            granularity,
            source_extension: source_extension.into(),
        }
    }

    /// Granularity in use
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Signature of the pair `(first, second)`.
    ///
    /// `(file, method)` pairs from either patch are preferred. Without any,
    /// the touched files are used (as class names below `file` granularity).
    /// A pair with no features at all gets the empty signature.
    pub fn build(&self, first: &PatchFeatures, second: &PatchFeatures) -> Signature {
        let pairs: BTreeSet<&(String, String)> = first
            .file_method_pairs
            .iter()
            .chain(&second.file_method_pairs)
            .collect();

        if !pairs.is_empty() {
            return match self.granularity {
                Granularity::Method => Signature::from_parts(pairs.iter().map(|(_, m)| m.as_str())),
                Granularity::Class => Signature::from_parts(pairs.iter().map(|(f, m)| {
                    format!("{}::{}", class_name(f, &self.source_extension), m)
                })),
                Granularity::File => {
                    Signature::from_parts(pairs.iter().map(|(f, m)| format!("{f}::{m}")))
                }
            };
        }

        let files = first.modified_files.iter().chain(&second.modified_files);
        match self.granularity {
            Granularity::Method | Granularity::Class => {
                Signature::from_parts(files.map(|f| class_name(f, &self.source_extension)))
            }
            Granularity::File => Signature::from_parts(files.map(String::as_str)),
        }
    }
}

/// Signature of a patch pair at `granularity` for `source_extension` files.
pub fn build_signature(
    first: &PatchFeatures,
    second: &PatchFeatures,
    granularity: Granularity,
    source_extension: &str,
) -> Signature {
    SignatureBuilder::new(granularity, source_extension).build(first, second)
}
