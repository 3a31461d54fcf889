//! Bug identifiers embedded in patch names.
//!
//! Patch identifiers look like `patch1-defects4j-Chart-5-ACS` or
//! `defects4j-Lang-3-developer`; the `<Project>-<Number>` token following the
//! benchmark prefix names the defect the patch addresses.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::errors::Result;

/// A `<Project>-<Number>` defect identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BugId {
    /// Project name, e.g. `Chart`
    pub project: String,
    /// Bug number within the project, kept verbatim
    pub number: String,
}

impl fmt::Display for BugId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.project, self.number)
    }
}

/// Extracts [`BugId`]s for one benchmark prefix.
#[derive(Debug, Clone)]
pub struct BugIdParser {
    pattern: Regex,
}

impl BugIdParser {
    /// Build a parser matching `<prefix>-<Project>-<Number>`.
    pub fn new(prefix: &str) -> Result<Self> {
        let pattern = Regex::new(&format!(
            r"{}-([A-Za-z]+)-(\d+)",
            regex::escape(prefix)
        ))?;
        Ok(Self { pattern })
    }

    /// First bug identifier found anywhere in `name`.
    pub fn parse(&self, name: &str) -> Option<BugId> {
        let caps = self.pattern.captures(name)?;
        Some(BugId {
            project: caps[1].to_string(),
            number: caps[2].to_string(),
        })
    }
}

impl Default for BugIdParser {
    fn default() -> Self {
        Self {
            pattern: Regex::new(r"defects4j-([A-Za-z]+)-(\d+)").expect("static bug id pattern"),
        }
    }
}
