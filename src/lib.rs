//! # Patchsplit-RS: Leakage-Aware Splitting of Patch-Pair Datasets
//!
//! Partitions a labeled table of patch pairs (a candidate patch judged against
//! a ground-truth patch) into train and test subsets so that structurally
//! related pairs never straddle the split:
//!
//! - **Feature Extraction**: modified files and methods, recovered from
//!   unified diffs with a chain of declaration heuristics
//! - **Signatures**: canonical fingerprints of the code a pair touches, at
//!   method, class or file granularity
//! - **Stratified Splitting**: whole signature groups (or whole projects) are
//!   greedily assigned to reach a target fraction of records
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       API Layer                          │
//! ├──────────────────────────────────────────────────────────┤
//! │  Core          │  Patch         │  Signature │  Split    │
//! │ • Config       │ • Matchers     │ • Builder  │ • Greedy  │
//! │ • Dataset I/O  │ • Extractor    │            │ • Project │
//! │ • Bug ids      │ • Cache        │            │ • Report  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use patchsplit_rs::{PatchsplitConfig, SplitEngine};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = PatchsplitConfig::default();
//!     config.signature.train_ratio = 0.7;
//!
//!     let engine = SplitEngine::new(config)?;
//!     let run = engine.run_signature_split(None)?;
//!
//!     println!(
//!         "{} train / {} test records",
//!         run.split.train.len(),
//!         run.split.test.len()
//!     );
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

#[cfg(feature = "mimalloc")]
#[global_allocator]
static ALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;

// Configuration, errors and dataset I/O
pub mod core {
    //! Configuration, errors, bug identifiers and the labeled pair table.

    pub mod bug_id;
    pub mod config;
    pub mod dataset;
    pub mod errors;
}

// Diff parsing
pub mod patch;

// Grouping keys
pub mod signature;

// Group-atomic splitters
pub mod split;

// Public API and engine interface
pub mod api {
    //! High-level engine wiring extraction, grouping and splitting together.

    pub mod engine;
}

// Re-export primary types for convenience
pub use crate::api::engine::{ProgressCallback, SplitEngine, SplitRun};
pub use crate::core::config::PatchsplitConfig;
pub use crate::core::dataset::{Dataset, Record};
pub use crate::core::errors::{PatchsplitError, Result, ResultExt};
pub use crate::patch::{PatchFeatureExtractor, PatchFeatures};
pub use crate::signature::{build_signature, Granularity, Signature};
pub use crate::split::{ProjectStrategy, SplitReport, SplitSide, SplitStats};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
