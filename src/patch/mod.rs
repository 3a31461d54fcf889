//! Patch parsing: declaration heuristics, feature extraction and the per-run
//! feature cache.

pub mod cache;
pub mod extractor;
pub mod matchers;

pub use cache::FeatureCache;
pub use extractor::{PatchFeatureExtractor, PatchFeatures};
pub use matchers::{is_control_flow_keyword, MatcherChain, MethodMatcher, RegexMatcher};
