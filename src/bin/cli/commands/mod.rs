//! CLI Command Implementations
//!
//! - split: signature-based split
//! - projects: project-based split
//! - inspect: single-patch feature dump
//! - config: configuration management commands

pub mod config;
pub mod inspect;
pub mod projects;
pub mod split;

pub use config::{init_config, print_default_config, validate_config};
pub use inspect::inspect_patch_command;
pub use projects::split_projects_command;
pub use split::split_command;
